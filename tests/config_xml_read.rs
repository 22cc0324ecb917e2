//! Verify XML config is parsed and used without touching user state.

use std::fs;
use tempfile::tempdir;

use atomic_save::{LogLevel, load_config, load_config_from_xml_path};

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");
    let cfg_path = td.path().join("config.xml");
    let log_file = td.path().join("atomic_save.log");

    let xml = format!(
        r#"
<config>
  <log_level>debug</log_level>
  <log_file>{}</log_file>
  <temp_rename_window_ms>250</temp_rename_window_ms>
  <temp_create_delete_window_ms> 8000 </temp_create_delete_window_ms>
  <extra_temp_suffixes>.sb-tmp, .kate-swp</extra_temp_suffixes>
  <detect_all>true</detect_all>
</config>
"#,
        log_file.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");

    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file.as_deref(), Some(log_file.as_path()));
    assert_eq!(cfg.windows.temp_rename_ms, 250);
    assert_eq!(cfg.windows.delete_temp_ms, 1000, "unset window keeps default");
    assert_eq!(cfg.windows.temp_modify_ms, 1000, "unset window keeps default");
    assert_eq!(cfg.windows.temp_create_delete_ms, 8000);
    assert_eq!(cfg.extra_temp_suffixes, vec![".sb-tmp", ".kate-swp"]);
    assert!(cfg.detect_all);

    let naming = cfg.naming();
    assert!(naming.is_temp_file(std::path::Path::new("/x/notes.txt.kate-swp")));
}

#[test]
fn unknown_field_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><log_level>normal</log_level><download_base>/x</download_base></config>",
    )
    .unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn invalid_window_is_rejected_with_field_name() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><temp_modify_window_ms>-5</temp_modify_window_ms></config>",
    )
    .unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err:#}").contains("temp_modify_window_ms"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let td = tempdir().unwrap();
    let missing = td.path().join("nope.xml");
    let err = load_config(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
