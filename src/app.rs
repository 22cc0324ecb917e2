//! Application orchestrator.
//! Loads/merges config, initializes logging, reads events, runs detection and
//! prints the resulting operations.

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use atomic_save::AtomicSaveError;
use atomic_save::cli::{Args, OutputFormat};
use atomic_save::config::{create_template_config, load_config, resolve_config_path};
use atomic_save::input::read_events;
use atomic_save::output as out;
use atomic_save::{Config, FileOperation, sort_chronologically};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Config-location commands run before logging init.
    if args.print_config {
        match resolve_config_path(args.config.as_deref()) {
            Some(p) => {
                out::print_info(&format!("atomic_save config path:\n  {}\n", p.display()));
                if p.exists() {
                    out::print_info("A config file exists at that location.");
                } else {
                    out::print_info(
                        "No config file exists there yet. Run with --init-config to create a template.",
                    );
                }
            }
            None => out::print_error("Could not determine a config path"),
        }
        return Ok(());
    }

    if args.init_config {
        let path = resolve_config_path(args.config.as_deref())
            .context("could not determine a config path; pass --config")?;
        create_template_config(&path)?;
        out::print_success(&format!("A template config was written to: {}", path.display()));
        return Ok(());
    }

    let mut cfg = load_config(args.config.as_deref()).map_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
        e
    })?;
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    debug!("Starting atomic_save: {:?}", args);

    let result = detect(&cfg, &args);
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

fn detect(cfg: &Config, args: &Args) -> Result<()> {
    cfg.validate()?;

    let input = args.resolved_input();
    let mut events = read_events(input.as_deref())?;
    sort_chronologically(&mut events);
    let source = input
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".into());
    info!(events = events.len(), %source, "Loaded events");

    let detector = cfg.detector();
    let ops: Vec<FileOperation> = if cfg.detect_all {
        detector.detect_all(&events, &cfg.windows)
    } else {
        detector.detect(&events, &cfg.windows).into_iter().collect()
    };

    if ops.is_empty() {
        info!(events = events.len(), "No atomic save detected");
        out::print_info("No atomic save detected");
        return Ok(());
    }

    for op in &ops {
        info!(
            primary = %op.primary_path.display(),
            pattern = op.pattern().unwrap_or_default(),
            confidence = op.confidence,
            events = op.events.len(),
            "Atomic save"
        );
        match args.format {
            OutputFormat::Text => out::print_operation(op),
            OutputFormat::Json => {
                let line = serde_json::to_string(op).context("serialize operation")?;
                out::print_user(&line);
            }
        }
    }
    Ok(())
}

fn log_failure(e: &anyhow::Error) {
    if let Some(err) = e.downcast_ref::<AtomicSaveError>() {
        let code = err.code();
        let kind = err.kind();
        match err {
            AtomicSaveError::InvalidEvent { line, reason } => {
                error!(code, kind, line = *line, %reason, "Could not read events")
            }
            AtomicSaveError::InvalidRecord { record, reason } => {
                error!(code, kind, record = *record, %reason, "Could not read events")
            }
            AtomicSaveError::EmptyInput(source) => {
                error!(code, kind, %source, "Could not read events")
            }
            AtomicSaveError::InvalidConfig { path, field, reason } => {
                error!(code, kind, path = %path.display(), %field, %reason, "Invalid config")
            }
            AtomicSaveError::ConfigNotFound(path) => {
                error!(code, kind, path = %path.display(), "Invalid config")
            }
        }
    } else {
        error!(error = ?e, "Detection failed");
    }
}
