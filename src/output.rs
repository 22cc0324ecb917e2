//! User-facing output.
//! Status lines go to stderr so stdout only carries detection results.
//! Colors are enabled only when the stream is a TTY.

use owo_colors::OwoColorize;

use crate::operation::FileOperation;

fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "info:".cyan().bold(), msg);
    } else {
        eprintln!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {}", "ok:".green().bold(), msg);
    } else {
        eprintln!("ok: {}", msg);
    }
}

/// Print a plain line on stdout (no prefix). Used for machine-readable results.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// One-line plain summary of an operation. Stable enough to script against.
pub fn format_operation(op: &FileOperation) -> String {
    format!(
        "{}\t{}\t{:.2}\t{}ms\t{} events\ttemp={}",
        op.pattern().unwrap_or("unknown"),
        op.primary_path.display(),
        op.confidence,
        op.duration_ms(),
        op.events.len(),
        op.temp_file().unwrap_or("-"),
    )
}

/// Print an operation summary to stdout (pattern highlighted on a TTY).
pub fn print_operation(op: &FileOperation) {
    let line = format_operation(op);
    if stdout_is_tty() {
        let (pattern, rest) = line.split_once('\t').unwrap_or((line.as_str(), ""));
        println!("{}\t{}", pattern.green().bold(), rest);
    } else {
        println!("{}", line);
    }
}
