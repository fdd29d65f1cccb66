//! Panic hook printing a short crash report with the active run phase.

use super::context::{current_phase, get_progress};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════";

/// Install the crash-report panic hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info));
    }));
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        format!("DENSEGROUP CRASH REPORT  v{VERSION}  ({})", std::env::consts::OS),
        format!("Time: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        RULE.to_string(),
        format!("PANIC: {}", extract_panic_message(info)),
    ];

    if let Some(location) = info.location() {
        lines.push(format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }

    lines.push(match current_phase() {
        Some(phase) => format!("Phase: {phase}"),
        None => "Phase: (not set)".to_string(),
    });
    if let Some(metadata) = Span::current().metadata() {
        lines.push(format!("Span: {}", metadata.name()));
    }
    let (processed, total) = get_progress();
    if total > 0 {
        lines.push(format!("Progress: {processed} / {total} items"));
    }

    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(format!("{}", std::backtrace::Backtrace::capture()));
    } else {
        lines.push("Run with RUST_BACKTRACE=1 for stack trace".to_string());
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
