// src/utils/log.rs

//! Server-style console helpers layered on the `log` facade.
//!
//! Level filtering and timestamps come from whichever logger the binary
//! installs; these helpers only shape the messages.

/// Width of separator and header rules.
const RULE_WIDTH: usize = 60;

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("{}", format_step(step_num, total, message));
}

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(RULE_WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a block of text line by line, preserving its layout.
pub fn block(text: &str) {
    for line in text.lines() {
        log::info!("{line}");
    }
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}

fn format_step(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {step_num}/{total}] {message}")
}
