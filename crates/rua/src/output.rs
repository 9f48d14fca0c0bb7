//! Output formatting: table, JSON, plain.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use rua_core::{Connectivity, NodeRow, Notification, NotificationLevel, StatusBadge};

use crate::cli::ColorMode;
use crate::error::CliError;

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Renderers ────────────────────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Node table ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct NodeTableRow {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "ID")]
    index: usize,
    #[tabled(rename = "Node")]
    node_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Delay")]
    delay: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Connectivity")]
    connectivity: String,
    #[tabled(rename = "Net Type")]
    net: String,
    #[tabled(rename = "TLS")]
    tls: String,
    #[tabled(rename = "Subscription")]
    subs: String,
}

pub fn node_table_row(row: &NodeRow, color: bool) -> NodeTableRow {
    NodeTableRow {
        current: if row.is_current { "*" } else { "" },
        index: row.index,
        node_id: row.node.node_id.clone(),
        name: row.node.ps.clone(),
        address: row.node.add.clone(),
        port: row.node.port.clone(),
        delay: row.delay_label().unwrap_or_default(),
        speed: row.speed_label().unwrap_or_default(),
        connectivity: connectivity_label(row.connectivity, color),
        net: row.node.net.clone(),
        tls: row.node.tls.clone(),
        subs: row.node.subs.clone(),
    }
}

fn connectivity_label(c: Connectivity, color: bool) -> String {
    let text = match c {
        Connectivity::Probing => "probing",
        Connectivity::Unknown => "",
        Connectivity::Reachable => "ok",
        Connectivity::Unreachable => "down",
    };
    if !color {
        return text.to_owned();
    }
    match c {
        Connectivity::Reachable => text.green().to_string(),
        Connectivity::Unreachable => text.red().to_string(),
        Connectivity::Probing => text.yellow().to_string(),
        Connectivity::Unknown => text.to_owned(),
    }
}

pub fn status_badge(badge: StatusBadge, color: bool) -> String {
    let (symbol, text) = match badge {
        StatusBadge::Running => ("●", "running"),
        StatusBadge::Busy => ("◌", "restarting"),
        StatusBadge::Down => ("●", "stopped"),
    };
    if !color {
        return format!("{symbol} {text}");
    }
    match badge {
        StatusBadge::Running => format!("{} {text}", symbol.green()),
        StatusBadge::Busy => format!("{} {text}", symbol.yellow()),
        StatusBadge::Down => format!("{} {text}", symbol.red()),
    }
}

// ── Notifications ────────────────────────────────────────────────────

/// Print a gateway notification to stderr.
pub fn print_notification(note: &Notification, color: bool) {
    let label = note.level.to_string();
    let label = if color {
        match note.level {
            NotificationLevel::Success => label.green().to_string(),
            NotificationLevel::Warning => label.yellow().to_string(),
            NotificationLevel::Error => label.red().to_string(),
            NotificationLevel::Info => label.cyan().to_string(),
        }
    } else {
        label
    };
    eprintln!("{label}: {}", note.message);
}
