//! `rua status`: core state, local proxy endpoint, selected node.

use serde::Serialize;

use rua_core::{CoreStatus, DocumentKind, Gateway, StatusBadge};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    core_status: CoreStatus,
    current_node: Option<String>,
    current_node_name: Option<String>,
    socks_proxy: Option<String>,
    subscriptions: usize,
    nodes: usize,
}

pub async fn handle(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    gateway.reload(DocumentKind::Runtime).await?;
    // The engine document only adds the proxy endpoint; status still
    // prints without it.
    if let Err(e) = gateway.reload(DocumentKind::Core).await {
        tracing::debug!(error = %e, "status without core config");
    }

    let snap = gateway.store().snapshot();
    let rua = snap.config().rua();
    let report = StatusReport {
        core_status: rua.core_status,
        current_node: rua.current_id.clone(),
        current_node_name: rua
            .current_id
            .as_deref()
            .and_then(|id| rua.find_node(id))
            .map(|n| n.ps.clone()),
        socks_proxy: snap
            .config()
            .core()
            .and_then(|core| core.socks_inbound())
            .map(rua_core::Inbound::proxy_url),
        subscriptions: rua.subscriptions.len(),
        nodes: rua.node_count(),
    };

    let out = match global.output {
        OutputFormat::Json => output::render_json(&report)?,
        OutputFormat::Plain => report.core_status.to_string(),
        OutputFormat::Table => {
            let color = output::should_color(global.color);
            let node = match (&report.current_node_name, &report.current_node) {
                (Some(name), Some(id)) => format!("{name} ({id})"),
                (None, Some(id)) => id.clone(),
                _ => "-".into(),
            };
            [
                format!(
                    "Core:     {}",
                    output::status_badge(StatusBadge::from(report.core_status), color)
                ),
                format!("Node:     {node}"),
                format!(
                    "Proxy:    {}",
                    report.socks_proxy.as_deref().unwrap_or("-")
                ),
                format!(
                    "Nodes:    {} in {} subscription(s)",
                    report.nodes, report.subscriptions
                ),
            ]
            .join("\n")
        }
    };
    output::print_output(&out);
    Ok(())
}
