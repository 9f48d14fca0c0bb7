//! `rua nodes`, `rua select`, `rua probe`.

use rua_core::{DocumentKind, Gateway, NodeRow, NodeView, RowEvent, SortOrder};

use crate::cli::{GlobalOpts, NodesArgs, OutputFormat, SortArg};
use crate::error::CliError;
use crate::output;

fn render_rows(rows: &[NodeRow], global: &GlobalOpts) -> Result<String, CliError> {
    match global.output {
        OutputFormat::Table => {
            let color = output::should_color(global.color);
            let table: Vec<_> = rows
                .iter()
                .map(|row| output::node_table_row(row, color))
                .collect();
            Ok(output::render_table(&table))
        }
        // Rows carry view-only fields; structured output emits the nodes.
        OutputFormat::Json => {
            let nodes: Vec<&rua_core::Node> = rows.iter().map(|r| &r.node).collect();
            output::render_json(&nodes)
        }
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|r| r.node.node_id.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn find_row(rows: Vec<NodeRow>, node_id: &str) -> Result<NodeRow, CliError> {
    rows.into_iter()
        .find(|r| r.node.node_id == node_id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "node".into(),
            identifier: node_id.into(),
            hint: "Run: rua nodes to see available nodes".into(),
        })
}

pub async fn list(gateway: &Gateway, args: &NodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    gateway.reload(DocumentKind::Runtime).await?;

    let mut view = NodeView::new();
    view.set_sort(match args.sort {
        None => SortOrder::Unsorted,
        Some(SortArg::Asc) => SortOrder::Ascending,
        Some(SortArg::Desc) => SortOrder::Descending,
    });
    let rows = view.project(&gateway.store().snapshot());

    output::print_output(&render_rows(&rows, global)?);
    Ok(())
}

pub async fn select(gateway: &Gateway, node_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    gateway.reload(DocumentKind::Runtime).await?;
    let view = NodeView::new();
    let row = find_row(view.project(&gateway.store().snapshot()), node_id)?;

    view.handle_row_event(gateway, &row, RowEvent::DoubleActivate)
        .await?;

    // Selection is whatever the backend reports afterwards.
    gateway.reload(DocumentKind::Runtime).await?;
    let current = gateway.store().runtime_config().current_id.clone();
    if matches!(global.output, OutputFormat::Table) {
        output::print_output(&format!(
            "Selected {} ({})",
            row.node.ps,
            current.as_deref().unwrap_or(node_id)
        ));
    }
    Ok(())
}

pub async fn probe(gateway: &Gateway, node_id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    gateway.reload(DocumentKind::Runtime).await?;
    find_row(NodeView::new().project(&gateway.store().snapshot()), node_id)?;

    gateway.probe_node(node_id).await?;

    let row = find_row(NodeView::new().project(&gateway.store().snapshot()), node_id)?;
    output::print_output(&render_rows(std::slice::from_ref(&row), global)?);
    Ok(())
}
