use crate::cli::{GraphFormat, ProteinArgs};
use crate::config::PartialGraphConfig;
use crate::error::Result;
use crate::utils::output;
use crate::utils::progress::CliProgressHandler;
use molgraph::engine::graph::ProteinGraph;
use molgraph::engine::progress::ProgressReporter;
use molgraph::workflows;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct EdgeRow {
    source: usize,
    target: usize,
    kind: &'static str,
    /// Attribute values joined by `;`.
    values: String,
}

fn edge_rows(graph: &ProteinGraph) -> impl Iterator<Item = EdgeRow> + '_ {
    graph.edges().iter().map(|edge| EdgeRow {
        source: edge.source,
        target: edge.target,
        kind: edge.kind().export_name(),
        values: edge
            .attribute
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(";"),
    })
}

pub fn run(args: ProteinArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialGraphConfig::from_file(path)?,
        None => PartialGraphConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the protein graph workflow...");
    let graph_output = workflows::protein::run(
        &settings.input,
        &settings.request,
        &settings.config,
        &reporter,
    )?;
    let summary = graph_output.graph().summary();
    info!("Workflow finished: {}", summary);

    let destination = args.output.as_deref();
    match args.format {
        GraphFormat::Json => output::write_json(
            &graph_output.to_attributed(settings.config.remove_string_labels),
            destination,
        )?,
        GraphFormat::Tensor => output::write_json(&graph_output.to_tensors(), destination)?,
        GraphFormat::Csv => output::write_csv(edge_rows(graph_output.graph()), destination)?,
    }

    if let Some(path) = destination {
        eprintln!("✓ Graph ({}) written to: {}", summary, path.display());
    }
    Ok(())
}
