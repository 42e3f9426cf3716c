use crate::cli::{RnaArgs, TableFormat};
use crate::error::Result;
use crate::utils::output;
use molgraph::workflows::rna::{RnaEdgeKind, RnaGraphBuilder};
use tracing::info;

pub fn run(args: RnaArgs) -> Result<()> {
    let graph = RnaGraphBuilder::new().try_build(&args.dotbracket, args.sequence.as_deref())?;
    info!(
        "RNA graph built: {} nodes, {} backbone edges, {} base pairs.",
        graph.node_count(),
        graph.edges_of_kind(RnaEdgeKind::Backbone).count(),
        graph.edges_of_kind(RnaEdgeKind::BasePair).count()
    );

    let destination = args.output.as_deref();
    match args.format {
        TableFormat::Json => output::write_json(&graph, destination)?,
        TableFormat::Csv => output::write_csv(&graph.edges, destination)?,
    }

    if let Some(path) = destination {
        eprintln!("✓ RNA graph written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn args(dotbracket: &str, output: std::path::PathBuf, format: TableFormat) -> RnaArgs {
        RnaArgs {
            dotbracket: dotbracket.to_string(),
            sequence: None,
            output: Some(output),
            format,
        }
    }

    #[test]
    fn edges_are_written_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hairpin.csv");
        run(args("(.)", path.clone(), TableFormat::Csv)).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "source,target,kind\n1,0,backbone\n2,1,backbone\n2,0,base_pair\n"
        );
    }

    #[test]
    fn unbalanced_structure_reports_the_position() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args("(()", dir.path().join("x.json"), TableFormat::Json)).unwrap_err();
        assert!(matches!(err, CliError::Rna(_)));
        assert!(!dir.path().join("x.json").exists());
    }
}
