use super::external::{ArtifactKind, ArtifactResolver};
use crate::core::io::contacts::ContactReport;
use crate::core::io::dssp;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::record::{AtomRecord, AtomTable};
use crate::engine::config::{ChainSelection, ConfigError, GraphConfig, StrategyKind};
use crate::engine::edges::{
    ContactEdges, CustomEdge, CustomEdges, DelaunayEdges, DenseEdges, DistanceEdges, EdgeContext,
    EdgeStrategy, KnnEdges,
};
use crate::engine::error::GraphError;
use crate::engine::export::{AttributedGraph, TensorGraph};
use crate::engine::features::{align, descriptors_from_dssp};
use crate::engine::graph::{EncodedGraph, ProteinGraph};
use crate::engine::preprocess::{distinct_nodes, preprocess};
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Where the coordinates of a structure come from.
#[derive(Debug, Clone)]
pub enum StructureInput {
    /// A PDB accession code, read from `<pdb_dir>/<code>.pdb`.
    PdbCode(String),
    File(PathBuf),
    Table(AtomTable),
}

impl StructureInput {
    fn stem(&self) -> Option<String> {
        match self {
            StructureInput::PdbCode(code) => Some(code.clone()),
            StructureInput::File(path) => path.file_stem().map(|s| s.to_string_lossy().into_owned()),
            StructureInput::Table(_) => None,
        }
    }

    fn path(&self, config: &GraphConfig) -> Result<Option<PathBuf>, GraphError> {
        match self {
            StructureInput::PdbCode(code) => {
                let dir = config
                    .paths
                    .pdb_dir
                    .as_ref()
                    .ok_or(ConfigError::MissingParameter("pdb_dir"))?;
                Ok(Some(dir.join(format!("{}.pdb", code))))
            }
            StructureInput::File(path) => Ok(Some(path.clone())),
            StructureInput::Table(_) => Ok(None),
        }
    }
}

/// User-supplied edges, given inline or as a `res1,res2,data...` CSV file.
#[derive(Debug, Clone)]
pub enum CustomEdgeSource {
    Edges(Vec<CustomEdge>),
    File(PathBuf),
}

/// What to build for one structure.
#[derive(Debug, Clone)]
pub struct GraphRequest {
    pub chains: ChainSelection,
    /// Edge strategies, applied in order.
    pub strategies: Vec<StrategyKind>,
    pub k_nn: Option<usize>,
    pub contact_file: Option<PathBuf>,
    pub custom_edges: Option<CustomEdgeSource>,
    pub dssp_file: Option<PathBuf>,
    pub encode_labels: bool,
}

impl Default for GraphRequest {
    fn default() -> Self {
        Self {
            chains: ChainSelection::All,
            strategies: vec![StrategyKind::Contacts],
            k_nn: None,
            contact_file: None,
            custom_edges: None,
            dssp_file: None,
            encode_labels: false,
        }
    }
}

impl GraphRequest {
    fn wants(&self, kind: StrategyKind) -> bool {
        self.strategies.contains(&kind)
    }

    /// Checks that the request is self-consistent before any file is touched.
    pub fn validate(&self, config: &GraphConfig) -> Result<(), GraphError> {
        if self.k_nn.is_some() && !self.wants(StrategyKind::KNearest) {
            return Err(GraphError::Precondition(
                "k_nn given but the knn strategy is not requested".into(),
            ));
        }
        if self.wants(StrategyKind::KNearest) && self.k_nn.is_none() {
            return Err(GraphError::Precondition(
                "the knn strategy needs k_nn".into(),
            ));
        }
        if self.contact_file.is_some() && !self.wants(StrategyKind::Contacts) {
            return Err(GraphError::Precondition(
                "contact file given but the contacts strategy is not requested".into(),
            ));
        }
        if self.wants(StrategyKind::Distance) && config.distance_cutoff.is_none() {
            return Err(ConfigError::MissingParameter("distance_cutoff").into());
        }
        if self.wants(StrategyKind::Custom) && self.custom_edges.is_none() {
            return Err(GraphError::Precondition(
                "the custom strategy needs custom edges".into(),
            ));
        }
        Ok(())
    }
}

/// A finished protein graph, with encoded labels when they were requested.
#[derive(Debug, Clone)]
pub enum GraphOutput {
    Plain(ProteinGraph),
    Encoded(EncodedGraph),
}

impl GraphOutput {
    pub fn graph(&self) -> &ProteinGraph {
        match self {
            GraphOutput::Plain(graph) => graph,
            GraphOutput::Encoded(encoded) => &encoded.graph,
        }
    }

    pub fn into_graph(self) -> ProteinGraph {
        match self {
            GraphOutput::Plain(graph) => graph,
            GraphOutput::Encoded(encoded) => encoded.graph,
        }
    }

    pub fn to_attributed(&self, remove_string_labels: bool) -> AttributedGraph {
        match self {
            GraphOutput::Plain(graph) => AttributedGraph::from_graph(graph, remove_string_labels),
            GraphOutput::Encoded(encoded) => AttributedGraph::from_encoded(encoded, remove_string_labels),
        }
    }

    pub fn to_tensors(&self) -> TensorGraph {
        match self {
            GraphOutput::Plain(graph) => TensorGraph::from_graph(graph),
            GraphOutput::Encoded(encoded) => TensorGraph::from_encoded(encoded),
        }
    }
}

/// Builds a protein graph.
///
/// # Arguments
///
/// * `input` - The structure to read.
/// * `request` - Chains, edge strategies and their inputs.
/// * `config` - Preprocessing, features, thresholds and artifact locations.
/// * `reporter` - Receives phase and strategy progress.
///
/// # Errors
///
/// Returns [`GraphError::Precondition`] or [`GraphError::Config`] for inconsistent
/// requests (checked before any I/O), and I/O, parse or tool errors from the later phases.
#[instrument(skip_all, name = "protein_graph_workflow")]
pub fn run(
    input: &StructureInput,
    request: &GraphRequest,
    config: &GraphConfig,
    reporter: &ProgressReporter,
) -> Result<GraphOutput, GraphError> {
    // === Phase 0: Validation and structure loading ===
    let (table, structure_path) = reporter.phase("Preparation", || {
        request.validate(config)?;
        let structure_path = input.path(config)?;
        let table = load_structure(input, structure_path.as_deref())?;
        info!("Loaded {} ATOM and {} HETATM records.", table.atoms.len(), table.hetatms.len());
        Ok::<_, GraphError>((table, structure_path))
    })?;
    let stem = input.stem();

    // === Phase 1: Nodes ===
    let (records, mut graph) = reporter.phase("Nodes", || {
        let records = preprocess(&table, &config.preprocess, &request.chains)?;
        let records = distinct_nodes(records, config.preprocess.granularity.is_atom_level());
        let graph = ProteinGraph::from_records(&records, &config.preprocess.granularity, config.embedding);
        Ok::<_, GraphError>((records, graph))
    })?;

    // === Phase 2: Edges ===
    reporter.phase("Edges", || {
        add_edges(&mut graph, &records, request, config, stem.as_deref(), structure_path.as_deref(), reporter)
    })?;

    // === Phase 3: Secondary-structure features ===
    if config.include_ss {
        reporter.phase("Features", || {
            attach_secondary_structure(&mut graph, request, config, stem.as_deref(), structure_path.as_deref())
        })?;
    }

    // === Phase 4: Finalise ===
    let output = reporter.phase("Finalise", || {
        let output = if request.encode_labels {
            GraphOutput::Encoded(graph.encode_labels())
        } else {
            GraphOutput::Plain(graph)
        };
        Ok::<_, GraphError>(output)
    })?;

    info!("Graph complete: {}.", output.graph().summary());
    Ok(output)
}

fn load_structure(input: &StructureInput, path: Option<&Path>) -> Result<AtomTable, GraphError> {
    match (input, path) {
        (StructureInput::Table(table), _) => Ok(table.clone()),
        (_, Some(path)) => {
            if !path.is_file() {
                return Err(GraphError::MissingArtifact {
                    kind: "structure file",
                    path: path.to_path_buf(),
                });
            }
            Ok(PdbFile::read_from_path(path)?)
        }
        (_, None) => Err(GraphError::Internal("structure input has no path".into())),
    }
}

fn add_edges(
    graph: &mut ProteinGraph,
    records: &[AtomRecord],
    request: &GraphRequest,
    config: &GraphConfig,
    stem: Option<&str>,
    structure_path: Option<&Path>,
    reporter: &ProgressReporter,
) -> Result<(), GraphError> {
    let ids = graph.node_ids();
    let ctx = EdgeContext::new(
        records,
        &ids,
        &config.preprocess.granularity,
        config.long_interaction_threshold,
    );

    for kind in &request.strategies {
        let strategy = build_strategy(*kind, request, config, stem, structure_path)?;
        let name = strategy.name();
        reporter.report(Progress::StrategyStart { name });

        let candidates = strategy.edges(&ctx)?;
        let proposed = candidates.len();
        let inserted = graph.add_edges(candidates);

        reporter.report(Progress::StrategyFinish { name, edges: inserted });
        info!(strategy = name, "Added {} of {} proposed edges.", inserted, proposed);
    }

    if graph.edge_count() == 0 {
        warn!("Graph has no edges.");
    }
    Ok(())
}

fn build_strategy(
    kind: StrategyKind,
    request: &GraphRequest,
    config: &GraphConfig,
    stem: Option<&str>,
    structure_path: Option<&Path>,
) -> Result<Box<dyn EdgeStrategy>, GraphError> {
    let strategy: Box<dyn EdgeStrategy> = match kind {
        StrategyKind::Contacts => {
            let path = ArtifactResolver::new(&config.paths).resolve(
                ArtifactKind::Contacts,
                request.contact_file.as_deref(),
                stem,
                structure_path,
            )?;
            let report = ContactReport::from_path(&path)?;
            Box::new(ContactEdges::new(
                report,
                config.interactions.clone(),
                request.chains.clone(),
            ))
        }
        StrategyKind::Distance => {
            let cutoff = config
                .distance_cutoff
                .ok_or(ConfigError::MissingParameter("distance_cutoff"))?;
            Box::new(DistanceEdges::new(cutoff))
        }
        StrategyKind::KNearest => {
            let k = request.k_nn.ok_or(ConfigError::MissingParameter("k_nn"))?;
            Box::new(KnnEdges::new(k, config.knn_mode)?)
        }
        StrategyKind::Delaunay => Box::new(DelaunayEdges::new()),
        StrategyKind::Custom => match &request.custom_edges {
            Some(CustomEdgeSource::Edges(edges)) => Box::new(CustomEdges::new(edges.clone())),
            Some(CustomEdgeSource::File(path)) => Box::new(CustomEdges::from_path(path)?),
            None => return Err(ConfigError::MissingParameter("custom_edges").into()),
        },
        StrategyKind::Dense => Box::new(DenseEdges::new()),
    };
    Ok(strategy)
}

fn attach_secondary_structure(
    graph: &mut ProteinGraph,
    request: &GraphRequest,
    config: &GraphConfig,
    stem: Option<&str>,
    structure_path: Option<&Path>,
) -> Result<(), GraphError> {
    let path = ArtifactResolver::new(&config.paths).resolve(
        ArtifactKind::Dssp,
        request.dssp_file.as_deref(),
        stem,
        structure_path,
    )?;
    let records = dssp::read_from_path(&path)?;
    let descriptors = descriptors_from_dssp(&records, &request.chains);
    info!("Read {} DSSP residues for {} nodes.", descriptors.len(), graph.node_count());

    let features = align(&graph.node_ids(), &descriptors, config.alignment);
    graph.attach_features(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::GraphConfigBuilder;
    use crate::engine::edges::EdgeKind;
    use crate::engine::progress::ProgressCallback;
    use nalgebra::Point3;
    use std::sync::{Arc, Mutex};

    fn helix_table() -> AtomTable {
        (0..8)
            .map(|i| {
                let t = i as f64 * 100f64.to_radians();
                AtomRecord::new(
                    "CA",
                    ["ALA", "GLY", "LEU", "SER"][i % 4],
                    'A',
                    i as isize + 1,
                    Point3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64),
                )
            })
            .collect()
    }

    fn request(strategies: Vec<StrategyKind>) -> GraphRequest {
        GraphRequest {
            strategies,
            ..GraphRequest::default()
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn k_nn_without_knn_strategy_is_rejected() {
            let mut req = request(vec![StrategyKind::Distance]);
            req.k_nn = Some(3);
            let err = req.validate(&GraphConfig::default()).unwrap_err();
            assert!(matches!(err, GraphError::Precondition(_)));
        }

        #[test]
        fn contact_file_without_contacts_strategy_is_rejected() {
            let mut req = request(vec![StrategyKind::Delaunay]);
            req.contact_file = Some("contacts.tsv".into());
            assert!(matches!(
                req.validate(&GraphConfig::default()),
                Err(GraphError::Precondition(_))
            ));
        }

        #[test]
        fn distance_without_cutoff_is_a_missing_parameter() {
            let err = request(vec![StrategyKind::Distance])
                .validate(&GraphConfig::default())
                .unwrap_err();
            assert!(matches!(
                err,
                GraphError::Config(ConfigError::MissingParameter("distance_cutoff"))
            ));
        }

        #[test]
        fn custom_without_edges_is_rejected() {
            assert!(
                request(vec![StrategyKind::Custom])
                    .validate(&GraphConfig::default())
                    .is_err()
            );
        }

        #[test]
        fn validation_runs_before_reading_the_structure() {
            let input = StructureInput::File("/definitely/not/here.pdb".into());
            let err = run(
                &input,
                &request(vec![StrategyKind::Distance]),
                &GraphConfig::default(),
                &ProgressReporter::new(),
            )
            .unwrap_err();
            assert!(matches!(err, GraphError::Config(_)));
        }
    }

    mod pipeline {
        use super::*;

        #[test]
        fn geometric_strategies_combine_into_one_multigraph() {
            let config = GraphConfigBuilder::new().distance_cutoff(5.0).build().unwrap();
            let mut req = request(vec![StrategyKind::Distance, StrategyKind::KNearest]);
            req.k_nn = Some(2);

            let output = run(
                &StructureInput::Table(helix_table()),
                &req,
                &config,
                &ProgressReporter::new(),
            )
            .unwrap();
            let graph = output.graph();

            assert_eq!(graph.node_count(), 8);
            assert!(graph.nodes().iter().all(|n| n.h.len() == 7));
            assert_eq!(graph.edges_of_kind(EdgeKind::KNearest).count(), 16);
            for edge in graph.edges_of_kind(EdgeKind::Distance) {
                let a = graph.nodes()[edge.source].coords;
                let b = graph.nodes()[edge.target].coords;
                let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
                assert!(d < 5.0 && d > 0.0);
            }
        }

        #[test]
        fn sequence_separation_applies_to_geometric_edges() {
            let config = GraphConfigBuilder::new()
                .distance_cutoff(100.0)
                .long_interaction_threshold(2)
                .build()
                .unwrap();
            let output = run(
                &StructureInput::Table(helix_table()),
                &request(vec![StrategyKind::Distance]),
                &config,
                &ProgressReporter::new(),
            )
            .unwrap();
            let graph = output.graph();
            assert!(graph.edge_count() > 0);
            for edge in graph.edges() {
                let n1 = graph.nodes()[edge.source].residue_number;
                let n2 = graph.nodes()[edge.target].residue_number;
                assert!(n1.abs_diff(n2) > 2);
            }
        }

        #[test]
        fn contacts_without_report_or_tool_is_a_missing_artifact() {
            let err = run(
                &StructureInput::Table(helix_table()),
                &GraphRequest::default(),
                &GraphConfig::default(),
                &ProgressReporter::new(),
            )
            .unwrap_err();
            assert!(matches!(err, GraphError::MissingArtifact { .. }));
        }

        #[test]
        fn encoded_output_keeps_the_encoders() {
            let mut req = request(vec![StrategyKind::Dense]);
            req.encode_labels = true;
            let output = run(
                &StructureInput::Table(helix_table()),
                &req,
                &GraphConfig::default(),
                &ProgressReporter::new(),
            )
            .unwrap();
            let GraphOutput::Encoded(encoded) = output else {
                panic!("labels were requested to be encoded");
            };
            assert_eq!(encoded.residue_name_encoder.classes().len(), 4);
            assert_eq!(encoded.graph.edge_count(), 8 * 7);
        }

        #[test]
        fn reports_phases_and_strategies_in_order() {
            let events = Arc::new(Mutex::new(Vec::new()));
            let sink = events.clone();
            let callback: ProgressCallback = Box::new(move |event| {
                let label = match event {
                    Progress::PhaseStart { name } => format!("start {}", name),
                    Progress::StrategyFinish { name, .. } => format!("strategy {}", name),
                    _ => return,
                };
                sink.lock().unwrap().push(label);
            });
            let reporter = ProgressReporter::with_callback(callback);

            run(
                &StructureInput::Table(helix_table()),
                &request(vec![StrategyKind::Delaunay]),
                &GraphConfig::default(),
                &reporter,
            )
            .unwrap();

            assert_eq!(
                *events.lock().unwrap(),
                vec![
                    "start Preparation",
                    "start Nodes",
                    "start Edges",
                    "strategy delaunay",
                    "start Finalise",
                ]
            );
        }
    }
}
