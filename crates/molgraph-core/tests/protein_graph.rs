use molgraph::engine::config::{
    ChainSelection, DEFAULT_INTERACTION_TYPES, GraphConfigBuilder, StrategyKind,
};
use molgraph::engine::edges::{EdgeAttribute, EdgeKind};
use molgraph::engine::error::GraphError;
use molgraph::engine::export::TensorGraph;
use molgraph::engine::graph::ProteinGraph;
use molgraph::engine::progress::ProgressReporter;
use molgraph::workflows::protein::{self, GraphOutput, GraphRequest, StructureInput};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RESIDUES: [(&str, char); 6] = [
    ("ALA", 'A'),
    ("ARG", 'R'),
    ("LYS", 'K'),
    ("LEU", 'L'),
    ("GLU", 'E'),
    ("SER", 'S'),
];

#[allow(clippy::too_many_arguments)]
fn pdb_line(
    record: &str,
    serial: usize,
    name: &str,
    alt_loc: char,
    residue: &str,
    chain: char,
    number: isize,
    pos: [f64; 3],
) -> String {
    format!(
        "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record,
        serial,
        name,
        alt_loc,
        residue,
        chain,
        number,
        pos[0],
        pos[1],
        pos[2],
        1.0,
        20.0,
        &name[..1]
    )
}

/// Six residues of chain A spaced 3.8 A apart along x, one glycine in chain B,
/// an alternate conformer and a water.
fn structure_text() -> String {
    let mut lines = Vec::new();
    let mut serial = 1;
    for (i, (residue, _)) in RESIDUES.iter().enumerate() {
        let ca = [3.8 * i as f64, 0.0, 0.0];
        let number = i as isize + 1;
        let alt = if number == 3 { 'A' } else { ' ' };
        for (name, offset) in [("N", [-1.0, 0.5, 0.0]), ("CA", [0.0; 3]), ("CB", [0.0, 1.5, 0.0])] {
            let pos = [ca[0] + offset[0], ca[1] + offset[1], ca[2] + offset[2]];
            lines.push(pdb_line("ATOM", serial, name, alt, residue, 'A', number, pos));
            serial += 1;
        }
        if number == 3 {
            lines.push(pdb_line("ATOM", serial, "CA", 'B', residue, 'A', number, [100.0; 3]));
            serial += 1;
        }
    }
    lines.push(pdb_line("ATOM", serial, "CA", ' ', "GLY", 'B', 1, [0.0, 10.0, 0.0]));
    lines.push(pdb_line("HETATM", serial + 1, "O", ' ', "HOH", 'A', 201, [5.0, 5.0, 5.0]));
    lines.push(pdb_line("HETATM", serial + 2, "ZN", ' ', "ZN", 'A', 301, [9.0, 9.0, 9.0]));
    lines.push("END".to_string());
    lines.join("\n") + "\n"
}

fn contacts_text() -> String {
    [
        "# total_frames:1 beg:0 end:0 stride:1 interaction_types:all",
        "# Columns: frame, interaction_type, atom_1, atom_2",
        "0\thbbb\tA:ALA:1:N\tA:LEU:4:O",
        "0\thbbb\tA:ALA:1:O\tA:LEU:4:N",
        "0\tsb\tA:ARG:2:NH1\tA:GLU:5:OE1",
        "0\txx\tA:ARG:2:CB\tA:SER:6:CB",
        "0\thp\tX:HOH:5:O\tA:SER:6:OG",
        "0\thp\tA:ALA:1:CB\tB:GLY:1:CA",
    ]
    .join("\n")
        + "\n"
}

fn dssp_text(skip: &[isize]) -> String {
    let mut lines = vec![
        "==== Secondary Structure Definition by the program DSSP ====".to_string(),
        "  #  RESIDUE AA STRUCTURE BP1 BP2  ACC".to_string(),
    ];
    let rows = RESIDUES
        .iter()
        .enumerate()
        .map(|(i, (_, aa))| ('A', i as isize + 1, *aa, 'H', 50 + 10 * i as i32))
        .chain(std::iter::once(('B', 1, 'G', ' ', 42)));
    for (k, (chain, number, aa, ss, acc)) in rows.enumerate() {
        if chain == 'A' && skip.contains(&number) {
            continue;
        }
        lines.push(format!(
            "{:>5}{:>5} {} {}  {}{:>17}{:>4}",
            k + 1,
            number,
            chain,
            aa,
            ss,
            "",
            acc
        ));
    }
    lines.join("\n") + "\n"
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1tst.pdb"), structure_text()).unwrap();
        fs::write(dir.path().join("1tst_contacts.tsv"), contacts_text()).unwrap();
        fs::write(dir.path().join("1tst.dssp"), dssp_text(&[3])).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn distance(graph: &ProteinGraph, source: usize, target: usize) -> f64 {
    let a = graph.nodes()[source].coords;
    let b = graph.nodes()[target].coords;
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

#[test]
fn builds_contact_distance_and_feature_graph_from_files() {
    let fixture = Fixture::new();
    let config = GraphConfigBuilder::new()
        .distance_cutoff(6.0)
        .include_ss(true)
        .build()
        .unwrap();
    let request = GraphRequest {
        strategies: vec![StrategyKind::Contacts, StrategyKind::Distance],
        contact_file: Some(fixture.path("1tst_contacts.tsv")),
        dssp_file: Some(fixture.path("1tst.dssp")),
        ..GraphRequest::default()
    };

    let output = protein::run(
        &StructureInput::File(fixture.path("1tst.pdb")),
        &request,
        &config,
        &ProgressReporter::new(),
    )
    .unwrap();
    let graph = output.graph();

    // Six chain-A residues (alternate conformer B dropped) plus one chain-B glycine.
    assert_eq!(graph.node_count(), 7);
    assert!(graph.nodes().iter().all(|n| n.h.len() == 7));
    assert_eq!(graph.nodes()[2].coords, [7.6, 0.0, 0.0]);

    let contacts: Vec<_> = graph.edges_of_kind(EdgeKind::Interaction).collect();
    assert_eq!(contacts.len(), 3);
    for edge in &contacts {
        let EdgeAttribute::Interaction(one_hot) = &edge.attribute else {
            panic!("contact edges carry interaction one-hots");
        };
        assert_eq!(one_hot.len(), DEFAULT_INTERACTION_TYPES.len());
        assert_eq!(one_hot.iter().sum::<f64>(), 1.0);
    }

    let distances: Vec<_> = graph.edges_of_kind(EdgeKind::Distance).collect();
    assert_eq!(distances.len(), 5);
    for edge in distances {
        assert!(edge.source > edge.target);
        let d = distance(graph, edge.source, edge.target);
        assert!(d > 0.0 && d < 6.0);
    }

    // Residue 3 has no DSSP row; identity alignment leaves it zeroed.
    let lys = &graph.nodes()[2];
    assert_eq!(lys.asa, Some(0.0));
    assert_eq!(lys.ss, Some([0.0; 9]));
    let leu = &graph.nodes()[3];
    assert_eq!(leu.asa, Some(80.0));
    assert_eq!(leu.ss.unwrap()[1], 1.0);
    let gly = &graph.nodes()[6];
    assert_eq!(gly.ss.unwrap()[8], 1.0);

    let tensors = TensorGraph::from_graph(graph);
    assert!(tensors.x.iter().all(|row| row.len() == 7 + 3 + 9 + 2));
    assert_eq!(tensors.edge_attr[0].len(), DEFAULT_INTERACTION_TYPES.len() + 1);
}

#[test]
fn resolves_cached_artifacts_for_pdb_codes() {
    let fixture = Fixture::new();
    let config = GraphConfigBuilder::new()
        .pdb_dir(fixture.root().to_path_buf())
        .contacts_dir(fixture.root().to_path_buf())
        .build()
        .unwrap();

    let output = protein::run(
        &StructureInput::PdbCode("1tst".into()),
        &GraphRequest::default(),
        &config,
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(output.graph().edge_count(), 3);
}

#[test]
fn chain_selection_restricts_nodes_and_contacts() {
    let fixture = Fixture::new();
    let request = GraphRequest {
        chains: ChainSelection::Chains(vec!['A']),
        contact_file: Some(fixture.path("1tst_contacts.tsv")),
        ..GraphRequest::default()
    };
    let output = protein::run(
        &StructureInput::File(fixture.path("1tst.pdb")),
        &request,
        &GraphConfigBuilder::new().build().unwrap(),
        &ProgressReporter::new(),
    )
    .unwrap();
    assert_eq!(output.graph().node_count(), 6);
    assert_eq!(output.graph().edge_count(), 2);
}

#[test]
fn heteroatoms_are_nodes_when_kept_and_waters_stay_excluded() {
    let fixture = Fixture::new();
    let config = GraphConfigBuilder::new()
        .keep_heteroatoms(true)
        .embedding("kidera".parse().unwrap())
        .build()
        .unwrap();
    let request = GraphRequest {
        strategies: vec![StrategyKind::Delaunay],
        encode_labels: true,
        ..GraphRequest::default()
    };
    let output = protein::run(
        &StructureInput::File(fixture.path("1tst.pdb")),
        &request,
        &config,
        &ProgressReporter::new(),
    )
    .unwrap();

    let GraphOutput::Encoded(encoded) = output else {
        panic!("labels were requested to be encoded");
    };
    let graph = &encoded.graph;
    assert_eq!(graph.node_count(), 8);
    let zinc = &graph.nodes()[6];
    assert_eq!(zinc.residue_name, "ZN");
    assert_eq!(zinc.h, vec![0.0; 10]);
    assert!(graph.nodes().iter().all(|n| n.residue_name != "HOH"));
    assert!(encoded.residue_name_encoder.encode("ZN").is_some());
}

#[test]
fn missing_structure_file_is_reported() {
    let fixture = Fixture::new();
    let err = protein::run(
        &StructureInput::File(fixture.path("absent.pdb")),
        &GraphRequest {
            strategies: vec![StrategyKind::Dense],
            ..GraphRequest::default()
        },
        &GraphConfigBuilder::new().build().unwrap(),
        &ProgressReporter::new(),
    )
    .unwrap_err();
    assert!(matches!(err, GraphError::MissingArtifact { .. }));
}
