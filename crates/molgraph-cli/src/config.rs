use crate::cli::ProteinArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use molgraph::engine::config::{self as core_config, GraphConfig, GraphConfigBuilder, StrategyKind};
use molgraph::workflows::protein::{CustomEdgeSource, GraphRequest, StructureInput};
use serde::Deserialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialNodesConfig {
    granularity: Option<String>,
    chains: Option<String>,
    keep_heteroatoms: Option<bool>,
    exclude_waters: Option<bool>,
    deprotonate: Option<bool>,
    embedding: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialEdgesConfig {
    strategies: Option<Vec<String>>,
    interactions: Option<Vec<String>>,
    distance_cutoff: Option<f64>,
    long_interaction_threshold: Option<usize>,
    k_nn: Option<usize>,
    knn_mode: Option<String>,
    contact_file: Option<PathBuf>,
    custom_edges: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialFeaturesConfig {
    include_ss: Option<bool>,
    alignment: Option<String>,
    dssp_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOutputConfig {
    encode_labels: Option<bool>,
    remove_string_labels: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPathsConfig {
    pdb_dir: Option<PathBuf>,
    contacts_dir: Option<PathBuf>,
    dssp_dir: Option<PathBuf>,
    contacts_tool: Option<PathBuf>,
    dssp_tool: Option<PathBuf>,
}

/// The `protein` command's TOML configuration; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialGraphConfig {
    nodes: Option<PartialNodesConfig>,
    edges: Option<PartialEdgesConfig>,
    features: Option<PartialFeaturesConfig>,
    output: Option<PartialOutputConfig>,
    paths: Option<PartialPathsConfig>,
}

/// Everything the protein workflow needs, after merging file, `--set` and CLI values.
#[derive(Debug)]
pub struct ProteinSettings {
    pub input: StructureInput,
    pub request: GraphRequest,
    pub config: GraphConfig,
}

fn parse_field<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| CliError::Config(format!("Invalid value for '{}': {}", key, e)))
}

impl PartialGraphConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &ProteinArgs) -> Result<ProteinSettings> {
        self.apply_set_values(&args.set_values)?;

        let nodes = self.nodes.take().unwrap_or_default();
        let edges = self.edges.take().unwrap_or_default();
        let features = self.features.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();
        let paths = self.paths.take().unwrap_or_default();

        let input = match (&args.source.input, &args.source.pdb_code) {
            (Some(path), _) => StructureInput::File(path.clone()),
            (None, Some(code)) => StructureInput::PdbCode(code.clone()),
            (None, None) => {
                return Err(CliError::Argument(
                    "Either --input or --pdb-code is required.".to_string(),
                ));
            }
        };

        let mut builder = GraphConfigBuilder::new()
            .keep_heteroatoms(args.keep_hets || nodes.keep_heteroatoms.unwrap_or(false))
            .include_ss(args.include_ss || features.include_ss.unwrap_or(false))
            .remove_string_labels(
                args.remove_string_labels || output.remove_string_labels.unwrap_or(false),
            );

        if let Some(granularity) = args.granularity.as_ref().or(nodes.granularity.as_ref()) {
            builder = builder.granularity(parse_field("nodes.granularity", granularity)?);
        }
        if let Some(embedding) = args.embedding.as_ref().or(nodes.embedding.as_ref()) {
            builder = builder.embedding(parse_field("nodes.embedding", embedding)?);
        }
        if let Some(exclude) = nodes.exclude_waters {
            builder = builder.exclude_waters(exclude);
        }
        if let Some(deprotonate) = nodes.deprotonate {
            builder = builder.deprotonate(deprotonate);
        }
        if let Some(interactions) = edges.interactions {
            builder = builder.interactions(interactions);
        }
        if let Some(cutoff) = args.distance_cutoff.or(edges.distance_cutoff) {
            builder = builder.distance_cutoff(cutoff);
        }
        if let Some(threshold) = args
            .long_interaction_threshold
            .or(edges.long_interaction_threshold)
        {
            builder = builder.long_interaction_threshold(threshold);
        }
        if let Some(mode) = &edges.knn_mode {
            builder = builder.knn_mode(parse_field("edges.knn-mode", mode)?);
        }
        if let Some(alignment) = &features.alignment {
            builder = builder.alignment(parse_field("features.alignment", alignment)?);
        }
        builder = Self::merge_paths(builder, paths);

        let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

        let strategy_names = if args.strategies.is_empty() {
            edges.strategies.unwrap_or_default()
        } else {
            args.strategies.clone()
        };
        let mut request = GraphRequest::default();
        if !strategy_names.is_empty() {
            request.strategies = strategy_names
                .iter()
                .map(|name| parse_field::<StrategyKind>("edges.strategies", name))
                .collect::<Result<_>>()?;
        }
        if let Some(chains) = args.chains.as_ref().or(nodes.chains.as_ref()) {
            request.chains = parse_field::<core_config::ChainSelection>("nodes.chains", chains)?;
        }
        request.k_nn = args.k_nn.or(edges.k_nn);
        request.contact_file = args.contact_file.clone().or(edges.contact_file);
        request.custom_edges = args
            .custom_edges
            .clone()
            .or(edges.custom_edges)
            .map(CustomEdgeSource::File);
        request.dssp_file = args.dssp_file.clone().or(features.dssp_file);
        request.encode_labels = args.encode_labels || output.encode_labels.unwrap_or(false);

        request.validate(&config)?;

        Ok(ProteinSettings {
            input,
            request,
            config,
        })
    }

    fn merge_paths(mut builder: GraphConfigBuilder, paths: PartialPathsConfig) -> GraphConfigBuilder {
        if let Some(dir) = paths.pdb_dir {
            builder = builder.pdb_dir(dir);
        }
        if let Some(dir) = paths.contacts_dir {
            builder = builder.contacts_dir(dir);
        }
        if let Some(dir) = paths.dssp_dir {
            builder = builder.dssp_dir(dir);
        }
        if let Some(tool) = paths.contacts_tool {
            builder = builder.contacts_tool(tool);
        }
        if let Some(tool) = paths.dssp_tool {
            builder = builder.dssp_tool(tool);
        }
        builder
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = parser::parse_key_value(kv_pair)?;
            let key = key.as_str();
            let value = value.as_str();

            match key {
                "nodes.granularity" => self.nodes().granularity = Some(value.to_string()),
                "nodes.chains" => self.nodes().chains = Some(value.to_string()),
                "nodes.embedding" => self.nodes().embedding = Some(value.to_string()),
                "nodes.keep-heteroatoms" => {
                    self.nodes().keep_heteroatoms = Some(parser::parse_bool(key, value)?)
                }
                "nodes.exclude-waters" => {
                    self.nodes().exclude_waters = Some(parser::parse_bool(key, value)?)
                }
                "nodes.deprotonate" => {
                    self.nodes().deprotonate = Some(parser::parse_bool(key, value)?)
                }
                "edges.strategies" => self.edges().strategies = Some(parser::parse_list(value)),
                "edges.interactions" => {
                    self.edges().interactions = Some(parser::parse_list(value))
                }
                "edges.distance-cutoff" => {
                    self.edges().distance_cutoff = Some(parser::parse_number(key, value, "float")?)
                }
                "edges.long-interaction-threshold" => {
                    self.edges().long_interaction_threshold =
                        Some(parser::parse_number(key, value, "integer")?)
                }
                "edges.k-nn" => {
                    self.edges().k_nn = Some(parser::parse_number(key, value, "integer")?)
                }
                "edges.knn-mode" => self.edges().knn_mode = Some(value.to_string()),
                "features.include-ss" => {
                    self.features().include_ss = Some(parser::parse_bool(key, value)?)
                }
                "features.alignment" => self.features().alignment = Some(value.to_string()),
                "output.encode-labels" => {
                    self.output().encode_labels = Some(parser::parse_bool(key, value)?)
                }
                "output.remove-string-labels" => {
                    self.output().remove_string_labels = Some(parser::parse_bool(key, value)?)
                }
                "paths.pdb-dir" => self.paths().pdb_dir = Some(value.into()),
                "paths.contacts-dir" => self.paths().contacts_dir = Some(value.into()),
                "paths.dssp-dir" => self.paths().dssp_dir = Some(value.into()),
                "paths.contacts-tool" => self.paths().contacts_tool = Some(value.into()),
                "paths.dssp-tool" => self.paths().dssp_tool = Some(value.into()),
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn nodes(&mut self) -> &mut PartialNodesConfig {
        self.nodes.get_or_insert_with(Default::default)
    }

    fn edges(&mut self) -> &mut PartialEdgesConfig {
        self.edges.get_or_insert_with(Default::default)
    }

    fn features(&mut self) -> &mut PartialFeaturesConfig {
        self.features.get_or_insert_with(Default::default)
    }

    fn output(&mut self) -> &mut PartialOutputConfig {
        self.output.get_or_insert_with(Default::default)
    }

    fn paths(&mut self) -> &mut PartialPathsConfig {
        self.paths.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use molgraph::engine::config::{ChainSelection, Granularity, KnnMode};
    use std::fs;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("molgraph.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn protein_args(extra: &[&str]) -> ProteinArgs {
        let mut args = vec!["molgraph", "protein", "-i", "in.pdb"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Protein(args) => args,
            _ => panic!("Expected 'protein' subcommand"),
        }
    }

    const FILE_CONFIG: &str = r#"
        [nodes]
        granularity = "CB"
        chains = "A"
        embedding = "kidera"

        [edges]
        strategies = ["contacts", "distance"]
        distance-cutoff = 6.5 # Overridden in some tests
        long-interaction-threshold = 2

        [features]
        alignment = "positional"

        [paths]
        contacts-dir = "/data/contacts"
    "#;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = PartialGraphConfig::default()
            .merge_with_cli(&protein_args(&[]))
            .unwrap();
        assert!(matches!(settings.input, StructureInput::File(_)));
        assert_eq!(settings.request.strategies, vec![StrategyKind::Contacts]);
        assert_eq!(settings.request.chains, ChainSelection::All);
        assert_eq!(settings.config.preprocess.granularity, Granularity::Representative("CA".to_string()));
        assert!(settings.config.preprocess.exclude_waters);
        assert!(!settings.config.include_ss);
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, FILE_CONFIG);
        let settings = PartialGraphConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&protein_args(&[]))
            .unwrap();

        assert_eq!(settings.config.preprocess.granularity, Granularity::Representative("CB".to_string()));
        assert_eq!(settings.config.embedding.to_string(), "kidera");
        assert_eq!(settings.config.distance_cutoff, Some(6.5));
        assert_eq!(settings.config.long_interaction_threshold, Some(2));
        assert_eq!(
            settings.config.paths.contacts_dir,
            Some(PathBuf::from("/data/contacts"))
        );
        assert_eq!(settings.request.chains, ChainSelection::Chains(vec!['A']));
        assert_eq!(
            settings.request.strategies,
            vec![StrategyKind::Contacts, StrategyKind::Distance]
        );
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, FILE_CONFIG);
        let args = protein_args(&[
            "--edges",
            "knn,delaunay",
            "-k",
            "4",
            "-d",
            "5.0",
            "--chains",
            "all",
            "--include-ss",
        ]);
        let settings = PartialGraphConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(
            settings.request.strategies,
            vec![StrategyKind::KNearest, StrategyKind::Delaunay]
        );
        assert_eq!(settings.request.k_nn, Some(4));
        assert_eq!(settings.config.distance_cutoff, Some(5.0));
        assert_eq!(settings.request.chains, ChainSelection::All);
        assert!(settings.config.include_ss);
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, FILE_CONFIG);
        let args = protein_args(&[
            "-S",
            "edges.distance-cutoff=4.5",
            "-S",
            "edges.knn-mode=distance",
            "-S",
            "output.encode-labels=true",
        ]);
        let settings = PartialGraphConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(settings.config.distance_cutoff, Some(4.5));
        assert_eq!(settings.config.knn_mode, KnnMode::Distance);
        assert!(settings.request.encode_labels);
    }

    #[test]
    fn unknown_set_key_is_rejected() {
        let result = PartialGraphConfig::default()
            .merge_with_cli(&protein_args(&["-S", "edges.radius=3"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("edges.radius")));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let result = PartialGraphConfig::default()
            .merge_with_cli(&protein_args(&["-S", "edges.k-nn=many"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(&dir, "[edges]\nradius = 3.0\n");
        assert!(matches!(
            PartialGraphConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn inconsistent_requests_fail_before_any_work() {
        let result = PartialGraphConfig::default()
            .merge_with_cli(&protein_args(&["--edges", "distance"]));
        assert!(matches!(result, Err(CliError::Graph(_))));

        let result = PartialGraphConfig::default()
            .merge_with_cli(&protein_args(&["--edges", "contacts", "-k", "3"]));
        assert!(matches!(result, Err(CliError::Graph(_))));
    }

    #[test]
    fn pdb_code_input_is_recognised() {
        let args = match Cli::parse_from(["molgraph", "protein", "--pdb-code", "3eiy"]).command {
            Commands::Protein(args) => args,
            _ => panic!("Expected 'protein' subcommand"),
        };
        let settings = PartialGraphConfig::default().merge_with_cli(&args).unwrap();
        assert!(matches!(settings.input, StructureInput::PdbCode(code) if code == "3eiy"));
    }
}
