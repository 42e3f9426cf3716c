use crate::core::residues::embedding::EmbeddingScheme;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Unknown granularity '{0}' (expected atom, CA, CB, atom:<NAME> or centroids)")]
    UnknownGranularity(String),
    #[error("Granularity '{0}' is not implemented")]
    UnimplementedGranularity(String),
    #[error("Unknown embedding scheme '{0}' (expected meiler or kidera)")]
    UnknownEmbedding(String),
    #[error("Unknown edge construction strategy '{0}'")]
    UnknownStrategy(String),
    #[error("Unknown alignment policy '{0}' (expected positional or by-identity)")]
    UnknownAlignment(String),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// The interaction types reported by the static contact tool, in one-hot order.
pub const DEFAULT_INTERACTION_TYPES: [&str; 17] = [
    "sb", "pc", "ps", "ts", "vdw", "hb", "hbb", "hbsb", "hbbb", "hbss", "wb", "wb2", "hblb",
    "hbls", "lwb", "lwb2", "hp",
];

/// What a graph node represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Every atom is a node; identities carry the atom name.
    Atom,
    /// One node per residue, placed on the named atom (`CA`, `CB`, ...).
    Representative(String),
    /// One node per residue, placed on the mean position of its atoms.
    Centroid,
}

impl Granularity {
    pub fn is_atom_level(&self) -> bool {
        matches!(self, Granularity::Atom)
    }

    /// The atom whose record represents each residue, if any.
    ///
    /// Centroid graphs keep the `CA` record and overwrite its coordinates.
    pub fn representative_atom(&self) -> Option<&str> {
        match self {
            Granularity::Atom => None,
            Granularity::Representative(name) => Some(name.as_str()),
            Granularity::Centroid => Some("CA"),
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Representative("CA".to_string())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Atom => write!(f, "atom"),
            Granularity::Representative(name) if name == "CA" || name == "CB" => {
                write!(f, "{}", name)
            }
            Granularity::Representative(name) => write!(f, "atom:{}", name),
            Granularity::Centroid => write!(f, "centroids"),
        }
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(name) = trimmed.strip_prefix("atom:") {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::UnknownGranularity(s.to_string()));
            }
            return Ok(Granularity::Representative(name.to_ascii_uppercase()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "atom" | "atoms" => Ok(Granularity::Atom),
            "ca" => Ok(Granularity::Representative("CA".to_string())),
            "cb" => Ok(Granularity::Representative("CB".to_string())),
            "centroid" | "centroids" => Ok(Granularity::Centroid),
            "ss" => Err(ConfigError::UnimplementedGranularity(s.to_string())),
            _ => Err(ConfigError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Which chains contribute nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChainSelection {
    /// All chains, in order of first appearance.
    #[default]
    All,
    /// The listed chains, in the listed order.
    Chains(Vec<char>),
}

impl ChainSelection {
    pub fn contains(&self, chain_id: char) -> bool {
        match self {
            ChainSelection::All => true,
            ChainSelection::Chains(chains) => chains.contains(&chain_id),
        }
    }

    /// Resolves the selection against the chains actually present in a structure.
    pub fn resolve(&self, available: &[char]) -> Vec<char> {
        match self {
            ChainSelection::All => available.to_vec(),
            ChainSelection::Chains(chains) => chains.clone(),
        }
    }
}

impl FromStr for ChainSelection {
    type Err = ConfigError;

    /// Parses `all` or a run of chain letters (`AB`, `A,B`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(ChainSelection::All);
        }
        let chains: Vec<char> = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        if chains.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "chains",
                reason: "selection is empty".to_string(),
            });
        }
        Ok(ChainSelection::Chains(chains))
    }
}

/// Edge construction strategies selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Contacts,
    Distance,
    KNearest,
    Delaunay,
    Custom,
    Dense,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Contacts => "contacts",
            StrategyKind::Distance => "distance",
            StrategyKind::KNearest => "knn",
            StrategyKind::Delaunay => "delaunay",
            StrategyKind::Custom => "custom",
            StrategyKind::Dense => "dense",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contacts" | "contact" => Ok(StrategyKind::Contacts),
            "distance" | "distance_threshold" => Ok(StrategyKind::Distance),
            "knn" | "k_nn" | "k-nn" => Ok(StrategyKind::KNearest),
            "delaunay" | "delaunay_triangulation" => Ok(StrategyKind::Delaunay),
            "custom" => Ok(StrategyKind::Custom),
            "dense" => Ok(StrategyKind::Dense),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// How secondary-structure descriptors are matched to nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Row `i` to node `i`; missing trailing rows are zero-filled.
    Positional,
    /// Join on chain, residue name and residue number; unmatched nodes get zeros.
    #[default]
    ByIdentity,
}

impl FromStr for AlignmentPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(AlignmentPolicy::Positional),
            "by-identity" | "by_identity" | "identity" => Ok(AlignmentPolicy::ByIdentity),
            _ => Err(ConfigError::UnknownAlignment(s.to_string())),
        }
    }
}

/// Edge attribute produced by the k-nearest-neighbour strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnnMode {
    /// Indicator value `1.0`.
    #[default]
    Connectivity,
    /// Euclidean distance to the neighbour.
    Distance,
}

impl FromStr for KnnMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connectivity" => Ok(KnnMode::Connectivity),
            "distance" => Ok(KnnMode::Distance),
            _ => Err(ConfigError::InvalidValue {
                parameter: "knn_mode",
                reason: format!("'{}' is neither connectivity nor distance", s),
            }),
        }
    }
}

/// The ordered set of contact interaction types kept as edges.
///
/// The order defines the one-hot layout of contact edge attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionWhitelist {
    kinds: Vec<String>,
}

impl InteractionWhitelist {
    /// Builds a whitelist, dropping repeated kinds while keeping first-seen order.
    pub fn new<I, S>(kinds: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for kind in kinds {
            let kind = kind.into();
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        if unique.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "interaction_types",
                reason: "at least one interaction type is required".to_string(),
            });
        }
        Ok(Self { kinds: unique })
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    pub fn index_of(&self, kind: &str) -> Option<usize> {
        self.kinds.iter().position(|k| k == kind)
    }

    /// One-hot encoding of `kind`, `None` if the kind is not whitelisted.
    pub fn one_hot(&self, kind: &str) -> Option<Vec<f64>> {
        let index = self.index_of(kind)?;
        let mut v = vec![0.0; self.kinds.len()];
        v[index] = 1.0;
        Some(v)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }
}

impl Default for InteractionWhitelist {
    fn default() -> Self {
        Self {
            kinds: DEFAULT_INTERACTION_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreprocessConfig {
    pub granularity: Granularity,
    pub keep_heteroatoms: bool,
    pub exclude_waters: bool,
    pub deprotonate: bool,
}

/// Locations of cached artifacts and external programs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactPaths {
    /// Directory holding `<code>.pdb` files for structures requested by code.
    pub pdb_dir: Option<PathBuf>,
    /// Directory holding cached contact reports.
    pub contacts_dir: Option<PathBuf>,
    /// Directory holding cached DSSP output.
    pub dssp_dir: Option<PathBuf>,
    /// Directory of the contact tool installation (contains `get_static_contacts.py`).
    pub contacts_tool: Option<PathBuf>,
    /// DSSP executable.
    pub dssp_tool: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub preprocess: PreprocessConfig,
    pub embedding: EmbeddingScheme,
    pub interactions: InteractionWhitelist,
    pub distance_cutoff: Option<f64>,
    pub long_interaction_threshold: Option<usize>,
    pub knn_mode: KnnMode,
    pub include_ss: bool,
    pub alignment: AlignmentPolicy,
    pub remove_string_labels: bool,
    pub paths: ArtifactPaths,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig {
                exclude_waters: true,
                ..PreprocessConfig::default()
            },
            embedding: EmbeddingScheme::default(),
            interactions: InteractionWhitelist::default(),
            distance_cutoff: None,
            long_interaction_threshold: None,
            knn_mode: KnnMode::default(),
            include_ss: false,
            alignment: AlignmentPolicy::default(),
            remove_string_labels: false,
            paths: ArtifactPaths::default(),
        }
    }
}

#[derive(Default)]
pub struct GraphConfigBuilder {
    granularity: Option<Granularity>,
    keep_heteroatoms: Option<bool>,
    exclude_waters: Option<bool>,
    deprotonate: Option<bool>,
    embedding: Option<EmbeddingScheme>,
    interactions: Option<Vec<String>>,
    distance_cutoff: Option<f64>,
    long_interaction_threshold: Option<usize>,
    knn_mode: Option<KnnMode>,
    include_ss: Option<bool>,
    alignment: Option<AlignmentPolicy>,
    remove_string_labels: Option<bool>,
    paths: ArtifactPaths,
}

impl GraphConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }
    pub fn keep_heteroatoms(mut self, keep: bool) -> Self {
        self.keep_heteroatoms = Some(keep);
        self
    }
    pub fn exclude_waters(mut self, exclude: bool) -> Self {
        self.exclude_waters = Some(exclude);
        self
    }
    pub fn deprotonate(mut self, deprotonate: bool) -> Self {
        self.deprotonate = Some(deprotonate);
        self
    }
    pub fn embedding(mut self, scheme: EmbeddingScheme) -> Self {
        self.embedding = Some(scheme);
        self
    }
    pub fn interactions(mut self, kinds: Vec<String>) -> Self {
        self.interactions = Some(kinds);
        self
    }
    pub fn distance_cutoff(mut self, cutoff: f64) -> Self {
        self.distance_cutoff = Some(cutoff);
        self
    }
    pub fn long_interaction_threshold(mut self, threshold: usize) -> Self {
        self.long_interaction_threshold = Some(threshold);
        self
    }
    pub fn knn_mode(mut self, mode: KnnMode) -> Self {
        self.knn_mode = Some(mode);
        self
    }
    pub fn include_ss(mut self, include: bool) -> Self {
        self.include_ss = Some(include);
        self
    }
    pub fn alignment(mut self, policy: AlignmentPolicy) -> Self {
        self.alignment = Some(policy);
        self
    }
    pub fn remove_string_labels(mut self, remove: bool) -> Self {
        self.remove_string_labels = Some(remove);
        self
    }
    pub fn pdb_dir(mut self, dir: PathBuf) -> Self {
        self.paths.pdb_dir = Some(dir);
        self
    }
    pub fn contacts_dir(mut self, dir: PathBuf) -> Self {
        self.paths.contacts_dir = Some(dir);
        self
    }
    pub fn dssp_dir(mut self, dir: PathBuf) -> Self {
        self.paths.dssp_dir = Some(dir);
        self
    }
    pub fn contacts_tool(mut self, path: PathBuf) -> Self {
        self.paths.contacts_tool = Some(path);
        self
    }
    pub fn dssp_tool(mut self, path: PathBuf) -> Self {
        self.paths.dssp_tool = Some(path);
        self
    }

    pub fn build(self) -> Result<GraphConfig, ConfigError> {
        let defaults = GraphConfig::default();

        if let Some(cutoff) = self.distance_cutoff {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(ConfigError::InvalidValue {
                    parameter: "distance_cutoff",
                    reason: format!("must be a positive number of angstroms, got {}", cutoff),
                });
            }
        }

        let interactions = match self.interactions {
            Some(kinds) => InteractionWhitelist::new(kinds)?,
            None => defaults.interactions,
        };

        Ok(GraphConfig {
            preprocess: PreprocessConfig {
                granularity: self
                    .granularity
                    .unwrap_or(defaults.preprocess.granularity),
                keep_heteroatoms: self
                    .keep_heteroatoms
                    .unwrap_or(defaults.preprocess.keep_heteroatoms),
                exclude_waters: self
                    .exclude_waters
                    .unwrap_or(defaults.preprocess.exclude_waters),
                deprotonate: self.deprotonate.unwrap_or(defaults.preprocess.deprotonate),
            },
            embedding: self.embedding.unwrap_or(defaults.embedding),
            interactions,
            distance_cutoff: self.distance_cutoff,
            long_interaction_threshold: self.long_interaction_threshold,
            knn_mode: self.knn_mode.unwrap_or(defaults.knn_mode),
            include_ss: self.include_ss.unwrap_or(defaults.include_ss),
            alignment: self.alignment.unwrap_or(defaults.alignment),
            remove_string_labels: self
                .remove_string_labels
                .unwrap_or(defaults.remove_string_labels),
            paths: self.paths,
        })
    }
}
