use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// NCBI taxonomy id used when none is given (Homo sapiens).
pub const DEFAULT_TAXON_ID: u32 = 9606;

/// Page size for paginated sources.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

const STRING_REQUEST_FIELDS: [&str; 5] = [
    "species",
    "required_score",
    "network_type",
    "add_nodes",
    "show_query_node_labels",
];

const STRING_SCORE_FIELDS: [&str; 8] = [
    "score", "nscore", "fscore", "pscore", "ascore", "escore", "dscore", "tscore",
];

const BIOGRID_REQUEST_FIELDS: [&str; 21] = [
    "searchNames",
    "max",
    "interSpeciesExcluded",
    "selfInteractionsExcluded",
    "evidenceList",
    "includeEvidence",
    "searchIds",
    "searchSynonyms",
    "searchBiogridIds",
    "additionalIdentifierTypes",
    "excludeGenes",
    "includeInteractors",
    "includeInteractorInteractions",
    "pubmedList",
    "excludePubmeds",
    "htpThreshold",
    "throughputTag",
    "taxId",
    "includeHeader",
    "format",
    "accesskey",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PpiError {
    #[error("Unsupported interaction source '{0}' (expected STRING or BIOGRID)")]
    UnsupportedSource(String),

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("No proteins given")]
    NoProteins,

    #[error("Request to {database} failed: {reason}")]
    Transport { database: PpiSource, reason: String },

    #[error("Unexpected response from {database}: {reason}")]
    MalformedResponse { database: PpiSource, reason: String },
}

/// A protein-protein interaction database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PpiSource {
    #[serde(rename = "STRING")]
    String,
    #[serde(rename = "BIOGRID")]
    Biogrid,
}

impl PpiSource {
    pub const ALL: [PpiSource; 2] = [PpiSource::String, PpiSource::Biogrid];

    /// Prefix of the parameters addressed to this source, e.g. `STRING_required_score`.
    pub const fn parameter_prefix(&self) -> &'static str {
        match self {
            PpiSource::String => "STRING_",
            PpiSource::Biogrid => "BIOGRID_",
        }
    }

    fn is_request_field(&self, key: &str) -> bool {
        match self {
            PpiSource::String => STRING_REQUEST_FIELDS.contains(&key),
            PpiSource::Biogrid => BIOGRID_REQUEST_FIELDS.contains(&key),
        }
    }
}

impl fmt::Display for PpiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PpiSource::String => write!(f, "STRING"),
            PpiSource::Biogrid => write!(f, "BIOGRID"),
        }
    }
}

impl FromStr for PpiSource {
    type Err = PpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(PpiSource::String),
            "biogrid" => Ok(PpiSource::Biogrid),
            _ => Err(PpiError::UnsupportedSource(s.to_string())),
        }
    }
}

/// Source-prefixed key/value parameters (`STRING_required_score=400`,
/// `BIOGRID_accesskey=...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PpiParams {
    values: BTreeMap<String, String>,
}

impl PpiParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parameters addressed to `source`, with the prefix removed.
    fn for_source(&self, source: PpiSource) -> BTreeMap<&str, &str> {
        self.values
            .iter()
            .filter_map(|(k, v)| Some((k.strip_prefix(source.parameter_prefix())?, v.as_str())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PpiParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// One request to an interaction source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub source: PpiSource,
    pub proteins: Vec<String>,
    pub taxon_id: u32,
    /// Whitelisted source parameters, prefix removed.
    pub params: BTreeMap<String, String>,
    /// Offset of the first record; `None` for unpaginated sources.
    pub start: Option<usize>,
    pub max: Option<usize>,
}

/// An interaction row as returned by a source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawInteraction {
    pub protein_a: String,
    pub protein_b: String,
    /// Named confidence scores (STRING channels); empty for sources without scores.
    pub scores: BTreeMap<String, f64>,
}

/// Fetches interaction rows from a remote source.
pub trait InteractionClient {
    fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawInteraction>, PpiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub p1: String,
    pub p2: String,
    pub source: PpiSource,
}

/// Interactions gathered for a set of query proteins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PpiNetwork {
    pub proteins: Vec<String>,
    pub interactions: Vec<Interaction>,
}

impl PpiNetwork {
    /// One node per protein name (query proteins first) and one edge per interaction.
    pub fn to_petgraph(&self) -> UnGraph<String, PpiSource> {
        let mut g = UnGraph::default();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        let names = self
            .proteins
            .iter()
            .chain(self.interactions.iter().flat_map(|i| [&i.p1, &i.p2]));
        for name in names {
            index
                .entry(name.as_str())
                .or_insert_with(|| g.add_node(name.clone()));
        }
        for interaction in &self.interactions {
            if let (Some(&a), Some(&b)) = (
                index.get(interaction.p1.as_str()),
                index.get(interaction.p2.as_str()),
            ) {
                g.add_edge(a, b, interaction.source);
            }
        }
        g
    }
}

/// Collects interactions for a protein list from one or more sources.
#[derive(Debug, Clone)]
pub struct PpiGraphBuilder {
    proteins: Vec<String>,
    sources: Vec<PpiSource>,
    params: PpiParams,
    taxon_id: u32,
    paginate: bool,
}

impl PpiGraphBuilder {
    /// Creates a builder. Proteins are de-duplicated and sorted; `None` selects every source.
    ///
    /// # Errors
    ///
    /// Returns [`PpiError::UnsupportedSource`] for an unknown source name and
    /// [`PpiError::NoProteins`] for an empty protein list.
    pub fn new<S: AsRef<str>>(
        proteins: impl IntoIterator<Item = S>,
        sources: Option<Vec<String>>,
        params: PpiParams,
    ) -> Result<Self, PpiError> {
        let proteins: Vec<String> = proteins
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if proteins.is_empty() {
            return Err(PpiError::NoProteins);
        }

        let sources = match sources {
            Some(names) => {
                let mut parsed = Vec::with_capacity(names.len());
                for name in names {
                    let source: PpiSource = name.parse()?;
                    if !parsed.contains(&source) {
                        parsed.push(source);
                    }
                }
                parsed
            }
            None => PpiSource::ALL.to_vec(),
        };

        Ok(Self {
            proteins,
            sources,
            params,
            taxon_id: DEFAULT_TAXON_ID,
            paginate: true,
        })
    }

    pub fn taxon_id(mut self, taxon_id: u32) -> Self {
        self.taxon_id = taxon_id;
        self
    }

    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    pub fn proteins(&self) -> &[String] {
        &self.proteins
    }

    pub fn sources(&self) -> &[PpiSource] {
        &self.sources
    }

    fn request(&self, source: PpiSource) -> PageRequest {
        let mut params = BTreeMap::new();
        for (key, value) in self.params.for_source(source) {
            if source.is_request_field(key) {
                params.insert(key.to_string(), value.to_string());
            } else if !(source == PpiSource::String && STRING_SCORE_FIELDS.contains(&key)) {
                warn!(source = %source, "Ignoring unsupported parameter '{}'.", key);
            }
        }
        PageRequest {
            source,
            proteins: self.proteins.clone(),
            taxon_id: self.taxon_id,
            params,
            start: None,
            max: None,
        }
    }

    fn score_thresholds(&self) -> Result<Vec<(&'static str, f64)>, PpiError> {
        let params = self.params.for_source(PpiSource::String);
        let mut thresholds = Vec::new();
        for field in STRING_SCORE_FIELDS {
            if let Some(raw) = params.get(field) {
                let value = raw.parse::<f64>().map_err(|e| PpiError::InvalidParameter {
                    name: format!("{}{}", PpiSource::String.parameter_prefix(), field),
                    reason: e.to_string(),
                })?;
                thresholds.push((field, value));
            }
        }
        Ok(thresholds)
    }

    fn page_size(&self, request: &PageRequest) -> Result<usize, PpiError> {
        match request.params.get("max") {
            Some(raw) => raw.parse::<usize>().ok().filter(|&m| m > 0).ok_or_else(|| {
                PpiError::InvalidParameter {
                    name: "BIOGRID_max".into(),
                    reason: format!("'{}' is not a positive page size", raw),
                }
            }),
            None => Ok(DEFAULT_PAGE_SIZE),
        }
    }

    fn fetch_string(&self, client: &impl InteractionClient) -> Result<Vec<RawInteraction>, PpiError> {
        let thresholds = self.score_thresholds()?;
        let rows = client.fetch_page(&self.request(PpiSource::String))?;
        let total = rows.len();
        let kept: Vec<RawInteraction> = rows
            .into_iter()
            .filter(|row| {
                thresholds
                    .iter()
                    .all(|(field, t)| row.scores.get(*field).is_some_and(|s| s >= t))
            })
            .collect();
        debug!("STRING: kept {} of {} interactions after score filters.", kept.len(), total);
        Ok(kept)
    }

    fn fetch_biogrid(&self, client: &impl InteractionClient) -> Result<Vec<RawInteraction>, PpiError> {
        let mut request = self.request(PpiSource::Biogrid);
        let max = self.page_size(&request)?;
        request.params.remove("max");
        request.max = Some(max);

        let mut rows = Vec::new();
        let mut start = 0;
        loop {
            request.start = Some(start);
            let page = client.fetch_page(&request)?;
            let n = page.len();
            rows.extend(page);
            debug!("BIOGRID: page at {} returned {} interactions.", start, n);
            if !self.paginate || n < max {
                break;
            }
            start += max;
        }
        Ok(rows)
    }

    /// Queries every selected source and merges the results.
    #[instrument(skip_all, name = "ppi_graph_workflow")]
    pub fn fetch(&self, client: &impl InteractionClient) -> Result<PpiNetwork, PpiError> {
        let mut interactions = Vec::new();
        for &source in &self.sources {
            let rows = match source {
                PpiSource::String => self.fetch_string(client)?,
                PpiSource::Biogrid => self.fetch_biogrid(client)?,
            };
            info!("{}: {} interactions for {} proteins.", source, rows.len(), self.proteins.len());
            interactions.extend(rows.into_iter().map(|row| Interaction {
                p1: row.protein_a,
                p2: row.protein_b,
                source,
            }));
        }
        Ok(PpiNetwork {
            proteins: self.proteins.clone(),
            interactions,
        })
    }
}
