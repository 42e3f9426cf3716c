use molgraph::workflows::ppi::{
    InteractionClient, PageRequest, PpiError, PpiSource, RawInteraction,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

const STRING_NETWORK_URL: &str = "https://string-db.org/api/json/network";
const BIOGRID_INTERACTIONS_URL: &str = "https://webservice.thebiogrid.org/interactions/";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const USER_AGENT: &str = concat!("molgraph/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client for the STRING and BIOGRID web services.
pub struct HttpInteractionClient {
    client: Client,
}

impl HttpInteractionClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, source: PpiSource, url: &str, query: &[(String, String)]) -> Result<Value, PpiError> {
        let transport = |e: reqwest::Error| PpiError::Transport {
            database: source,
            reason: e.without_url().to_string(),
        };
        debug!("GET {} ({} query parameters)", url, query.len());
        self.client
            .get(url)
            .query(query)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(transport)?
            .json::<Value>()
            .map_err(|e| PpiError::MalformedResponse {
                database: source,
                reason: e.without_url().to_string(),
            })
    }
}

impl InteractionClient for HttpInteractionClient {
    fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawInteraction>, PpiError> {
        match request.source {
            PpiSource::String => {
                let body = self.get(request.source, STRING_NETWORK_URL, &string_query(request))?;
                parse_string_rows(body)
            }
            PpiSource::Biogrid => {
                let query = biogrid_query(request)?;
                let body = self.get(request.source, BIOGRID_INTERACTIONS_URL, &query)?;
                parse_biogrid_rows(body)
            }
        }
    }
}

/// Query for the STRING `network` endpoint. Identifiers are carriage-return separated.
pub fn string_query(request: &PageRequest) -> Vec<(String, String)> {
    let mut query = vec![
        ("identifiers".to_string(), request.proteins.join("\r")),
        ("caller_identity".to_string(), USER_AGENT.to_string()),
    ];
    if !request.params.contains_key("species") {
        query.push(("species".to_string(), request.taxon_id.to_string()));
    }
    query.extend(request.params.iter().map(|(k, v)| (k.clone(), v.clone())));
    query
}

/// Query for the BIOGRID `interactions` endpoint.
///
/// # Errors
///
/// Returns [`PpiError::InvalidParameter`] when no `BIOGRID_accesskey` was supplied.
pub fn biogrid_query(request: &PageRequest) -> Result<Vec<(String, String)>, PpiError> {
    if !request.params.contains_key("accesskey") {
        return Err(PpiError::InvalidParameter {
            name: "BIOGRID_accesskey".to_string(),
            reason: "the BIOGRID web service requires an access key".to_string(),
        });
    }

    let mut params = request.params.clone();
    params.insert("format".to_string(), "json".to_string());
    params
        .entry("taxId".to_string())
        .or_insert_with(|| request.taxon_id.to_string());
    params
        .entry("searchNames".to_string())
        .or_insert_with(|| "true".to_string());
    if let Some(start) = request.start {
        params.insert("start".to_string(), start.to_string());
    }
    if let Some(max) = request.max {
        params.insert("max".to_string(), max.to_string());
    }

    let mut query = vec![("geneList".to_string(), request.proteins.join("|"))];
    query.extend(params);
    Ok(query)
}

#[derive(Deserialize)]
struct StringRow {
    #[serde(rename = "preferredName_A")]
    preferred_name_a: String,
    #[serde(rename = "preferredName_B")]
    preferred_name_b: String,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

/// Parses the STRING response: an array of rows carrying names and score channels.
pub fn parse_string_rows(body: Value) -> Result<Vec<RawInteraction>, PpiError> {
    let rows: Vec<StringRow> =
        serde_json::from_value(body).map_err(|e| PpiError::MalformedResponse {
            database: PpiSource::String,
            reason: e.to_string(),
        })?;
    trace!("STRING returned {} rows.", rows.len());
    Ok(rows
        .into_iter()
        .map(|row| RawInteraction {
            protein_a: row.preferred_name_a,
            protein_b: row.preferred_name_b,
            scores: row
                .rest
                .into_iter()
                .filter(|(key, _)| key.ends_with("score"))
                .filter_map(|(key, value)| Some((key, value.as_f64()?)))
                .collect(),
        })
        .collect())
}

#[derive(Deserialize)]
struct BiogridRow {
    #[serde(rename = "OFFICIAL_SYMBOL_A")]
    official_symbol_a: String,
    #[serde(rename = "OFFICIAL_SYMBOL_B")]
    official_symbol_b: String,
}

/// Parses the BIOGRID response: an object keyed by interaction id, or an empty array
/// when nothing matched.
pub fn parse_biogrid_rows(body: Value) -> Result<Vec<RawInteraction>, PpiError> {
    let malformed = |reason: String| PpiError::MalformedResponse {
        database: PpiSource::Biogrid,
        reason,
    };
    match body {
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        Value::Object(map) => {
            let rows: BTreeMap<String, BiogridRow> = serde_json::from_value(Value::Object(map))
                .map_err(|e| malformed(e.to_string()))?;
            trace!("BIOGRID returned {} rows.", rows.len());
            Ok(rows
                .into_values()
                .map(|row| RawInteraction {
                    protein_a: row.official_symbol_a,
                    protein_b: row.official_symbol_b,
                    scores: BTreeMap::new(),
                })
                .collect())
        }
        other => Err(malformed(format!(
            "expected an object keyed by interaction id, got {}",
            other
        ))),
    }
}
