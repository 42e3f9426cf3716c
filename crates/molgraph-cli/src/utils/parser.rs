use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),

    #[error("Invalid {expected} value for '{key}': '{value}'.")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Splits `KEY=VALUE` at the first `=`; both sides are trimmed and the value may be empty.
pub fn parse_key_value(pair: &str) -> Result<(String, String), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValue(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "boolean",
        }),
    }
}

pub fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

/// Splits a comma-separated list, dropping empty items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
