//! Structured record produced by a successful extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for a sub-field that could not be parsed
pub const UNKNOWN: &str = "unknown";

/// HTTP method of a documented endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    #[serde(rename = "unknown")]
    Unknown,
}

impl HttpMethod {
    /// Methods a documentation page can declare, in detection order
    pub const KNOWN: [HttpMethod; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Unknown => UNKNOWN,
        }
    }

    /// Parses a method name, falling back to `Unknown` instead of failing
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::KNOWN
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or(())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One documented request parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
}

impl Parameter {
    /// Builds a parameter, substituting [`UNKNOWN`] for absent or blank parts
    pub fn new(
        name: Option<String>,
        param_type: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            name: or_unknown(name),
            param_type: or_unknown(param_type),
            description: or_unknown(description),
        }
    }
}

/// Structured API description extracted from one documentation page
///
/// Serialized keys follow declaration order:
/// `name, endpoint, method, parameters, description, example`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Display name of the API (page or document title)
    pub name: String,

    /// Endpoint path or absolute URL
    pub endpoint: String,

    pub method: HttpMethod,

    /// Parameters in page order
    pub parameters: Vec<Parameter>,

    pub description: String,

    /// Example request or code sample, if the page has one
    pub example: Option<String>,
}

/// Returns the value if it is non-blank, otherwise [`UNKNOWN`]
pub(crate) fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!(" Delete ".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("FETCH".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::parse_lenient("FETCH"), HttpMethod::Unknown);
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&HttpMethod::Patch).unwrap(), "\"PATCH\"");
        assert_eq!(
            serde_json::to_string(&HttpMethod::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_parameter_sentinels() {
        let param = Parameter::new(Some("limit".to_string()), None, Some("  ".to_string()));
        assert_eq!(param.name, "limit");
        assert_eq!(param.param_type, UNKNOWN);
        assert_eq!(param.description, UNKNOWN);

        let json = serde_json::to_string(&param).unwrap();
        assert_eq!(
            json,
            r#"{"name":"limit","type":"unknown","description":"unknown"}"#
        );
    }

    #[test]
    fn test_record_key_order() {
        let record = ExtractedRecord {
            name: "Pets".to_string(),
            endpoint: "/pets".to_string(),
            method: HttpMethod::Get,
            parameters: vec![],
            description: "List pets".to_string(),
            example: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Pets","endpoint":"/pets","method":"GET","parameters":[],"description":"List pets","example":null}"#
        );
    }
}
