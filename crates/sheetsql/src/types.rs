use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Output shape of a query result row
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShape {
    /// Column label -> cell value, in the result's column order
    #[default]
    Mapping,
    /// Cell values in column order
    Sequence,
    /// Cell values in column order, fixed length
    Tuple,
}

impl fmt::Display for RowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowShape::Mapping => write!(f, "mapping"),
            RowShape::Sequence => write!(f, "sequence"),
            RowShape::Tuple => write!(f, "tuple"),
        }
    }
}

impl FromStr for RowShape {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mapping" | "dict" | "map" => Ok(RowShape::Mapping),
            "sequence" | "list" | "seq" => Ok(RowShape::Sequence),
            "tuple" => Ok(RowShape::Tuple),
            _ => Err(SheetError::InvalidRowShape(s.to_string())),
        }
    }
}

/// What a collection does when a lookup misses
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Fail with a not-found error
    #[default]
    Fail,
    /// Fetch metadata once, cache what was found, and retry the lookup
    FetchAndCache,
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissPolicy::Fail => write!(f, "fail"),
            MissPolicy::FetchAndCache => write!(f, "fetch_and_cache"),
        }
    }
}

impl FromStr for MissPolicy {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(MissPolicy::Fail),
            "fetch_and_cache" | "fetch-and-cache" => Ok(MissPolicy::FetchAndCache),
            other => Err(SheetError::invalid_configuration(format!(
                "unknown miss policy '{}' (expected fail or fetch_and_cache)",
                other
            ))),
        }
    }
}

/// Supported authentication methods
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// End-user OAuth flow
    OAuth,
    /// Service account credentials
    ServiceAccount,
}

impl AuthMethod {
    pub const ALL: [AuthMethod; 2] = [AuthMethod::OAuth, AuthMethod::ServiceAccount];
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::OAuth => write!(f, "oauth"),
            AuthMethod::ServiceAccount => write!(f, "service_account"),
        }
    }
}

impl FromStr for AuthMethod {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oauth" => Ok(AuthMethod::OAuth),
            "service_account" => Ok(AuthMethod::ServiceAccount),
            other => Err(SheetError::UnsupportedAuthMethod(format!(
                "{} is not a supported authentication type (supported types are: oauth, service_account)",
                other
            ))),
        }
    }
}

/// A spreadsheet visible to the authorized client
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetFile {
    pub id: String,
    pub name: String,
}

/// Identifying properties of a worksheet inside a spreadsheet
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct WorksheetProperties {
    /// Grid ID, sent as `gid` to the tq endpoint
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: usize,
}

impl WorksheetProperties {
    pub fn new(sheet_id: i64, title: impl Into<String>) -> Self {
        Self {
            sheet_id,
            title: title.into(),
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A single query result row
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
    Tuple(Box<[Value]>),
}

impl Row {
    pub fn shape(&self) -> RowShape {
        match self {
            Row::Mapping(_) => RowShape::Mapping,
            Row::Sequence(_) => RowShape::Sequence,
            Row::Tuple(_) => RowShape::Tuple,
        }
    }

    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            Row::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Positional values for sequence and tuple rows
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Row::Sequence(values) => Some(values),
            Row::Tuple(values) => Some(values),
            Row::Mapping(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Mapping(map) => map.len(),
            Row::Sequence(values) => values.len(),
            Row::Tuple(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at a column position, whatever the shape
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Row::Mapping(map) => map.values().nth(index),
            Row::Sequence(values) => values.get(index),
            Row::Tuple(values) => values.get(index),
        }
    }

    pub fn values(&self) -> Vec<&Value> {
        match self {
            Row::Mapping(map) => map.values().collect(),
            Row::Sequence(values) => values.iter().collect(),
            Row::Tuple(values) => values.iter().collect(),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        match self {
            Row::Mapping(map) => map.into_iter().map(|(_, v)| v).collect(),
            Row::Sequence(values) => values,
            Row::Tuple(values) => values.into_vec(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Row::Mapping(map) => map.serialize(serializer),
            Row::Sequence(values) => values.serialize(serializer),
            Row::Tuple(values) => values.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_shape_parsing() {
        assert_eq!("mapping".parse::<RowShape>().unwrap(), RowShape::Mapping);
        assert_eq!("List".parse::<RowShape>().unwrap(), RowShape::Sequence);
        assert_eq!("tuple".parse::<RowShape>().unwrap(), RowShape::Tuple);
        assert!(matches!(
            "set".parse::<RowShape>(),
            Err(SheetError::InvalidRowShape(s)) if s == "set"
        ));
        assert_eq!(RowShape::default(), RowShape::Mapping);
    }

    #[test]
    fn test_auth_method_parsing() {
        assert_eq!("oauth".parse::<AuthMethod>().unwrap(), AuthMethod::OAuth);
        assert_eq!(
            "service_account".parse::<AuthMethod>().unwrap(),
            AuthMethod::ServiceAccount
        );
        assert!(matches!(
            "unsupported_auth".parse::<AuthMethod>(),
            Err(SheetError::UnsupportedAuthMethod(_))
        ));
        assert_eq!(AuthMethod::ServiceAccount.to_string(), "service_account");
    }

    #[test]
    fn test_miss_policy_parsing() {
        assert_eq!("fail".parse::<MissPolicy>().unwrap(), MissPolicy::Fail);
        assert_eq!(
            "fetch_and_cache".parse::<MissPolicy>().unwrap(),
            MissPolicy::FetchAndCache
        );
        assert!("lazy".parse::<MissPolicy>().is_err());
    }

    #[test]
    fn test_row_accessors() {
        let mut map = Map::new();
        map.insert("b".to_string(), json!(2));
        map.insert("a".to_string(), json!(1));
        let row = Row::Mapping(map);

        assert_eq!(row.shape(), RowShape::Mapping);
        assert_eq!(row.get_index(0), Some(&json!(2)));
        assert_eq!(row.into_values(), vec![json!(2), json!(1)]);

        let row = Row::Tuple(vec![json!("x"), json!(null)].into_boxed_slice());
        assert_eq!(row.as_sequence().unwrap().len(), 2);
        assert!(row.as_mapping().is_none());
        assert_eq!(serde_json::to_value(&row).unwrap(), json!(["x", null]));
    }
}
