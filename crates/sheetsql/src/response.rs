//! Table query response decoding and row materialization
//!
//! The tq endpoint answers with a JSON payload wrapped in a JavaScript
//! callback, e.g.
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{...}});
//! ```
//!
//! The payload is located by balanced-brace scanning, checked for an error
//! status, and its table turned into [`Rows`] of the requested [`RowShape`].

use crate::error::{Result, SheetError};
use crate::types::{Row, RowShape};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Column descriptor of a result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TqColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single cell; `v` is the raw value, `f` the formatted one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TqCell {
    #[serde(default)]
    pub v: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,
}

/// A result row; empty cells come through as `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TqRow {
    #[serde(default)]
    pub c: Vec<Option<TqCell>>,
}

impl TqRow {
    fn cell_values(self) -> impl Iterator<Item = Value> {
        self.c
            .into_iter()
            .map(|cell| cell.map(|cell| cell.v).unwrap_or(Value::Null))
    }
}

/// The `table` section of a successful response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TqTable {
    #[serde(default)]
    pub cols: Vec<TqColumn>,
    #[serde(default)]
    pub rows: Vec<TqRow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TqTable {
    /// Declared column labels, in result order
    pub fn labels(&self) -> Vec<String> {
        self.cols.iter().map(|c| c.label.clone()).collect()
    }

    /// Materialize the table into rows of the given shape
    pub fn into_rows(self, shape: RowShape) -> Rows {
        Rows::new(self, shape)
    }
}

/// Locate the first balanced `{...}` span in a response body
///
/// Braces inside JSON string literals do not count towards nesting.
pub fn extract_payload(body: &str) -> Result<&str> {
    let (start, end) = first_balanced_span(body.as_bytes()).ok_or_else(|| {
        SheetError::malformed("no balanced JSON object found in response body")
    })?;
    Ok(&body[start..=end])
}

/// Single pass over the body keeping the offsets of unclosed braces
///
/// An opening brace that never closes is skipped in favour of the earliest
/// one that does.
fn first_balanced_span(bytes: &[u8]) -> Option<(usize, usize)> {
    let first = bytes.iter().position(|&b| b == b'{')?;
    let mut open: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(first) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                let Some(start) = open.pop() else { continue };
                if open.is_empty() {
                    return Some((start, i));
                }
                if best.map_or(true, |(s, _)| start < s) {
                    best = Some((start, i));
                }
            }
            _ => {}
        }
    }
    best
}

/// Parse the JSON payload embedded in a response body
pub fn parse_embedded_payload(body: &str) -> Result<Value> {
    let payload = extract_payload(body)?;
    serde_json::from_str(payload)
        .map_err(|e| SheetError::malformed(format!("embedded payload is not valid JSON: {}", e)))
}

/// Decode a response body into its result table
///
/// Fails with [`SheetError::InvalidQuery`] when the payload reports an error.
pub fn handle_response(body: &str) -> Result<TqTable> {
    let mut payload = parse_embedded_payload(body)?;
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_owned);

    match status.as_deref() {
        Some("error") => return Err(SheetError::InvalidQuery { payload }),
        Some("warning") => {
            let warnings = payload.get("warnings").cloned().unwrap_or_default();
            warn!("Query succeeded with warnings: {}", warnings);
        }
        _ => {}
    }

    let table = payload
        .as_object_mut()
        .and_then(|obj| obj.remove("table"))
        .ok_or_else(|| SheetError::malformed("response payload has no table"))?;

    serde_json::from_value(table)
        .map_err(|e| SheetError::malformed(format!("response table is malformed: {}", e)))
}

/// Forward-only sequence of materialized rows
///
/// Built from a fully received response; iterating performs no I/O.
/// Running the same query again requires a new call.
#[derive(Debug)]
pub struct Rows {
    labels: Vec<String>,
    shape: RowShape,
    rows: std::vec::IntoIter<TqRow>,
}

impl Rows {
    pub fn new(table: TqTable, shape: RowShape) -> Self {
        let labels = table.labels();
        Self {
            labels,
            shape,
            rows: table.rows.into_iter(),
        }
    }

    /// Column labels declared by the result
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn shape(&self) -> RowShape {
        self.shape
    }

    fn materialize(&self, row: TqRow) -> Row {
        match self.shape {
            RowShape::Mapping => Row::Mapping(
                self.labels
                    .iter()
                    .cloned()
                    .zip(row.cell_values())
                    .collect(),
            ),
            RowShape::Sequence => Row::Sequence(row.cell_values().collect()),
            RowShape::Tuple => Row::Tuple(row.cell_values().collect()),
        }
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let row = self.rows.next()?;
        Some(self.materialize(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Rows {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_RESPONSE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1094779711","table":{"cols":[{"id":"sum-A","label":"sum test","type":"number"},{"id":"sum-B","label":"sum test2","type":"number"}],"rows":[{"c":[{"v":15.0},{"v":40.0}]}],"parsedNumHeaders":0}});"#;

    const INVALID_RESPONSE: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid query: Column [test] does not exist in table."}]});"#;

    fn sample_table() -> TqTable {
        handle_response(VALID_RESPONSE).unwrap()
    }

    #[test]
    fn test_parse_embedded_payload() {
        let payload = parse_embedded_payload(VALID_RESPONSE).unwrap();
        assert_eq!(
            payload,
            json!({
                "version": "0.6",
                "reqId": "0",
                "status": "ok",
                "sig": "1094779711",
                "table": {
                    "cols": [
                        {"id": "sum-A", "label": "sum test", "type": "number"},
                        {"id": "sum-B", "label": "sum test2", "type": "number"}
                    ],
                    "rows": [{"c": [{"v": 15.0}, {"v": 40.0}]}],
                    "parsedNumHeaders": 0
                }
            })
        );
    }

    #[test]
    fn test_parse_embedded_payload_is_idempotent() {
        let payload = parse_embedded_payload(VALID_RESPONSE).unwrap();
        let reparsed = parse_embedded_payload(&payload.to_string()).unwrap();
        assert_eq!(payload, reparsed);
    }

    #[test]
    fn test_parse_without_braces_is_malformed() {
        assert!(matches!(
            parse_embedded_payload("setResponse();"),
            Err(SheetError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_embedded_payload(""),
            Err(SheetError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_unbalanced_or_invalid_is_malformed() {
        assert!(matches!(
            parse_embedded_payload("callback({\"status\": \"ok\""),
            Err(SheetError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_embedded_payload("callback({status: ok});"),
            Err(SheetError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_braces_inside_strings_do_not_nest() {
        let body = r#"cb({"status":"error","message":"unexpected '}' near {"});"#;
        let payload = parse_embedded_payload(body).unwrap();
        assert_eq!(payload["message"], json!("unexpected '}' near {"));
    }

    #[test]
    fn test_skips_unbalanced_leading_brace() {
        assert_eq!(extract_payload("{ junk {\"a\":1}").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_skips_unbalanced_brace_around_nested_object() {
        assert_eq!(
            extract_payload("x { {\"a\":{\"b\":1}} {\"c\":2}").unwrap(),
            "{\"a\":{\"b\":1}}"
        );
    }

    #[test]
    fn test_many_unclosed_braces_are_malformed() {
        let body = "{".repeat(100_000);
        assert!(matches!(
            extract_payload(&body),
            Err(SheetError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_warning_status_returns_table() {
        let body = r#"cb({"status":"warning","warnings":[{"reason":"data_truncated","message":"Retrieved data was truncated"}],"table":{"cols":[{"label":"name"}],"rows":[{"c":[{"v":"x"}]}]}});"#;
        let table = handle_response(body).unwrap();
        assert_eq!(table.labels(), vec!["name"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_missing_status_is_success() {
        let body = r#"cb({"table":{"cols":[{"label":"n"}],"rows":[{"c":[{"v":1}]},{"c":[{"v":2}]}]}});"#;
        let rows: Vec<Row> = handle_response(body)
            .unwrap()
            .into_rows(RowShape::Sequence)
            .collect();
        assert_eq!(
            rows,
            vec![Row::Sequence(vec![json!(1)]), Row::Sequence(vec![json!(2)])]
        );
    }

    #[test]
    fn test_valid_handle_response() {
        let table = sample_table();
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            json!({
                "cols": [
                    {"id": "sum-A", "label": "sum test", "type": "number"},
                    {"id": "sum-B", "label": "sum test2", "type": "number"}
                ],
                "rows": [{"c": [{"v": 15.0}, {"v": 40.0}]}],
                "parsedNumHeaders": 0
            })
        );
    }

    #[test]
    fn test_invalid_handle_response() {
        match handle_response(INVALID_RESPONSE) {
            Err(SheetError::InvalidQuery { payload }) => {
                assert_eq!(payload["status"], json!("error"));
                assert_eq!(payload["errors"][0]["reason"], json!("invalid_query"));
            }
            other => panic!("expected InvalidQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_without_table_is_malformed() {
        assert!(matches!(
            handle_response(r#"cb({"status":"ok"})"#),
            Err(SheetError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rows_as_mapping() {
        let rows: Vec<Row> = sample_table().into_rows(RowShape::Mapping).collect();
        assert_eq!(rows.len(), 1);
        let map = rows[0].as_mapping().unwrap();
        assert_eq!(
            serde_json::to_value(map).unwrap(),
            json!({"sum test": 15.0, "sum test2": 40.0})
        );
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["sum test", "sum test2"]);
    }

    #[test]
    fn test_rows_as_sequence() {
        let rows: Vec<Row> = sample_table().into_rows(RowShape::Sequence).collect();
        assert_eq!(rows, vec![Row::Sequence(vec![json!(15.0), json!(40.0)])]);
    }

    #[test]
    fn test_rows_as_tuple() {
        let rows: Vec<Row> = sample_table().into_rows(RowShape::Tuple).collect();
        assert_eq!(
            rows,
            vec![Row::Tuple(vec![json!(15.0), json!(40.0)].into_boxed_slice())]
        );
    }

    #[test]
    fn test_short_rows_and_null_cells() {
        let table: TqTable = serde_json::from_value(json!({
            "cols": [{"label": "a"}, {"label": "b"}, {"label": "c"}],
            "rows": [
                {"c": [{"v": 1}, null, {"v": true}]},
                {"c": [{"v": "x"}]}
            ]
        }))
        .unwrap();

        let mut rows = table.into_rows(RowShape::Mapping);
        assert_eq!(rows.len(), 2);

        let first = rows.next().unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            json!({"a": 1, "b": null, "c": true})
        );
        let second = rows.next().unwrap();
        assert_eq!(serde_json::to_value(&second).unwrap(), json!({"a": "x"}));
        assert!(rows.next().is_none());
    }
}
