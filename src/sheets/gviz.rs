//! Public-sheet export parsing (direct transport).
//!
//! The export endpoint answers with a JavaScript call expression:
//! `google.visualization.Query.setResponse({...});`. The JSON payload sits
//! between the prefix and the last `);`.

use serde::Deserialize;
use serde_json::Value;

use super::normalize::{normalize_cell, normalize_header, Row};
use crate::error::SheetError;

pub const GVIZ_PREFIX: &str = "google.visualization.Query.setResponse(";
pub const GVIZ_TERMINATOR: &str = ");";

#[derive(Debug, Default, Deserialize)]
pub struct GvizResponse {
    #[serde(default)]
    pub table: Option<GvizTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GvizTable {
    #[serde(default)]
    pub cols: Vec<GvizColumn>,
    #[serde(default)]
    pub rows: Vec<GvizRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GvizColumn {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GvizRow {
    /// Empty cells arrive as `null` entries.
    #[serde(default)]
    pub c: Option<Vec<Option<GvizCell>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GvizCell {
    #[serde(default)]
    pub v: Option<Value>,
}

/// Strip the call-expression wrapper and parse the payload.
pub fn parse_gviz(raw: &str) -> Result<GvizResponse, SheetError> {
    let start = raw
        .find(GVIZ_PREFIX)
        .ok_or_else(|| SheetError::Parse("response prefix not found".into()))?;
    let json_start = start + GVIZ_PREFIX.len();
    let json_end = raw
        .rfind(GVIZ_TERMINATOR)
        .filter(|end| *end >= json_start)
        .ok_or_else(|| SheetError::Parse("response terminator not found".into()))?;

    let payload = raw[json_start..json_end].trim();
    Ok(serde_json::from_str(payload)?)
}

/// Align `rows[].c[].v` with `cols[].label` and normalize both.
pub fn table_rows(response: &GvizResponse) -> Vec<Row> {
    let Some(table) = &response.table else {
        return Vec::new();
    };

    let headers: Vec<String> = table
        .cols
        .iter()
        .enumerate()
        .map(|(index, col)| match col.label.as_deref() {
            Some(label) if !label.is_empty() => normalize_header(label),
            _ => format!("column_{}", index + 1),
        })
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let value = row
                        .c
                        .as_ref()
                        .and_then(|cells| cells.get(index))
                        .and_then(|cell| cell.as_ref())
                        .and_then(|cell| cell.v.as_ref())
                        .map(normalize_cell)
                        .unwrap_or_default();
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Parse a raw export body straight into normalized rows.
pub fn parse_rows(raw: &str) -> Result<Vec<Row>, SheetError> {
    parse_gviz(raw).map(|response| table_rows(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    const SAMPLE: &str = r#"google.visualization.Query.setResponse({"table":{"cols":[{"label":"Name"}],"rows":[{"c":[{"v":"Test"}]}]}});"#;

    #[test]
    fn single_cell_round_trip() {
        let rows = parse_rows(SAMPLE).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["name"], "Test");
    }

    #[test]
    fn leading_comment_is_skipped() {
        let raw = format!("/*O_o*/\n{SAMPLE}");
        let rows = parse_rows(&raw).unwrap();
        assert_eq!(rows[0]["name"], "Test");
    }

    #[test]
    fn missing_prefix_is_parse_error() {
        let err = parse_rows(r#"{"table":{}}"#).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Parse);
    }

    #[test]
    fn broken_payload_is_parse_error() {
        let raw = "google.visualization.Query.setResponse({not json});";
        assert_eq!(parse_rows(raw).unwrap_err().class(), ErrorClass::Parse);
    }

    #[test]
    fn missing_labels_get_generated_headers() {
        let raw = r#"google.visualization.Query.setResponse({"table":{"cols":[{"label":""},{}],"rows":[{"c":[{"v":"a"},{"v":"b"}]}]}});"#;
        let rows = parse_rows(raw).unwrap();
        assert_eq!(rows[0]["column_1"], "a");
        assert_eq!(rows[0]["column_2"], "b");
    }

    #[test]
    fn null_and_short_cells_are_empty() {
        let raw = r#"google.visualization.Query.setResponse({"table":{"cols":[{"label":"Bed ID"},{"label":"Status"},{"label":"Hospital ID"}],"rows":[{"c":[{"v":"B1"},null]},{"c":null},{"c":[{"v":null},{"v":" free "},{"v":"HOSP001"}]}]}});"#;
        let rows = parse_rows(raw).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["bed_id"], "B1");
        assert_eq!(rows[0]["status"], "");
        assert_eq!(rows[0]["hospital_id"], "");
        assert!(rows[1].values().all(String::is_empty));
        assert_eq!(rows[2]["bed_id"], "");
        assert_eq!(rows[2]["status"], "free");
    }

    #[test]
    fn numeric_cells_render_as_integers() {
        let raw = r#"google.visualization.Query.setResponse({"table":{"cols":[{"label":"Units"}],"rows":[{"c":[{"v":12.0}]}]}});"#;
        assert_eq!(parse_rows(raw).unwrap()[0]["units"], "12");
    }

    #[test]
    fn missing_table_yields_no_rows() {
        let raw = r#"google.visualization.Query.setResponse({"status":"ok"});"#;
        assert!(parse_rows(raw).unwrap().is_empty());
    }
}
