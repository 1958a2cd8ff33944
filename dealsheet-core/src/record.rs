//! Record views over header-plus-rows tables.
//!
//! [`Record`] is what callers write: a sparse map of column name to value.
//! [`StoredRecord`] is what they read back: one text cell per header column,
//! in header order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::value::CellValue;

// ============================================================================
// WRITE VIEW
// ============================================================================

/// A column-name-keyed set of values to append or patch.
///
/// Columns missing from the map and columns holding [`CellValue::Null`] are
/// both "not specified".
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, CellValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Option<CellValue> {
        self.0.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Stored text for `column`, or `None` when the column is unspecified.
    pub fn text(&self, column: &str) -> Option<String> {
        self.0.get(column).and_then(CellValue::to_cell_text)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.get(column).is_some_and(|v| !v.is_null())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// READ VIEW
// ============================================================================

/// One data row projected onto its table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    fields: Vec<(String, String)>,
}

impl StoredRecord {
    /// Project `row` onto `header`. Missing cells become `""`; cells past the
    /// end of the header are ignored.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`get`](Self::get) but absent columns read as `""`.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert into a write-side record holding the same text values.
    pub fn to_record(&self) -> Record {
        self.iter().collect()
    }
}

impl Serialize for StoredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_row_pads_short_rows() {
        let h = header(&["id", "title", "stage"]);
        let rec = StoredRecord::from_row(&h, &["D-1".to_string()]);
        assert_eq!(rec.get("id"), Some("D-1"));
        assert_eq!(rec.get("title"), Some(""));
        assert_eq!(rec.get("stage"), Some(""));
        assert_eq!(rec.get("missing"), None);
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn test_from_row_ignores_cells_past_header() {
        let h = header(&["id"]);
        let rec = StoredRecord::from_row(&h, &["D-1".to_string(), "stray".to_string()]);
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("id"), Some("D-1"));
    }

    #[test]
    fn test_serializes_in_header_order() {
        let h = header(&["stage", "id", "title"]);
        let row: Vec<String> = vec!["lead".into(), "D-1".into(), "Alpha".into()];
        let json = serde_json::to_string(&StoredRecord::from_row(&h, &row)).unwrap();
        assert_eq!(json, r#"{"stage":"lead","id":"D-1","title":"Alpha"}"#);
    }

    #[test]
    fn test_record_null_is_unspecified() {
        let rec = Record::new().with("a", "x").with("b", CellValue::Null);
        assert!(rec.contains("a"));
        assert!(!rec.contains("b"));
        assert_eq!(rec.text("b"), None);
        assert_eq!(rec.text("a").as_deref(), Some("x"));
    }

    #[test]
    fn test_record_deserializes_from_json_object() {
        let rec: Record = serde_json::from_str(r#"{"stage":"won","value":1200,"hot":true}"#).unwrap();
        assert_eq!(rec.text("stage").as_deref(), Some("won"));
        assert_eq!(rec.text("value").as_deref(), Some("1200"));
        assert_eq!(rec.text("hot").as_deref(), Some("true"));
    }
}
