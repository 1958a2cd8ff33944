//! Scalar cell values.
//!
//! The spreadsheet stores text only. Callers may hand the store numbers and
//! booleans, which are turned into text on the way in; nothing is ever parsed
//! back on the way out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar written into a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Treated as "not specified": kept on update, empty on append.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text representation as it will be stored in the sheet.
    ///
    /// `Null` yields `None`; callers decide what absence means.
    pub fn to_cell_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

/// Integral values print without a fractional part (`3`, not `3.0`).
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_cell_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_stringification() {
        assert_eq!(CellValue::Number(3.0).to_cell_text().as_deref(), Some("3"));
        assert_eq!(CellValue::Number(2.5).to_cell_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Number(-12.0).to_cell_text().as_deref(), Some("-12"));
        assert_eq!(CellValue::Number(0.1).to_cell_text().as_deref(), Some("0.1"));
    }

    #[test]
    fn test_bool_and_null_stringification() {
        assert_eq!(CellValue::Bool(true).to_cell_text().as_deref(), Some("true"));
        assert_eq!(CellValue::Bool(false).to_cell_text().as_deref(), Some("false"));
        assert_eq!(CellValue::Null.to_cell_text(), None);
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_deserialize_json_scalars() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[null, true, 42, 1.5, "won"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Bool(true),
                CellValue::Number(42.0),
                CellValue::Number(1.5),
                CellValue::Text("won".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<String>), CellValue::Null);
        assert_eq!(
            CellValue::from(Some("x")),
            CellValue::Text("x".to_string())
        );
    }
}
