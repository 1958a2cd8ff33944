//! Error types for Dealsheet operations

use thiserror::Error;

/// What a lookup against a table failed to find.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotFound {
    #[error("column '{column}' not found in header of table {table}")]
    Column { table: String, column: String },

    #[error("row with {column}={value} not found in table {table}")]
    Row {
        table: String,
        column: String,
        value: String,
    },

    #[error("table {table} has no header row")]
    Header { table: String },
}

/// Storage layer errors.
///
/// Only [`StoreError::NotFound`] carries a "the record is not there" meaning.
/// Everything else is a failure of the store itself and must never be read as
/// absence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Missing or invalid configuration {field}: {reason}")]
    Configuration { field: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(#[from] NotFound),

    #[error("Transport error during {operation}: {message}")]
    Transport { operation: String, message: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True when an update failed because the key column or the keyed row is
    /// absent. A missing header row is not included: there is nowhere to
    /// append to either.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(NotFound::Column { .. }) | StoreError::NotFound(NotFound::Row { .. })
        )
    }
}

/// Domain validation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Unknown deal stage: {value}")]
    UnknownStage { value: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Dealsheet errors.
#[derive(Debug, Clone, Error)]
pub enum DealsheetError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for Dealsheet operations.
pub type DealsheetResult<T> = Result<T, DealsheetError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_row_not_found() {
        let err = StoreError::from(NotFound::Row {
            table: "Deals".to_string(),
            column: "id".to_string(),
            value: "D-1".to_string(),
        });
        let msg = format!("{}", err);
        assert!(msg.contains("Not found"));
        assert!(msg.contains("id=D-1"));
        assert!(msg.contains("Deals"));
    }

    #[test]
    fn test_store_error_display_transport() {
        let err = StoreError::transport("append_row", "503 Service Unavailable");
        let msg = format!("{}", err);
        assert!(msg.contains("append_row"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_is_not_found_only_for_column_and_row() {
        let column = StoreError::from(NotFound::Column {
            table: "Deals".to_string(),
            column: "nope".to_string(),
        });
        let row = StoreError::from(NotFound::Row {
            table: "Deals".to_string(),
            column: "id".to_string(),
            value: "X".to_string(),
        });
        let header = StoreError::from(NotFound::Header {
            table: "Deals".to_string(),
        });

        assert!(column.is_not_found());
        assert!(row.is_not_found());
        assert!(!header.is_not_found());
        assert!(!StoreError::transport("read_rows", "timeout").is_not_found());
        assert!(!StoreError::configuration("spreadsheet_id", "missing").is_not_found());
        assert!(!StoreError::LockPoisoned.is_not_found());
    }

    #[test]
    fn test_validation_error_display_invalid_field_value() {
        let err = ValidationError::InvalidFieldValue {
            field: "vat_pct".to_string(),
            value: "150".to_string(),
            reason: "must be between 0 and 100".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("vat_pct"));
        assert!(msg.contains("150"));
        assert!(msg.contains("between 0 and 100"));
    }

    #[test]
    fn test_dealsheet_error_from_variants() {
        let store = DealsheetError::from(StoreError::LockPoisoned);
        assert!(matches!(store, DealsheetError::Store(_)));

        let validation = DealsheetError::from(ValidationError::UnknownStage {
            value: "closed".to_string(),
        });
        assert!(matches!(validation, DealsheetError::Validation(_)));
    }
}
