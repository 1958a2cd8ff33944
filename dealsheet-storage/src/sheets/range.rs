//! A1 range notation for whole-table and single-row access.

/// Last column covered by table ranges.
pub const LAST_COLUMN: &str = "ZZ";

/// Range covering every row of `table` (`Deals!A:ZZ`).
pub fn table_range(table: &str) -> String {
    format!("{}!A:{}", quote_sheet_name(table), LAST_COLUMN)
}

/// Range covering 1-based sheet row `row_number` of `table` (`Deals!A5:ZZ5`).
pub fn row_range(table: &str, row_number: usize) -> String {
    format!(
        "{}!A{n}:{}{n}",
        quote_sheet_name(table),
        LAST_COLUMN,
        n = row_number
    )
}

/// Quote a sheet name for A1 notation when it is not a plain identifier.
///
/// `Deals` stays as is; `Quote Items` becomes `'Quote Items'` and
/// `Bob's` becomes `'Bob''s'`.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_range() {
        assert_eq!(table_range("Deals"), "Deals!A:ZZ");
        assert_eq!(table_range("QuoteItems"), "QuoteItems!A:ZZ");
    }

    #[test]
    fn test_row_range() {
        assert_eq!(row_range("Deals", 2), "Deals!A2:ZZ2");
        assert_eq!(row_range("Deals", 117), "Deals!A117:ZZ117");
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Quote Items"), "'Quote Items'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(quote_sheet_name("2024"), "'2024'");
        assert_eq!(quote_sheet_name("deals_2024"), "deals_2024");
        assert_eq!(row_range("Q-1", 3), "'Q-1'!A3:ZZ3");
    }
}
