//! Price quotations: line items, flat percentage discount and VAT.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::format_timestamp;
use crate::id::{generate_id, IdKind};
use crate::record::Record;

/// VAT rate applied when a quote does not specify one.
pub const DEFAULT_VAT_PCT: f64 = 7.0;

// ============================================================================
// CATALOG
// ============================================================================

/// A sellable product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogItem {
    pub sku: &'static str,
    pub name: &'static str,
    pub price: f64,
}

/// Fixed product catalog offered on quotes.
pub const CATALOG: &[CatalogItem] = &[
    CatalogItem {
        sku: "CRM-START",
        name: "CRM Starter (Monthly)",
        price: 990.0,
    },
    CatalogItem {
        sku: "CRM-PRO",
        name: "CRM Pro (Monthly)",
        price: 2490.0,
    },
    CatalogItem {
        sku: "IMP-ONB",
        name: "Implementation & Onboarding",
        price: 15000.0,
    },
    CatalogItem {
        sku: "TRN-TEAM",
        name: "Team Training (per session)",
        price: 5000.0,
    },
];

pub fn catalog_item(sku: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.sku == sku)
}

// ============================================================================
// QUOTE MATH
// ============================================================================

/// One quoted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_qty")]
    pub qty: f64,
}

fn default_qty() -> f64 {
    1.0
}

impl QuoteItem {
    pub fn line_total(&self) -> f64 {
        round_money(self.price * self.qty)
    }
}

/// Computed amounts of a quote, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub before_vat: f64,
    pub vat: f64,
    pub total: f64,
}

impl QuoteTotals {
    pub fn compute(items: &[QuoteItem], discount_pct: f64, vat_pct: f64) -> Self {
        let subtotal: f64 = items.iter().map(|it| it.price * it.qty).sum();
        let discount = subtotal * discount_pct / 100.0;
        let before_vat = (subtotal - discount).max(0.0);
        let vat = before_vat * vat_pct / 100.0;
        Self {
            subtotal: round_money(subtotal),
            discount: round_money(discount),
            before_vat: round_money(before_vat),
            vat: round_money(vat),
            total: round_money(before_vat + vat),
        }
    }
}

fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// ============================================================================
// NEW QUOTE
// ============================================================================

/// Input for drafting a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub id: Option<String>,
    pub deal_id: String,
    pub discount_pct: f64,
    pub vat_pct: f64,
    pub notes: String,
    pub items: Vec<QuoteItem>,
}

impl Default for NewQuote {
    fn default() -> Self {
        Self {
            id: None,
            deal_id: String::new(),
            discount_pct: 0.0,
            vat_pct: DEFAULT_VAT_PCT,
            notes: String::new(),
            items: Vec::new(),
        }
    }
}

/// Rows produced for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRows {
    pub id: String,
    pub totals: QuoteTotals,
    pub quote: Record,
    pub items: Vec<Record>,
}

impl NewQuote {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_pct("discount_pct", self.discount_pct)?;
        check_pct("vat_pct", self.vat_pct)?;
        for (i, item) in self.items.iter().enumerate() {
            check_non_negative(&format!("items[{}].price", i), item.price)?;
            check_non_negative(&format!("items[{}].qty", i), item.qty)?;
        }
        Ok(())
    }

    /// Validate, compute totals, and build the quote row plus one row per
    /// line item (`line_no` counts from 1).
    pub fn into_rows(self, now: DateTime<Utc>) -> Result<QuoteRows, ValidationError> {
        self.validate()?;
        let totals = QuoteTotals::compute(&self.items, self.discount_pct, self.vat_pct);
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generate_id(IdKind::Quote));

        let quote = Record::new()
            .with("id", id.clone())
            .with("deal_id", self.deal_id)
            .with("discount_pct", self.discount_pct)
            .with("vat_pct", self.vat_pct)
            .with("notes", self.notes)
            .with("subtotal", totals.subtotal)
            .with("discount", totals.discount)
            .with("before_vat", totals.before_vat)
            .with("vat", totals.vat)
            .with("total", totals.total)
            .with("created_at", format_timestamp(now));

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Record::new()
                    .with("quote_id", id.clone())
                    .with("line_no", (i + 1) as u32)
                    .with("sku", item.sku.clone())
                    .with("name", item.name.clone())
                    .with("price", item.price)
                    .with("qty", item.qty)
                    .with("subtotal", item.line_total())
            })
            .collect();

        Ok(QuoteRows {
            id,
            totals,
            quote,
            items,
        })
    }
}

fn check_pct(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be between 0 and 100".to_string(),
        });
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidFieldValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(price: f64, qty: f64) -> QuoteItem {
        QuoteItem {
            sku: "CRM-PRO".to_string(),
            name: "CRM Pro (Monthly)".to_string(),
            price,
            qty,
        }
    }

    #[test]
    fn test_totals_with_discount_and_vat() {
        let totals = QuoteTotals::compute(&[item(2490.0, 2.0), item(15000.0, 1.0)], 10.0, 7.0);
        assert_eq!(totals.subtotal, 19980.0);
        assert_eq!(totals.discount, 1998.0);
        assert_eq!(totals.before_vat, 17982.0);
        assert_eq!(totals.vat, 1258.74);
        assert_eq!(totals.total, 19240.74);
    }

    #[test]
    fn test_totals_empty_quote() {
        let totals = QuoteTotals::compute(&[], 0.0, DEFAULT_VAT_PCT);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_into_rows_numbers_lines() {
        let rows = NewQuote {
            id: Some("Q-12345".to_string()),
            deal_id: "D-1001".to_string(),
            items: vec![item(990.0, 3.0), item(5000.0, 1.0)],
            ..Default::default()
        }
        .into_rows(Utc::now())
        .unwrap();

        assert_eq!(rows.id, "Q-12345");
        assert_eq!(rows.quote.text("vat_pct").as_deref(), Some("7"));
        assert_eq!(rows.quote.text("subtotal").as_deref(), Some("7970"));
        assert_eq!(rows.items.len(), 2);
        assert_eq!(rows.items[0].text("line_no").as_deref(), Some("1"));
        assert_eq!(rows.items[0].text("subtotal").as_deref(), Some("2970"));
        assert_eq!(rows.items[1].text("line_no").as_deref(), Some("2"));
        assert_eq!(rows.items[1].text("quote_id").as_deref(), Some("Q-12345"));
    }

    #[test]
    fn test_validation_rejects_bad_percentages() {
        let quote = NewQuote {
            vat_pct: 150.0,
            ..Default::default()
        };
        assert!(matches!(
            quote.validate(),
            Err(ValidationError::InvalidFieldValue { ref field, .. }) if field == "vat_pct"
        ));

        let quote = NewQuote {
            discount_pct: f64::NAN,
            ..Default::default()
        };
        assert!(quote.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_qty() {
        let quote = NewQuote {
            items: vec![item(100.0, -1.0)],
            ..Default::default()
        };
        assert!(quote.into_rows(Utc::now()).is_err());
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(catalog_item("IMP-ONB").map(|c| c.price), Some(15000.0));
        assert!(catalog_item("NOPE").is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_total_never_below_zero_and_vat_applies_after_discount(
            prices in prop::collection::vec(0.0f64..100_000.0, 0..6),
            discount_pct in 0.0f64..=100.0,
            vat_pct in 0.0f64..=100.0,
        ) {
            let items: Vec<QuoteItem> = prices.iter().map(|p| item(*p, 1.0)).collect();
            let totals = QuoteTotals::compute(&items, discount_pct, vat_pct);
            prop_assert!(totals.before_vat >= 0.0);
            prop_assert!(totals.total >= totals.before_vat - 0.01);
            prop_assert!((totals.total - (totals.before_vat + totals.vat)).abs() <= 0.011);
        }
    }
}
