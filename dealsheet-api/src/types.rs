//! Request and response bodies.
//!
//! Request fields accept both the snake_case column names and the camelCase
//! names the web client sends (`closeDate`, `taxId`, `vatPct`, ...).

use dealsheet_core::{
    CellValue, Contact, DealStage, NewAccount, NewDeal, NewQuote, QuoteItem, QuoteTotals,
    ValidationError, DEFAULT_VAT_PCT,
};
use dealsheet_storage::UpsertOutcome;
use serde::{Deserialize, Serialize};

// ============================================================================
// ENVELOPE
// ============================================================================

/// Successful response body: `{"status": true, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { status: true, data }
    }
}

// ============================================================================
// DEALS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDealsQuery {
    /// Case-insensitive substring filter.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDealRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "accountId")]
    pub account_id: String,
    #[serde(default, alias = "account")]
    pub account_name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub source: String,
    #[serde(default, alias = "closeDate")]
    pub close_date: String,
    #[serde(default)]
    pub stage: Option<String>,
}

impl CreateDealRequest {
    /// Blank stage means a new lead; anything else must be a known stage.
    pub fn into_new_deal(self) -> Result<NewDeal, ValidationError> {
        let stage = match self.stage.as_deref().map(str::trim) {
            None | Some("") => DealStage::default(),
            Some(s) => s.parse()?,
        };
        Ok(NewDeal {
            id: self.id,
            title: self.title,
            account_id: self.account_id,
            account_name: self.account_name,
            owner: self.owner,
            value: self.value,
            source: self.source,
            close_date: self.close_date,
            stage,
        })
    }
}

/// Which path a deal upsert took.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpsertDealResponse {
    pub id: String,
    pub outcome: UpsertOutcome,
}

// ============================================================================
// ACCOUNTS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "taxId")]
    pub tax_id: String,
    #[serde(default, alias = "billingAddress")]
    pub billing_address: String,
    #[serde(default, alias = "primaryContact")]
    pub primary_contact: Option<ContactRequest>,
    #[serde(default, alias = "contactName")]
    pub contact_name: String,
    #[serde(default, alias = "contactEmail")]
    pub contact_email: String,
    #[serde(default, alias = "contactPhone")]
    pub contact_phone: String,
}

impl CreateAccountRequest {
    /// Nested `primaryContact` fields win over the flat ones when non-empty.
    pub fn into_new_account(self) -> NewAccount {
        let nested = self.primary_contact.unwrap_or_default();
        let pick = |nested: String, flat: String| if nested.is_empty() { flat } else { nested };
        NewAccount {
            id: self.id,
            name: self.name,
            tax_id: self.tax_id,
            billing_address: self.billing_address,
            contact: Contact {
                name: pick(nested.name, self.contact_name),
                email: pick(nested.email, self.contact_email),
                phone: pick(nested.phone, self.contact_phone),
            },
        }
    }
}

// ============================================================================
// QUOTES
// ============================================================================

fn default_vat_pct() -> f64 {
    DEFAULT_VAT_PCT
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "dealId", alias = "forDealId")]
    pub deal_id: String,
    #[serde(default, alias = "discountPct")]
    pub discount_pct: f64,
    #[serde(default = "default_vat_pct", alias = "vatPct")]
    pub vat_pct: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<QuoteItem>,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(req: CreateQuoteRequest) -> Self {
        NewQuote {
            id: req.id,
            deal_id: req.deal_id,
            discount_pct: req.discount_pct,
            vat_pct: req.vat_pct,
            notes: req.notes,
            items: req.items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateQuoteResponse {
    pub id: String,
    pub totals: QuoteTotals,
    pub line_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deal_request_accepts_client_names() {
        let req: CreateDealRequest = serde_json::from_value(json!({
            "title": "POS upgrade",
            "account": "Cafe A",
            "closeDate": "2024-06-30",
            "value": 45000
        }))
        .unwrap();
        let deal = req.into_new_deal().unwrap();
        assert_eq!(deal.account_name, "Cafe A");
        assert_eq!(deal.close_date, "2024-06-30");
        assert_eq!(deal.value, CellValue::Number(45000.0));
        assert_eq!(deal.stage, DealStage::Lead);
    }

    #[test]
    fn test_deal_request_rejects_unknown_stage() {
        let req = CreateDealRequest {
            stage: Some("maybe".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            req.into_new_deal(),
            Err(ValidationError::UnknownStage { .. })
        ));
    }

    #[test]
    fn test_account_contact_precedence() {
        let req: CreateAccountRequest = serde_json::from_value(json!({
            "name": "Cafe A",
            "taxId": "0105551234567",
            "primaryContact": {"name": "Nok", "email": ""},
            "contactEmail": "nok@cafe-a.example",
            "contactName": "ignored"
        }))
        .unwrap();
        let account = req.into_new_account();
        assert_eq!(account.tax_id, "0105551234567");
        assert_eq!(account.contact.name, "Nok");
        assert_eq!(account.contact.email, "nok@cafe-a.example");
        assert_eq!(account.contact.phone, "");
    }

    #[test]
    fn test_quote_request_defaults() {
        let req: CreateQuoteRequest = serde_json::from_value(json!({
            "forDealId": "D-1001",
            "items": [{"sku": "CRM-PRO", "name": "CRM Pro (Monthly)", "price": 2490}]
        }))
        .unwrap();
        assert_eq!(req.deal_id, "D-1001");
        assert_eq!(req.discount_pct, 0.0);
        assert_eq!(req.vat_pct, DEFAULT_VAT_PCT);
        assert_eq!(req.items[0].qty, 1.0);
    }
}
