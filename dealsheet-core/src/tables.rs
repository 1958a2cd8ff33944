//! Table layouts used by the sales pipeline.
//!
//! The header row in the sheet is authoritative; these lists are what a fresh
//! sheet gets seeded with and what the row builders fill in.

/// Default table name for deals.
pub const DEALS_TABLE: &str = "Deals";
/// Default table name for accounts.
pub const ACCOUNTS_TABLE: &str = "Accounts";
/// Default table name for quote headers.
pub const QUOTES_TABLE: &str = "Quotes";
/// Default table name for quote line items.
pub const QUOTE_ITEMS_TABLE: &str = "QuoteItems";

/// Key column shared by deals, accounts and quotes.
pub const ID_COLUMN: &str = "id";

pub const DEAL_COLUMNS: &[&str] = &[
    "id",
    "title",
    "account_id",
    "account_name",
    "owner",
    "value",
    "source",
    "close_date",
    "stage",
    "created_at",
    "updated_at",
];

pub const ACCOUNT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "tax_id",
    "billing_address",
    "contact_name",
    "contact_email",
    "contact_phone",
    "created_at",
    "updated_at",
];

pub const QUOTE_COLUMNS: &[&str] = &[
    "id",
    "deal_id",
    "discount_pct",
    "vat_pct",
    "notes",
    "subtotal",
    "discount",
    "before_vat",
    "vat",
    "total",
    "created_at",
];

pub const QUOTE_ITEM_COLUMNS: &[&str] = &[
    "quote_id", "line_no", "sku", "name", "price", "qty", "subtotal",
];

/// Configured names of the four tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub deals: String,
    pub accounts: String,
    pub quotes: String,
    pub quote_items: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            deals: DEALS_TABLE.to_string(),
            accounts: ACCOUNTS_TABLE.to_string(),
            quotes: QUOTES_TABLE.to_string(),
            quote_items: QUOTE_ITEMS_TABLE.to_string(),
        }
    }
}

impl TableNames {
    /// Each configured table paired with its seed header.
    pub fn layouts(&self) -> [(&str, &'static [&'static str]); 4] {
        [
            (self.deals.as_str(), DEAL_COLUMNS),
            (self.accounts.as_str(), ACCOUNT_COLUMNS),
            (self.quotes.as_str(), QUOTE_COLUMNS),
            (self.quote_items.as_str(), QUOTE_ITEM_COLUMNS),
        ]
    }
}
