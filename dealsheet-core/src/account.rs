//! Customer accounts.

use chrono::{DateTime, Utc};

use crate::format_timestamp;
use crate::id::{generate_id, IdKind};
use crate::record::Record;

/// Primary contact person of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Input for creating an account row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub id: Option<String>,
    pub name: String,
    pub tax_id: String,
    pub billing_address: String,
    pub contact: Contact,
}

impl NewAccount {
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        let ts = format_timestamp(now);
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generate_id(IdKind::Account));
        Record::new()
            .with("id", id)
            .with("name", self.name)
            .with("tax_id", self.tax_id)
            .with("billing_address", self.billing_address)
            .with("contact_name", self.contact.name)
            .with("contact_email", self.contact.email)
            .with("contact_phone", self.contact.phone)
            .with("created_at", ts.clone())
            .with("updated_at", ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_record_keeps_given_id() {
        let record = NewAccount {
            id: Some("A-777".to_string()),
            name: "Cafe A Co., Ltd.".to_string(),
            contact: Contact {
                email: "owner@cafe-a.example".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
        .into_record(Utc::now());

        assert_eq!(record.text("id").as_deref(), Some("A-777"));
        assert_eq!(record.text("contact_email").as_deref(), Some("owner@cafe-a.example"));
        assert_eq!(record.text("contact_phone").as_deref(), Some(""));
        assert_eq!(record.len(), 9);
    }

    #[test]
    fn test_account_record_generates_id() {
        let record = NewAccount::default().into_record(Utc::now());
        assert!(record.text("id").unwrap().starts_with("A-"));
    }
}
