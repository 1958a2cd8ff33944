//! Deals and the pipeline they move through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::id::{generate_id, IdKind};
use crate::record::{Record, StoredRecord};
use crate::value::CellValue;
use crate::format_timestamp;

// ============================================================================
// STAGES
// ============================================================================

/// Pipeline stage of a deal, stored as its lowercase id.
///
/// Variant order is board order; discriminants index [`DealStage::ALL`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStage {
    #[default]
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl DealStage {
    /// Board order.
    pub const ALL: [DealStage; 6] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::Won,
        DealStage::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "lead",
            DealStage::Qualified => "qualified",
            DealStage::Proposal => "proposal",
            DealStage::Negotiation => "negotiation",
            DealStage::Won => "won",
            DealStage::Lost => "lost",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DealStage::Lead => "Lead",
            DealStage::Qualified => "Qualified",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::Won => "Closed Won",
            DealStage::Lost => "Closed Lost",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, DealStage::Won | DealStage::Lost)
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DealStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStage {
                value: s.to_string(),
            })
    }
}

// ============================================================================
// NEW DEAL
// ============================================================================

/// Input for creating a deal row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDeal {
    pub id: Option<String>,
    pub title: String,
    pub account_id: String,
    pub account_name: String,
    pub owner: String,
    pub value: CellValue,
    pub source: String,
    pub close_date: String,
    pub stage: DealStage,
}

impl NewDeal {
    /// Build the full deal row. A missing id is generated; both timestamps
    /// are set to `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        let ts = format_timestamp(now);
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generate_id(IdKind::Deal));
        Record::new()
            .with("id", id)
            .with("title", self.title)
            .with("account_id", self.account_id)
            .with("account_name", self.account_name)
            .with("owner", self.owner)
            .with("value", self.value.to_cell_text().unwrap_or_default())
            .with("source", self.source)
            .with("close_date", self.close_date)
            .with("stage", self.stage.as_str())
            .with("created_at", ts.clone())
            .with("updated_at", ts)
    }
}

/// Validate the `stage` of a deal patch, if one is given.
pub fn validate_stage_patch(patch: &Record) -> Result<(), ValidationError> {
    match patch.text("stage") {
        Some(stage) => DealStage::from_str(&stage).map(|_| ()),
        None => Ok(()),
    }
}

// ============================================================================
// QUERIES
// ============================================================================

const FILTER_COLUMNS: [&str; 5] = ["id", "title", "account_name", "owner", "source"];

/// Case-insensitive substring match over the searchable deal columns.
/// An empty or blank query matches everything.
pub fn deal_matches(deal: &StoredRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    FILTER_COLUMNS
        .iter()
        .any(|col| deal.get_or_empty(col).to_lowercase().contains(&needle))
}

/// Count of deals in one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: DealStage,
    pub name: String,
    pub count: usize,
}

/// Deals grouped by stage, in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub stages: Vec<StageCount>,
    /// Every deal, including those with an unrecognised stage.
    pub total: usize,
    /// Deals whose stage cell is not a known stage.
    pub unstaged: usize,
    /// Whole-percent share of won deals over all deals.
    pub win_rate_pct: u32,
}

impl PipelineSummary {
    pub fn from_deals(deals: &[StoredRecord]) -> Self {
        let mut counts = [0usize; DealStage::ALL.len()];
        let mut unstaged = 0;
        for deal in deals {
            match DealStage::from_str(deal.get_or_empty("stage")) {
                Ok(stage) => {
                    counts[stage as usize] += 1;
                }
                Err(_) => unstaged += 1,
            }
        }

        let total = deals.len();
        let won = counts[DealStage::Won as usize];
        let win_rate_pct = ((won as f64 / total.max(1) as f64) * 100.0).round() as u32;

        let stages = DealStage::ALL
            .iter()
            .zip(counts)
            .map(|(stage, count)| StageCount {
                stage: *stage,
                name: stage.display_name().to_string(),
                count,
            })
            .collect();

        Self {
            stages,
            total,
            unstaged,
            win_rate_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deal(id: &str, title: &str, stage: &str) -> StoredRecord {
        let header: Vec<String> = ["id", "title", "account_name", "owner", "source", "stage"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row: Vec<String> = [id, title, "Cafe A Co., Ltd.", "Nok", "Referral", stage]
            .iter()
            .map(|s| s.to_string())
            .collect();
        StoredRecord::from_row(&header, &row)
    }

    #[test]
    fn test_stage_round_trips_through_str() {
        for stage in DealStage::ALL {
            assert_eq!(stage.as_str().parse::<DealStage>().unwrap(), stage);
        }
        assert!(matches!(
            "closed".parse::<DealStage>(),
            Err(ValidationError::UnknownStage { .. })
        ));
    }

    #[test]
    fn test_new_deal_record_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let record = NewDeal {
            title: "POS upgrade".to_string(),
            value: CellValue::Number(45000.0),
            ..Default::default()
        }
        .into_record(now);

        assert!(record.text("id").unwrap().starts_with("D-"));
        assert_eq!(record.text("stage").as_deref(), Some("lead"));
        assert_eq!(record.text("value").as_deref(), Some("45000"));
        assert_eq!(record.text("created_at").as_deref(), Some("2024-05-01T08:30:00.000Z"));
        assert_eq!(record.text("created_at"), record.text("updated_at"));
    }

    #[test]
    fn test_blank_id_is_replaced() {
        let record = NewDeal {
            id: Some("  ".to_string()),
            ..Default::default()
        }
        .into_record(Utc::now());
        assert!(record.text("id").unwrap().starts_with("D-"));
    }

    #[test]
    fn test_validate_stage_patch() {
        assert!(validate_stage_patch(&Record::new().with("stage", "won")).is_ok());
        assert!(validate_stage_patch(&Record::new().with("title", "x")).is_ok());
        assert!(validate_stage_patch(&Record::new().with("stage", "closed")).is_err());
    }

    #[test]
    fn test_deal_matches_filter() {
        let d = deal("D-1001", "POS upgrade for Cafe A", "lead");
        assert!(deal_matches(&d, ""));
        assert!(deal_matches(&d, "pos"));
        assert!(deal_matches(&d, "cafe a co"));
        assert!(deal_matches(&d, "REFERRAL"));
        assert!(!deal_matches(&d, "warehouse"));
    }

    #[test]
    fn test_pipeline_summary_counts_and_win_rate() {
        let deals = vec![
            deal("D-1", "a", "lead"),
            deal("D-2", "b", "won"),
            deal("D-3", "c", "won"),
            deal("D-4", "d", "lost"),
            deal("D-5", "e", "archived"),
            deal("D-6", "f", "proposal"),
        ];
        let summary = PipelineSummary::from_deals(&deals);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.unstaged, 1);
        assert_eq!(summary.win_rate_pct, 33);
        let won = summary.stages.iter().find(|s| s.stage == DealStage::Won).unwrap();
        assert_eq!(won.count, 2);
        assert_eq!(won.name, "Closed Won");
        assert_eq!(summary.stages.len(), 6);
        assert_eq!(summary.stages[0].stage, DealStage::Lead);
    }

    #[test]
    fn test_pipeline_summary_empty() {
        let summary = PipelineSummary::from_deals(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.win_rate_pct, 0);
    }
}
