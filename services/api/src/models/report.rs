//! Progress report model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dated free-text record attached to a mentorship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub id: Uuid,
    pub mentorship_id: Uuid,
    pub report_text: String,
    pub report_date: NaiveDate,
    pub ai_insights: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProgressReport {
    pub mentorship_id: Uuid,
    pub report_text: String,
    pub report_date: NaiveDate,
    pub ai_insights: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProgressReport {
    pub report_text: Option<String>,
    pub report_date: Option<NaiveDate>,
    pub ai_insights: Option<String>,
}

impl UpdateProgressReport {
    pub fn apply_to(&self, report: &mut ProgressReport) {
        if let Some(report_text) = &self.report_text {
            report.report_text = report_text.clone();
        }
        if let Some(report_date) = self.report_date {
            report.report_date = report_date;
        }
        if let Some(ai_insights) = &self.ai_insights {
            report.ai_insights = Some(ai_insights.clone());
        }
        report.updated_at = Utc::now();
    }
}
