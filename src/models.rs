use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the YouGov behavior tracker CSV. Unused survey columns are
/// dropped at parse time; every kept field may be absent or empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyRecord {
    #[serde(rename = "RecordNo")]
    pub record_no: Option<String>,
    pub endtime: Option<String>,
    pub region: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    /// i12_health_1: wore a face mask outside the home
    #[serde(rename = "i12_health_1")]
    pub mask_wearing: Option<String>,
    /// i12_health_2: washed hands with soap
    #[serde(rename = "i12_health_2")]
    pub hand_washing: Option<String>,
    /// i12_health_10: avoided crowded areas
    #[serde(rename = "i12_health_10")]
    pub avoiding_crowds: Option<String>,
    #[serde(rename = "PHQ4_1")]
    pub phq4_interest: Option<String>,
    #[serde(rename = "PHQ4_2")]
    pub phq4_depressed: Option<String>,
    #[serde(rename = "PHQ4_3")]
    pub phq4_anxious: Option<String>,
    #[serde(rename = "PHQ4_4")]
    pub phq4_worry: Option<String>,
    pub cantril_ladder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedWeek {
    pub week_start: NaiveDate,
    pub total_respondents: usize,
    pub avg_life_satisfaction: f64,
    /// Mean PHQ-4 sum per respondent, 0-12.
    pub avg_depression_score: f64,
    /// Placeholder the dashboard still renders; always 0.
    pub avg_anxiety_score: f64,
    pub maskwearing_pct: f64,
    pub handwashing_pct: f64,
    pub avoiding_crowds_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub weekly_data: Vec<AggregatedWeek>,
    pub total_records: usize,
    pub age_distribution: BTreeMap<String, u64>,
    pub gender_distribution: BTreeMap<String, u64>,
}

/// Why a record was left out of the weekly buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingTimestamp,
    UnparseableTimestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub missing_timestamp: usize,
    pub unparseable_timestamp: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingTimestamp => self.missing_timestamp += 1,
            SkipReason::UnparseableTimestamp => self.unparseable_timestamp += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_timestamp + self.unparseable_timestamp
    }
}
