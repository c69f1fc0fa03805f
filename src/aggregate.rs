use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use crate::models::{AggregatedWeek, DashboardData, SkipCounts, SkipReason, SurveyRecord};

const ENDTIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// PHQ-4 answer vocabulary. Anything outside the four known labels lands on
/// `Unknown`, which scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalAnswer {
    NotAtAll,
    SeveralDays,
    MoreThanHalfDays,
    NearlyEveryDay,
    Unknown,
}

impl OrdinalAnswer {
    /// Survey exports vary slightly in phrasing, so labels are matched on
    /// their distinctive fragment rather than full equality.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return OrdinalAnswer::Unknown;
        };

        if label.contains("Not at all") {
            OrdinalAnswer::NotAtAll
        } else if label.contains("Several days") {
            OrdinalAnswer::SeveralDays
        } else if label.contains("More than half") {
            OrdinalAnswer::MoreThanHalfDays
        } else if label.contains("Nearly every day") {
            OrdinalAnswer::NearlyEveryDay
        } else {
            OrdinalAnswer::Unknown
        }
    }

    pub fn score(self) -> u32 {
        match self {
            OrdinalAnswer::NotAtAll => 0,
            OrdinalAnswer::SeveralDays => 1,
            OrdinalAnswer::MoreThanHalfDays => 2,
            OrdinalAnswer::NearlyEveryDay => 3,
            OrdinalAnswer::Unknown => 0,
        }
    }
}

/// Sum of the four PHQ-4 items, 0-12 per respondent.
fn phq4_sum(record: &SurveyRecord) -> u32 {
    [
        record.phq4_interest.as_deref(),
        record.phq4_depressed.as_deref(),
        record.phq4_anxious.as_deref(),
        record.phq4_worry.as_deref(),
    ]
    .into_iter()
    .map(|answer| OrdinalAnswer::from_label(answer).score())
    .sum()
}

/// "Always" and "Frequently" count as compliant; matching is exact.
pub fn is_compliant(answer: Option<&str>) -> bool {
    matches!(answer, Some("Always") | Some("Frequently"))
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

pub fn parse_endtime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, ENDTIME_FORMAT).ok()
}

/// Resolves the weekly bucket for a record, or the reason it has none.
pub fn week_key(record: &SurveyRecord) -> Result<NaiveDate, SkipReason> {
    let raw = record
        .endtime
        .as_deref()
        .ok_or(SkipReason::MissingTimestamp)?;
    let endtime = parse_endtime(raw).ok_or(SkipReason::UnparseableTimestamp)?;
    Ok(week_start(endtime.date()))
}

/// Age group labels for the demographic tally; "18-24" covers everything
/// below 25.
pub fn age_bucket(raw: &str) -> &'static str {
    match raw.trim().parse::<i64>() {
        Ok(age) if age < 25 => "18-24",
        Ok(age) if age < 35 => "25-34",
        Ok(age) if age < 45 => "35-44",
        Ok(age) if age < 55 => "45-54",
        Ok(_) => "55+",
        Err(_) => "Unknown",
    }
}

/// Runs the aggregation pipeline over parsed records: one pass to bucket by
/// week and tally demographics, then per-bucket aggregation. Weeks come out
/// ascending by start date.
pub fn build_dashboard(records: &[SurveyRecord]) -> (DashboardData, SkipCounts) {
    let mut weeks: BTreeMap<NaiveDate, Vec<&SurveyRecord>> = BTreeMap::new();
    let mut age_distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut gender_distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut skips = SkipCounts::default();

    for record in records {
        // Demographics do not depend on a usable timestamp.
        if let Some(age) = record.age.as_deref() {
            *age_distribution
                .entry(age_bucket(age).to_string())
                .or_insert(0) += 1;
        }
        if let Some(gender) = record.gender.as_deref() {
            *gender_distribution.entry(gender.to_string()).or_insert(0) += 1;
        }

        match week_key(record) {
            Ok(week) => weeks.entry(week).or_default().push(record),
            Err(reason) => skips.record(reason),
        }
    }

    let weekly_data = weeks
        .iter()
        .map(|(start, bucket)| aggregate_week(*start, bucket))
        .collect();

    let data = DashboardData {
        weekly_data,
        total_records: records.len(),
        age_distribution,
        gender_distribution,
    };

    (data, skips)
}

fn aggregate_week(week_start: NaiveDate, bucket: &[&SurveyRecord]) -> AggregatedWeek {
    // Never zero: a bucket exists only once a record lands in it.
    let n = bucket.len() as f64;

    let life_sum: f64 = bucket
        .iter()
        .map(|record| {
            record
                .cantril_ladder
                .as_deref()
                .and_then(|value| value.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        })
        .sum();

    let depression_sum: u32 = bucket.iter().map(|record| phq4_sum(record)).sum();

    let mask_count = bucket
        .iter()
        .filter(|record| is_compliant(record.mask_wearing.as_deref()))
        .count();
    let hand_count = bucket
        .iter()
        .filter(|record| is_compliant(record.hand_washing.as_deref()))
        .count();
    let crowd_count = bucket
        .iter()
        .filter(|record| is_compliant(record.avoiding_crowds.as_deref()))
        .count();

    AggregatedWeek {
        week_start,
        total_respondents: bucket.len(),
        avg_life_satisfaction: life_sum / n,
        avg_depression_score: f64::from(depression_sum) / n,
        avg_anxiety_score: 0.0,
        maskwearing_pct: mask_count as f64 / n * 100.0,
        handwashing_pct: hand_count as f64 / n * 100.0,
        avoiding_crowds_pct: crowd_count as f64 / n * 100.0,
    }
}
