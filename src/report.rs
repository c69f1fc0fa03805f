use std::fmt::Write;

use crate::models::{AggregatedWeek, DashboardData, SkipCounts};

#[derive(Debug, Clone)]
pub struct SurveySummary {
    pub respondents: usize,
    pub avg_mask_pct: f64,
    pub avg_depression: f64,
    pub avg_life_satisfaction: f64,
}

/// Respondent-weighted figures across the whole aggregated range, the same
/// numbers the dashboard shows on its summary cards.
pub fn summarize(weeks: &[AggregatedWeek]) -> Option<SurveySummary> {
    let respondents: usize = weeks.iter().map(|week| week.total_respondents).sum();
    if respondents == 0 {
        return None;
    }

    let total = respondents as f64;
    let weighted = |value: fn(&AggregatedWeek) -> f64| {
        weeks
            .iter()
            .map(|week| value(week) * week.total_respondents as f64)
            .sum::<f64>()
            / total
    };

    Some(SurveySummary {
        respondents,
        avg_mask_pct: weighted(|week| week.maskwearing_pct),
        avg_depression: weighted(|week| week.avg_depression_score),
        avg_life_satisfaction: weighted(|week| week.avg_life_satisfaction),
    })
}

pub fn build_report(data: &DashboardData, skips: &SkipCounts, source: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# COVID-19 Behavior Survey Report");
    let _ = writeln!(
        output,
        "Generated from {} ({} rows)",
        source, data.total_records
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    match summarize(&data.weekly_data) {
        Some(summary) => {
            let _ = writeln!(
                output,
                "- Respondents in weekly buckets: {}",
                summary.respondents
            );
            let _ = writeln!(
                output,
                "- Mask wearing (weighted): {:.1}%",
                summary.avg_mask_pct
            );
            let _ = writeln!(
                output,
                "- Depression score, PHQ-4 (weighted): {:.2}",
                summary.avg_depression
            );
            let _ = writeln!(
                output,
                "- Life satisfaction (weighted): {:.2}",
                summary.avg_life_satisfaction
            );
        }
        None => {
            let _ = writeln!(output, "No survey weeks recorded for this source.");
        }
    }

    if skips.total() > 0 {
        let _ = writeln!(
            output,
            "- Rows without a usable timestamp: {} ({} missing, {} unparseable)",
            skips.total(),
            skips.missing_timestamp,
            skips.unparseable_timestamp
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Trends");

    if data.weekly_data.is_empty() {
        let _ = writeln!(output, "No weekly data available.");
    } else {
        for week in data.weekly_data.iter() {
            let _ = writeln!(
                output,
                "- {}: {} respondents, mask {:.1}%, hands {:.1}%, crowds {:.1}%, depression {:.2}, life satisfaction {:.2}",
                week.week_start,
                week.total_respondents,
                week.maskwearing_pct,
                week.handwashing_pct,
                week.avoiding_crowds_pct,
                week.avg_depression_score,
                week.avg_life_satisfaction
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Age Groups");

    if data.age_distribution.is_empty() {
        let _ = writeln!(output, "No age data recorded.");
    } else {
        for (group, count) in data.age_distribution.iter() {
            let _ = writeln!(output, "- {}: {}", group, count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Gender");

    if data.gender_distribution.is_empty() {
        let _ = writeln!(output, "No gender data recorded.");
    } else {
        for (label, count) in data.gender_distribution.iter() {
            let _ = writeln!(output, "- {}: {}", label, count);
        }
    }

    output
}
