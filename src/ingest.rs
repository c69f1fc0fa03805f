use std::fmt;
use std::time::Duration;

use crate::models::SurveyRecord;

/// YouGov COVID-19 behavior tracker, Vietnam extract.
pub const CSV_URL: &str =
    "https://raw.githubusercontent.com/YouGov-Data/covid-19-tracker/master/data/vietnam.csv";

/// Errors raised while retrieving the survey CSV. Fetches are not retried;
/// the caller decides what a failed run looks like.
#[derive(Debug)]
pub enum FetchError {
    /// Non-2xx response from the CSV host.
    Http(u16),
    /// The request itself failed (DNS, TLS, timeout).
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(status) => write!(f, "CSV host returned HTTP {}", status),
            FetchError::Transport(msg) => write!(f, "CSV request failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
}

/// Downloads the survey CSV as text from `url`.
pub async fn fetch_csv(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Http(response.status().as_u16()));
    }

    Ok(response.text().await?)
}

/// Parses header-mapped survey rows. Columns outside the tracked set are
/// ignored, blank lines are skipped, and rows the CSV dialect rejects are
/// dropped here without reaching the record total.
pub fn parse_records(csv_text: &str) -> Vec<SurveyRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    reader
        .deserialize::<SurveyRecord>()
        .filter_map(|row| row.ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rows_by_header_name() {
        let csv_text = "RecordNo,endtime,region,age,gender,i12_health_1,cantril_ladder\n\
                        42,01/02/2024 10:00,Hanoi,23,Female,Always,8\n";

        let records = parse_records(csv_text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.record_no.as_deref(), Some("42"));
        assert_eq!(record.endtime.as_deref(), Some("01/02/2024 10:00"));
        assert_eq!(record.age.as_deref(), Some("23"));
        assert_eq!(record.mask_wearing.as_deref(), Some("Always"));
        assert_eq!(record.cantril_ladder.as_deref(), Some("8"));
        assert_eq!(record.hand_washing, None);
    }

    #[test]
    fn header_only_input_yields_no_records() {
        let records = parse_records("RecordNo,endtime,age,gender\n");
        assert!(records.is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let csv_text = "RecordNo,age\n1,30\n\n2,40\n";
        let records = parse_records(csv_text);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_fields_become_none() {
        let csv_text = "RecordNo,endtime,age\n1,,17\n";
        let records = parse_records(csv_text);
        assert_eq!(records[0].endtime, None);
        assert_eq!(records[0].age.as_deref(), Some("17"));
    }

    #[test]
    fn untracked_columns_are_ignored() {
        let csv_text = "RecordNo,qweek,i12_health_5,age\n1,week 12,Rarely,55\n";
        let records = parse_records(csv_text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age.as_deref(), Some("55"));
    }

    #[test]
    fn fetch_error_reports_status() {
        let err = FetchError::Http(503);
        assert_eq!(err.to_string(), "CSV host returned HTTP 503");
    }
}
