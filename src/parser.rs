use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{DataQuality, DealRow};

const COL_OFFER_ID: usize = 0;
const COL_DEAL_DATE: usize = 2;
const COL_BUSINESS_NAME: usize = 3;
const COL_ADVISOR: usize = 4;
const COL_NET_REVENUE: usize = 5;
const COL_VOUCHERS_SOLD: usize = 6;
const COL_SOLD_PER_DAY: usize = 7;

const OFFSET_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S %z",
    "%Y/%m/%d %H:%M:%S %z",
];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

pub fn read_rows(csv_path: &Path) -> PipelineResult<Vec<DealRow>> {
    if !csv_path.exists() {
        return Err(PipelineError::InputMissing {
            path: csv_path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(csv_path)?;
    read_rows_from(file).map_err(|source| PipelineError::InputFormat {
        path: csv_path.to_path_buf(),
        source,
    })
}

/// Reads every data row; the first record is treated as the header and skipped.
pub fn read_rows_from<R: Read>(input: R) -> Result<Vec<DealRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(parse_row(&record));
    }

    log::info!("parsed {} deal rows", rows.len());
    Ok(rows)
}

pub fn parse_row(record: &StringRecord) -> DealRow {
    let cell = |index: usize| record.get(index).unwrap_or("");

    DealRow {
        offer_id: cell(COL_OFFER_ID).to_string(),
        deal_date: parse_date(cell(COL_DEAL_DATE)),
        business_name: cell(COL_BUSINESS_NAME).to_string(),
        assigned_advisor: cell(COL_ADVISOR).to_string(),
        net_revenue: parse_number(cell(COL_NET_REVENUE)),
        vouchers_sold: parse_number(cell(COL_VOUCHERS_SOLD)),
        sold_per_day: parse_number(cell(COL_SOLD_PER_DAY)),
    }
}

/// Strips thousands separators; anything that still isn't a number becomes NaN.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().unwrap_or(f64::NAN)
}

pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.with_timezone(&Local).naive_local());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn assess_quality(rows: &[DealRow]) -> DataQuality {
    let mut quality = DataQuality {
        rows: rows.len(),
        ..DataQuality::default()
    };

    for row in rows {
        if row.net_revenue.is_nan() || row.vouchers_sold.is_nan() || row.sold_per_day.is_nan() {
            quality.non_numeric_rows += 1;
        }
        if row.deal_date.is_none() {
            quality.invalid_date_rows += 1;
        }
    }

    if !quality.is_clean() {
        log::warn!(
            "{} of {} rows have non-numeric metrics, {} have unparseable deal dates",
            quality.non_numeric_rows,
            quality.rows,
            quality.invalid_date_rows
        );
    }

    quality
}
