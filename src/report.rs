use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::aggregate::{BusinessAggregates, ForecastMetric};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{RankedDeal, ReportRow};

/// Deals whose business has gone quiet for longer than this land in the filtered report.
pub const STALE_AFTER_DAYS: i64 = 60;

pub const ALL_DATA_FILE: &str = "all_data_output.csv";
pub const FILTERED_DATA_FILE: &str = "filtered_data_output.csv";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reports {
    pub all: Vec<ReportRow>,
    pub filtered: Vec<ReportRow>,
}

pub fn build_reports(ranked: &[RankedDeal], aggregates: &BusinessAggregates) -> Reports {
    let all: Vec<ReportRow> = ranked
        .iter()
        .enumerate()
        .map(|(index, deal)| report_row(index + 1, deal, aggregates))
        .collect();

    let filtered: Vec<ReportRow> = ranked
        .iter()
        .filter(|deal| is_stale(deal))
        .enumerate()
        .map(|(index, deal)| report_row(index + 1, deal, aggregates))
        .collect();

    log::info!(
        "built reports: {} ranked deals, {} stale beyond {STALE_AFTER_DAYS} days",
        all.len(),
        filtered.len()
    );

    Reports { all, filtered }
}

fn is_stale(deal: &RankedDeal) -> bool {
    deal.scored
        .deal
        .days_since_last_deal
        .is_some_and(|days| days > STALE_AFTER_DAYS)
}

fn report_row(rank: usize, ranked: &RankedDeal, aggregates: &BusinessAggregates) -> ReportRow {
    let deal = &ranked.scored.deal;
    let forecast = |metric| {
        aggregates
            .forecast(&deal.business_name, metric)
            .unwrap_or(f64::NAN)
    };

    ReportRow {
        rank,
        offer_id: deal.offer_id.clone(),
        business_name: deal.business_name.clone(),
        assigned_advisor: deal.assigned_advisor.clone(),
        deal_score: two_decimals(ranked.scored.deal_score),
        days_since_last_deal: deal
            .days_since_last_deal
            .map_or_else(|| "NaN".to_string(), |days| days.to_string()),
        pct_from_avg: two_decimals(ranked.pct_from_avg),
        pareto: two_decimals(ranked.pareto_pct),
        forecast_net_revenue: two_decimals(forecast(ForecastMetric::NetRevenue)),
        forecast_vouchers_sold: two_decimals(forecast(ForecastMetric::VouchersSold)),
    }
}

fn two_decimals(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    format!("{value:.2}")
}

/// Encodes rows as CSV in memory; the header is present even with no rows.
pub fn encode_report(rows: &[ReportRow]) -> PipelineResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(header())?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| PipelineError::Io(err.into_error()))
}

/// Writes both reports into `out_dir`, returning the paths written. Both are
/// encoded before any file is touched, and a failed write removes the files
/// already written by this call.
pub fn write_reports(out_dir: &Path, reports: &Reports) -> PipelineResult<Vec<PathBuf>> {
    let outputs = [
        (out_dir.join(ALL_DATA_FILE), encode_report(&reports.all)?, reports.all.len()),
        (
            out_dir.join(FILTERED_DATA_FILE),
            encode_report(&reports.filtered)?,
            reports.filtered.len(),
        ),
    ];

    std::fs::create_dir_all(out_dir)?;

    let mut written: Vec<PathBuf> = Vec::new();
    for (path, encoded, row_count) in outputs {
        if let Err(source) = std::fs::write(&path, encoded) {
            for partial in &written {
                if let Err(err) = std::fs::remove_file(partial) {
                    log::warn!("could not remove partial report {}: {err}", partial.display());
                }
            }
            return Err(PipelineError::OutputWrite { path, source });
        }
        log::info!("wrote {row_count} rows to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

pub fn header() -> [&'static str; 10] {
    [
        "Rank",
        "Offer ID",
        "Business Name",
        "Assigned Advisor",
        "Deal Score",
        "Días desde ultima oferta",
        "% Difference from Avg",
        "Pareto",
        "Forecast: Net Revenue",
        "Forecast: Vouchers Sold",
    ]
}

pub fn render_top(rows: &[ReportRow], limit: usize) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        let _ = writeln!(output, "No deals found in this file.");
        return output;
    }

    let _ = writeln!(output, "Top deals by Deal Score:");
    for row in rows.iter().take(limit) {
        let _ = writeln!(
            output,
            "{}. {} ({}, {}) score {} | {} days since last deal | {}% vs avg | pareto {}% | forecast revenue {} vouchers {}",
            row.rank,
            row.offer_id,
            row.business_name,
            row.assigned_advisor,
            row.deal_score,
            row.days_since_last_deal,
            row.pct_from_avg,
            row.pareto,
            row.forecast_net_revenue,
            row.forecast_vouchers_sold
        );
    }

    output
}
