use chrono::NaiveDateTime;

use crate::aggregate::BusinessAggregates;
use crate::distribution;
use crate::models::{DataQuality, DealRow};
use crate::parser;
use crate::report::{self, Reports};
use crate::scoring;

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub reports: Reports,
    pub quality: DataQuality,
    pub business_count: usize,
}

/// Runs aggregation, scoring, ranking and report building over one fully
/// loaded batch. `now` is the reference time for days-since-last-deal.
pub fn run(rows: Vec<DealRow>, now: NaiveDateTime) -> PipelineOutput {
    let quality = parser::assess_quality(&rows);
    let aggregates = BusinessAggregates::build(&rows);
    if aggregates.is_empty() {
        log::warn!("input has no deal rows; reports will only contain headers");
    }
    let deals = aggregates.annotate(rows, now);
    let scored = scoring::score_deals(deals);
    let ranked = distribution::rank_deals(scored);
    let reports = report::build_reports(&ranked, &aggregates);

    PipelineOutput {
        reports,
        quality,
        business_count: aggregates.len(),
    }
}
