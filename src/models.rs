use chrono::NaiveDateTime;
use serde::Serialize;

/// One input row after cell conversion, before per-business staleness is known.
#[derive(Debug, Clone)]
pub struct DealRow {
    pub offer_id: String,
    pub deal_date: Option<NaiveDateTime>,
    pub business_name: String,
    pub assigned_advisor: String,
    pub net_revenue: f64,
    pub vouchers_sold: f64,
    pub sold_per_day: f64,
}

#[derive(Debug, Clone)]
pub struct DealRecord {
    pub offer_id: String,
    pub business_name: String,
    pub assigned_advisor: String,
    pub net_revenue: f64,
    pub vouchers_sold: f64,
    pub sold_per_day: f64,
    /// `None` when the business has no parseable deal date.
    pub days_since_last_deal: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessAggregate {
    pub revenue_sum: f64,
    pub revenue_count: usize,
    pub vouchers_sum: f64,
    pub vouchers_count: usize,
    pub max_deal_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedMetrics {
    pub vouchers_sold: f64,
    pub sold_per_day: f64,
    pub net_revenue: f64,
}

#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub deal: DealRecord,
    pub normalized: NormalizedMetrics,
    pub deal_score: f64,
}

#[derive(Debug, Clone)]
pub struct RankedDeal {
    pub scored: ScoredRecord,
    pub pareto_pct: f64,
    pub pct_from_avg: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Offer ID")]
    pub offer_id: String,
    #[serde(rename = "Business Name")]
    pub business_name: String,
    #[serde(rename = "Assigned Advisor")]
    pub assigned_advisor: String,
    #[serde(rename = "Deal Score")]
    pub deal_score: String,
    #[serde(rename = "Días desde ultima oferta")]
    pub days_since_last_deal: String,
    #[serde(rename = "% Difference from Avg")]
    pub pct_from_avg: String,
    #[serde(rename = "Pareto")]
    pub pareto: String,
    #[serde(rename = "Forecast: Net Revenue")]
    pub forecast_net_revenue: String,
    #[serde(rename = "Forecast: Vouchers Sold")]
    pub forecast_vouchers_sold: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub rows: usize,
    pub non_numeric_rows: usize,
    pub invalid_date_rows: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        self.non_numeric_rows == 0 && self.invalid_date_rows == 0
    }
}
