use crate::models::{DealRecord, NormalizedMetrics, ScoredRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoredColumn {
    VouchersSold,
    SoldPerDay,
    NetRevenue,
}

impl ScoredColumn {
    pub const ALL: [ScoredColumn; 3] = [
        ScoredColumn::VouchersSold,
        ScoredColumn::SoldPerDay,
        ScoredColumn::NetRevenue,
    ];

    pub fn weight(self) -> f64 {
        match self {
            ScoredColumn::VouchersSold => 0.4,
            ScoredColumn::SoldPerDay => 0.3,
            ScoredColumn::NetRevenue => 0.3,
        }
    }

    fn value(self, deal: &DealRecord) -> f64 {
        match self {
            ScoredColumn::VouchersSold => deal.vouchers_sold,
            ScoredColumn::SoldPerDay => deal.sold_per_day,
            ScoredColumn::NetRevenue => deal.net_revenue,
        }
    }

    fn slot(self, metrics: &mut NormalizedMetrics) -> &mut f64 {
        match self {
            ScoredColumn::VouchersSold => &mut metrics.vouchers_sold,
            ScoredColumn::SoldPerDay => &mut metrics.sold_per_day,
            ScoredColumn::NetRevenue => &mut metrics.net_revenue,
        }
    }
}

/// Min-max normalizes each scored column over the whole batch and derives the
/// weighted Deal Score. Scores are only meaningful relative to this batch.
pub fn score_deals(deals: Vec<DealRecord>) -> Vec<ScoredRecord> {
    let mut normalized = vec![NormalizedMetrics::default(); deals.len()];

    for column in ScoredColumn::ALL {
        let values: Vec<f64> = deals.iter().map(|deal| column.value(deal)).collect();
        let scaled = normalize(&values);
        for (metrics, value) in normalized.iter_mut().zip(scaled) {
            *column.slot(metrics) = value;
        }
    }

    deals
        .into_iter()
        .zip(normalized)
        .map(|(deal, normalized)| ScoredRecord {
            deal_score: composite_score(&normalized),
            deal,
            normalized,
        })
        .collect()
}

pub fn composite_score(metrics: &NormalizedMetrics) -> f64 {
    ScoredColumn::VouchersSold.weight() * metrics.vouchers_sold
        + ScoredColumn::SoldPerDay.weight() * metrics.sold_per_day
        + ScoredColumn::NetRevenue.weight() * metrics.net_revenue
}

/// Scales values into [0, 1]. A column with no spread maps to all zeros; a NaN
/// anywhere poisons the bounds and therefore the whole column.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = bounds(values) else {
        return Vec::new();
    };
    log::debug!("normalizing column: min={min} max={max}");

    if min == max {
        return vec![0.0; values.len()];
    }

    let range = max - min;
    values.iter().map(|value| (value - min) / range).collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let (first, rest) = values.split_first()?;
    let mut min = *first;
    let mut max = *first;

    for &value in rest {
        if value.is_nan() || min.is_nan() {
            min = f64::NAN;
            max = f64::NAN;
            continue;
        }
        min = min.min(value);
        max = max.max(value);
    }

    Some((min, max))
}
