use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::{BusinessAggregate, DealRecord, DealRow};

const MILLIS_PER_DAY: f64 = 1000.0 * 3600.0 * 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMetric {
    NetRevenue,
    VouchersSold,
}

/// Per-business statistics, built once from the full input and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BusinessAggregates {
    by_business: HashMap<String, BusinessAggregate>,
}

impl BusinessAggregates {
    pub fn build(rows: &[DealRow]) -> Self {
        let mut by_business: HashMap<String, BusinessAggregate> = HashMap::new();

        for row in rows {
            let entry = by_business.entry(row.business_name.clone()).or_default();

            if let Some(deal_date) = row.deal_date {
                if entry.max_deal_date.map_or(true, |current| deal_date > current) {
                    entry.max_deal_date = Some(deal_date);
                }
            }

            entry.revenue_sum += row.net_revenue;
            entry.revenue_count += 1;
            entry.vouchers_sum += row.vouchers_sold;
            entry.vouchers_count += 1;
        }

        log::info!(
            "aggregated {} rows across {} businesses",
            rows.len(),
            by_business.len()
        );

        Self { by_business }
    }

    pub fn len(&self) -> usize {
        self.by_business.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_business.is_empty()
    }

    pub fn get(&self, business_name: &str) -> Option<&BusinessAggregate> {
        self.by_business.get(business_name)
    }

    pub fn max_date(&self, business_name: &str) -> Option<NaiveDateTime> {
        self.get(business_name).and_then(|agg| agg.max_deal_date)
    }

    /// Historical mean of `metric` for the business; `None` for unknown businesses.
    pub fn forecast(&self, business_name: &str, metric: ForecastMetric) -> Option<f64> {
        let agg = self.get(business_name)?;
        let (sum, count) = match metric {
            ForecastMetric::NetRevenue => (agg.revenue_sum, agg.revenue_count),
            ForecastMetric::VouchersSold => (agg.vouchers_sum, agg.vouchers_count),
        };

        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    pub fn days_since_last_deal(&self, business_name: &str, now: NaiveDateTime) -> Option<i64> {
        self.max_date(business_name)
            .map(|last_deal| days_between(last_deal, now))
    }

    /// Folds each business's staleness into its rows.
    pub fn annotate(&self, rows: Vec<DealRow>, now: NaiveDateTime) -> Vec<DealRecord> {
        rows.into_iter()
            .map(|row| {
                let days_since_last_deal = self.days_since_last_deal(&row.business_name, now);
                DealRecord {
                    offer_id: row.offer_id,
                    business_name: row.business_name,
                    assigned_advisor: row.assigned_advisor,
                    net_revenue: row.net_revenue,
                    vouchers_sold: row.vouchers_sold,
                    sold_per_day: row.sold_per_day,
                    days_since_last_deal,
                }
            })
            .collect()
    }
}

/// Whole days from `earlier` to `now`, rounded up.
pub fn days_between(earlier: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let millis = (now - earlier).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn row(business: &str, date: Option<NaiveDateTime>, revenue: f64, vouchers: f64) -> DealRow {
        DealRow {
            offer_id: format!("{business}-{revenue}"),
            deal_date: date,
            business_name: business.to_string(),
            assigned_advisor: "Dana".to_string(),
            net_revenue: revenue,
            vouchers_sold: vouchers,
            sold_per_day: 1.0,
        }
    }

    #[test]
    fn forecast_is_mean_of_business_rows() {
        let rows = vec![
            row("Acme", Some(at(2026, 1, 1)), 100.0, 10.0),
            row("Acme", Some(at(2026, 2, 1)), 200.0, 20.0),
            row("Acme", Some(at(2026, 3, 1)), 300.0, 60.0),
            row("Bolt", Some(at(2026, 3, 1)), 50.0, 5.0),
        ];
        let aggregates = BusinessAggregates::build(&rows);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(
            aggregates.forecast("Acme", ForecastMetric::NetRevenue),
            Some(200.0)
        );
        assert_eq!(
            aggregates.forecast("Acme", ForecastMetric::VouchersSold),
            Some(30.0)
        );
        assert_eq!(
            aggregates.forecast("Bolt", ForecastMetric::NetRevenue),
            Some(50.0)
        );
        assert_eq!(aggregates.forecast("Nope", ForecastMetric::NetRevenue), None);
    }

    #[test]
    fn max_date_is_latest_regardless_of_row_order() {
        let rows = vec![
            row("Acme", Some(at(2026, 2, 1)), 1.0, 1.0),
            row("Acme", Some(at(2026, 3, 5)), 1.0, 1.0),
            row("Acme", None, 1.0, 1.0),
            row("Acme", Some(at(2026, 1, 9)), 1.0, 1.0),
        ];
        let aggregates = BusinessAggregates::build(&rows);
        assert_eq!(aggregates.max_date("Acme"), Some(at(2026, 3, 5)));
    }

    #[test]
    fn staleness_uses_business_max_date_for_every_row() {
        let rows = vec![
            row("Acme", Some(at(2026, 1, 1)), 100.0, 1.0),
            row("Acme", Some(at(2026, 3, 1)), 200.0, 1.0),
            row("Bolt", None, 5.0, 1.0),
        ];
        let aggregates = BusinessAggregates::build(&rows);
        let records = aggregates.annotate(rows, at(2026, 3, 1));

        assert_eq!(records[0].days_since_last_deal, Some(0));
        assert_eq!(records[1].days_since_last_deal, Some(0));
        assert_eq!(records[2].days_since_last_deal, None);
    }

    #[test]
    fn partial_days_round_up() {
        let last = at(2026, 1, 1);
        assert_eq!(days_between(last, last), 0);
        assert_eq!(days_between(last, last + Duration::hours(1)), 1);
        assert_eq!(days_between(last, last + Duration::days(61)), 61);
        assert_eq!(days_between(last, last - Duration::hours(36)), -1);
    }

    #[test]
    fn nan_revenue_contaminates_forecast() {
        let rows = vec![
            row("Acme", Some(at(2026, 1, 1)), 100.0, 1.0),
            row("Acme", Some(at(2026, 1, 2)), f64::NAN, 1.0),
        ];
        let aggregates = BusinessAggregates::build(&rows);
        let forecast = aggregates
            .forecast("Acme", ForecastMetric::NetRevenue)
            .unwrap();
        assert!(forecast.is_nan());
        assert_eq!(
            aggregates.forecast("Acme", ForecastMetric::VouchersSold),
            Some(1.0)
        );
    }
}
