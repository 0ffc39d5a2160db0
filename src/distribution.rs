use crate::models::{RankedDeal, ScoredRecord};

/// Orders deals by descending score and attaches the Pareto cumulative share
/// and the percent deviation from the mean score.
///
/// Ties keep their input order. When the scores sum to zero both statistics
/// are defined as 0 for every deal.
pub fn rank_deals(mut scored: Vec<ScoredRecord>) -> Vec<RankedDeal> {
    let total: f64 = scored.iter().map(|record| record.deal_score).sum();
    let average = if scored.is_empty() {
        0.0
    } else {
        total / scored.len() as f64
    };
    let degenerate = total == 0.0;

    log::debug!(
        "score distribution: total={total:.4} average={average:.4} deals={}",
        scored.len()
    );
    if degenerate && !scored.is_empty() {
        log::warn!("every deal scored zero; pareto and deviation reported as 0");
    }

    scored.sort_by(|a, b| b.deal_score.total_cmp(&a.deal_score));
    if let Some(top) = scored.first() {
        log::debug!(
            "top deal {} score={:.4} normalized={:?}",
            top.deal.offer_id,
            top.deal_score,
            top.normalized
        );
    }

    let mut cumulative = 0.0;
    scored
        .into_iter()
        .map(|record| {
            cumulative += record.deal_score;
            let (pareto_pct, pct_from_avg) = if degenerate {
                (0.0, 0.0)
            } else {
                (
                    cumulative / total * 100.0,
                    (record.deal_score - average) / average * 100.0,
                )
            };

            RankedDeal {
                scored: record,
                pareto_pct,
                pct_from_avg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealRecord, NormalizedMetrics};

    fn scored(id: &str, score: f64) -> ScoredRecord {
        ScoredRecord {
            deal: DealRecord {
                offer_id: id.to_string(),
                business_name: "Acme".to_string(),
                assigned_advisor: "Dana".to_string(),
                net_revenue: 0.0,
                vouchers_sold: 0.0,
                sold_per_day: 0.0,
                days_since_last_deal: Some(0),
            },
            normalized: NormalizedMetrics::default(),
            deal_score: score,
        }
    }

    fn ids(ranked: &[RankedDeal]) -> Vec<&str> {
        ranked
            .iter()
            .map(|r| r.scored.deal.offer_id.as_str())
            .collect()
    }

    #[test]
    fn sorts_descending_with_stable_ties() {
        let ranked = rank_deals(vec![
            scored("a", 0.2),
            scored("b", 0.9),
            scored("c", 0.2),
            scored("d", 0.5),
            scored("e", 0.2),
        ]);
        assert_eq!(ids(&ranked), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn pareto_is_monotonic_and_ends_at_hundred() {
        let ranked = rank_deals(vec![
            scored("a", 0.1),
            scored("b", 0.7),
            scored("c", 0.3),
            scored("d", 0.3),
        ]);

        for pair in ranked.windows(2) {
            assert!(pair[0].pareto_pct <= pair[1].pareto_pct);
        }
        let last = ranked.last().unwrap();
        assert!((last.pareto_pct - 100.0).abs() < 1e-9);
        assert!((ranked[0].pareto_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn deviation_from_average_sums_to_zero() {
        let ranked = rank_deals(vec![
            scored("a", 0.1),
            scored("b", 0.7),
            scored("c", 0.4),
        ]);

        let total_deviation: f64 = ranked.iter().map(|r| r.pct_from_avg).sum();
        assert!(total_deviation.abs() < 1e-9);

        let top = &ranked[0];
        assert_eq!(top.scored.deal.offer_id, "b");
        assert!((top.pct_from_avg - 75.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_scores_yield_zero_statistics() {
        let ranked = rank_deals(vec![scored("a", 0.0), scored("b", 0.0)]);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        for deal in &ranked {
            assert_eq!(deal.pareto_pct, 0.0);
            assert_eq!(deal.pct_from_avg, 0.0);
        }
    }

    #[test]
    fn single_deal_is_defined() {
        let ranked = rank_deals(vec![scored("only", 0.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].pareto_pct, 0.0);
        assert_eq!(ranked[0].pct_from_avg, 0.0);
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_deals(Vec::new()).is_empty());
    }
}
