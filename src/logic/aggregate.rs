use chrono::Datelike;
use itertools::Itertools;
use serde::Serialize;

use crate::model::{Aggregate, FundingStep, Grant, GrantStatus, Patent, PatentStatus};

/// Amounts that are not finite or are negative contribute nothing.
fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Budget totals for a step list. Pure; recomputed on every call.
pub fn compute_aggregate(steps: &[FundingStep]) -> Aggregate {
    let total_budget: f64 = steps.iter().map(|s| sanitize(s.planned)).sum();
    let amount_spent: f64 = steps.iter().map(|s| sanitize(s.spent)).sum();

    let percentage = if total_budget > 0.0 {
        // Both operands are non-negative, so `round` is round-half-up here.
        (amount_spent / total_budget * 100.0).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    Aggregate {
        total_budget,
        amount_spent,
        remaining: total_budget - amount_spent,
        percentage,
        over_budget: amount_spent > total_budget,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: PatentStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatentStats {
    pub total: usize,
    pub granted: usize,
    pub under_review: usize,
    pub filed_in_year: usize,
    pub year: i32,
    pub by_status: Vec<StatusCount>,
}

pub fn patent_stats(patents: &[Patent], year: i32) -> PatentStats {
    let counts = patents.iter().counts_by(|p| p.status);
    let count_of = |status: PatentStatus| counts.get(&status).copied().unwrap_or(0);

    PatentStats {
        total: patents.len(),
        granted: count_of(PatentStatus::Granted),
        under_review: patents.iter().filter(|p| p.status.is_under_review()).count(),
        filed_in_year: patents
            .iter()
            .filter(|p| p.filing_date.year() == year)
            .count(),
        year,
        by_status: PatentStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: count_of(status),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrantStats {
    pub total_funding: f64,
    pub active: usize,
    pub completed: usize,
}

pub fn grant_stats(grants: &[Grant]) -> GrantStats {
    GrantStats {
        total_funding: grants.iter().map(|g| sanitize(g.amount)).sum(),
        active: grants
            .iter()
            .filter(|g| g.status == GrantStatus::Active)
            .count(),
        completed: grants
            .iter()
            .filter(|g| g.status == GrantStatus::Completed)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::patent;
    use crate::model::StepStatus;
    use chrono::NaiveDate;

    fn step(planned: f64, spent: f64) -> FundingStep {
        FundingStep::new("Step", StepStatus::InProgress, planned, spent, "")
    }

    #[test]
    fn test_aggregate_totals_and_rounding() {
        let steps = vec![step(50000.0, 45000.0), step(150000.0, 80000.0)];
        let agg = compute_aggregate(&steps);

        assert_eq!(agg.total_budget, 200000.0);
        assert_eq!(agg.amount_spent, 125000.0);
        assert_eq!(agg.remaining, 75000.0);
        assert_eq!(agg.percentage, 63);
        assert!(!agg.over_budget);
    }

    #[test]
    fn test_aggregate_of_empty_list_is_zero() {
        let agg = compute_aggregate(&[]);
        assert_eq!(agg.total_budget, 0.0);
        assert_eq!(agg.amount_spent, 0.0);
        assert_eq!(agg.remaining, 0.0);
        assert_eq!(agg.percentage, 0);
    }

    #[test]
    fn test_over_budget_clamps_percentage_but_keeps_remaining() {
        let agg = compute_aggregate(&[step(1000.0, 1500.0)]);
        assert_eq!(agg.percentage, 100);
        assert_eq!(agg.remaining, -500.0);
        assert!(agg.over_budget);
    }

    #[test]
    fn test_spending_without_budget_reports_zero_percent() {
        let agg = compute_aggregate(&[step(0.0, 300.0)]);
        assert_eq!(agg.percentage, 0);
        assert_eq!(agg.remaining, -300.0);
    }

    #[test]
    fn test_non_finite_amounts_count_as_zero() {
        let agg = compute_aggregate(&[step(f64::NAN, 10.0), step(100.0, f64::INFINITY), step(-5.0, 0.0)]);
        assert_eq!(agg.total_budget, 100.0);
        assert_eq!(agg.amount_spent, 10.0);
        assert_eq!(agg.percentage, 10);
    }

    #[test]
    fn test_patent_stats_counts() {
        let mut filed_2022 = patent("p3", "Old filing", PatentStatus::Filed);
        filed_2022.filing_date = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let patents = vec![
            patent("p1", "A", PatentStatus::Granted),
            patent("p2", "B", PatentStatus::Published),
            filed_2022,
            patent("p4", "D", PatentStatus::UnderExamination),
        ];

        let stats = patent_stats(&patents, 2023);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.granted, 1);
        assert_eq!(stats.under_review, 2);
        assert_eq!(stats.filed_in_year, 3);
        assert_eq!(stats.by_status.len(), 4);
        assert_eq!(
            stats.by_status.iter().map(|c| c.count).sum::<usize>(),
            stats.total
        );
    }
}
