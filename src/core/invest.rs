//! Investment allocation business logic.
//!
//! Splits an amount of available funds across a fixed waterfall of instruments. Each step
//! draws from whatever the earlier steps left behind, so the allocations can never add up
//! to more than the funds supplied. Everything here is pure and synchronous.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this amount no plan is produced at all.
pub const MIN_INVESTABLE_FUNDS: f64 = 5_000.0;

const EMERGENCY_FUND_SHARE: f64 = 0.3;
const EMERGENCY_FUND_MONTHS: f64 = 3.0;
const EMERGENCY_FUND_MIN_EMIT: f64 = 5_000.0;

const SIP_MIN_REMAINING: f64 = 5_000.0;
const SIP_SHARE: f64 = 0.4;
const SIP_CAP: f64 = 25_000.0;

const STOCKS_MIN_REMAINING: f64 = 10_000.0;
const STOCKS_SHARE: f64 = 0.5;
const STOCKS_CAP: f64 = 50_000.0;

const FIXED_DEPOSIT_MIN_REMAINING: f64 = 1_000.0;

/// Tunable inputs to the allocation waterfall.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Typical monthly spend; the emergency fund is capped at three months of it
    pub monthly_expense_estimate: f64,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            monthly_expense_estimate: 25_000.0,
        }
    }
}

/// Risk label attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    MediumHigh,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::MediumHigh => "Medium-High",
        })
    }
}

/// How urgently a recommendation should be acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// A single line of an investment plan. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentRecommendation {
    /// Display name of the step (e.g., "Emergency Fund")
    pub name: &'static str,
    /// Amount allocated to this step
    pub amount: f64,
    /// Allocation as a whole-number percentage of the original funds
    pub percentage: u32,
    /// Risk label
    pub risk: RiskLevel,
    /// Expected annual return range (e.g., "10-14%")
    pub expected_return: &'static str,
    /// Kind of instrument to use
    pub instrument: &'static str,
    /// Priority label
    pub priority: Priority,
}

/// Generates a plan using the default [`AllocationPolicy`].
#[must_use]
pub fn generate_investment_recommendations(available_funds: f64) -> Vec<InvestmentRecommendation> {
    generate_investment_recommendations_with(available_funds, &AllocationPolicy::default())
}

/// Runs the allocation waterfall over `available_funds`.
///
/// Steps, in order:
/// 1. Emergency Fund: `min(remaining * 0.3, monthly estimate * 3)`, kept only if at least 5,000
/// 2. SIP: `min(remaining * 0.4, 25,000)` when at least 5,000 remains
/// 3. Blue-chip stocks: `min(remaining * 0.5, 50,000)` when at least 10,000 remains
/// 4. Fixed deposit: everything left when at least 1,000 remains
///
/// Returns an empty plan when the funds are not finite or below [`MIN_INVESTABLE_FUNDS`].
#[must_use]
pub fn generate_investment_recommendations_with(
    available_funds: f64,
    policy: &AllocationPolicy,
) -> Vec<InvestmentRecommendation> {
    if !available_funds.is_finite() || available_funds < MIN_INVESTABLE_FUNDS {
        return Vec::new();
    }

    let mut plan = Vec::with_capacity(4);
    let mut remaining = available_funds;

    let emergency = (remaining * EMERGENCY_FUND_SHARE)
        .min(policy.monthly_expense_estimate.max(0.0) * EMERGENCY_FUND_MONTHS);
    if emergency >= EMERGENCY_FUND_MIN_EMIT {
        remaining -= emergency;
        plan.push(recommendation(
            "Emergency Fund",
            emergency,
            available_funds,
            RiskLevel::VeryLow,
            "4-6%",
            "Liquid Fund / Savings Account",
            Priority::High,
        ));
    }

    if remaining >= SIP_MIN_REMAINING {
        let sip = (remaining * SIP_SHARE).min(SIP_CAP);
        remaining -= sip;
        plan.push(recommendation(
            "SIP Investment",
            sip,
            available_funds,
            RiskLevel::Medium,
            "10-14%",
            "Mutual Fund SIP",
            Priority::Medium,
        ));
    }

    if remaining >= STOCKS_MIN_REMAINING {
        let stocks = (remaining * STOCKS_SHARE).min(STOCKS_CAP);
        remaining -= stocks;
        plan.push(recommendation(
            "Blue-chip Stocks",
            stocks,
            available_funds,
            RiskLevel::MediumHigh,
            "12-18%",
            "Direct Equity",
            Priority::Medium,
        ));
    }

    if remaining >= FIXED_DEPOSIT_MIN_REMAINING {
        plan.push(recommendation(
            "Fixed Deposit",
            remaining,
            available_funds,
            RiskLevel::Low,
            "5-7%",
            "Bank FD",
            Priority::Low,
        ));
    }

    plan
}

/// Sum of all allocations in a plan
#[must_use]
pub fn total_allocated(plan: &[InvestmentRecommendation]) -> f64 {
    plan.iter().map(|r| r.amount).sum()
}

#[allow(clippy::too_many_arguments)]
fn recommendation(
    name: &'static str,
    amount: f64,
    available_funds: f64,
    risk: RiskLevel,
    expected_return: &'static str,
    instrument: &'static str,
    priority: Priority,
) -> InvestmentRecommendation {
    // Allocations never exceed the funds, so the ratio is within 0..=100
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percentage = (amount / available_funds * 100.0).round() as u32;

    InvestmentRecommendation {
        name,
        amount,
        percentage,
        risk,
        expected_return,
        instrument,
        priority,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_no_funds_yields_empty_plan() {
        assert!(generate_investment_recommendations(0.0).is_empty());
        assert!(generate_investment_recommendations(-500.0).is_empty());
        assert!(generate_investment_recommendations(f64::NAN).is_empty());
        assert!(generate_investment_recommendations(f64::INFINITY).is_empty());
    }

    #[test]
    fn test_small_funds_yield_empty_plan() {
        assert!(generate_investment_recommendations(3000.0).is_empty());
        assert!(generate_investment_recommendations(4999.99).is_empty());
    }

    #[test]
    fn test_hundred_thousand_waterfall() {
        let plan = generate_investment_recommendations(100_000.0);

        let names: Vec<&str> = plan.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["Emergency Fund", "SIP Investment", "Blue-chip Stocks", "Fixed Deposit"]
        );

        let amounts: Vec<f64> = plan.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, [30_000.0, 25_000.0, 22_500.0, 22_500.0]);

        let percentages: Vec<u32> = plan.iter().map(|r| r.percentage).collect();
        assert_eq!(percentages, [30, 25, 23, 23]);

        assert_eq!(total_allocated(&plan), 100_000.0);
    }

    #[test]
    fn test_labels_follow_steps() {
        let plan = generate_investment_recommendations(100_000.0);

        assert_eq!(plan[0].risk, RiskLevel::VeryLow);
        assert_eq!(plan[0].priority, Priority::High);
        assert_eq!(plan[0].expected_return, "4-6%");
        assert_eq!(plan[1].risk, RiskLevel::Medium);
        assert_eq!(plan[2].risk, RiskLevel::MediumHigh);
        assert_eq!(plan[3].risk, RiskLevel::Low);
        assert_eq!(plan[3].priority, Priority::Low);
        assert_eq!(plan[2].risk.to_string(), "Medium-High");
    }

    #[test]
    fn test_emergency_fund_skipped_below_threshold() {
        // 30% of 10,000 is 3,000, under the 5,000 emission threshold
        let plan = generate_investment_recommendations(10_000.0);

        assert_eq!(plan[0].name, "SIP Investment");
        assert_eq!(plan[0].amount, 4_000.0);
        // 6,000 left is below the stocks threshold, so it all goes to the deposit
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].name, "Fixed Deposit");
        assert_eq!(plan[1].amount, 6_000.0);
        assert_eq!(total_allocated(&plan), 10_000.0);
    }

    #[test]
    fn test_emergency_fund_capped_by_monthly_estimate() {
        let policy = AllocationPolicy {
            monthly_expense_estimate: 5_000.0,
        };
        let plan = generate_investment_recommendations_with(1_000_000.0, &policy);

        assert_eq!(plan[0].name, "Emergency Fund");
        assert_eq!(plan[0].amount, 15_000.0);
        assert_eq!(plan[1].amount, SIP_CAP);
        assert_eq!(plan[2].amount, STOCKS_CAP);
        assert_eq!(plan[3].amount, 1_000_000.0 - 15_000.0 - SIP_CAP - STOCKS_CAP);
    }

    #[test]
    fn test_allocations_never_exceed_funds() {
        let policy = AllocationPolicy::default();
        for funds in [5_000.0, 7_321.5, 12_000.0, 48_000.0, 99_999.0, 250_000.0, 3e7] {
            let plan = generate_investment_recommendations_with(funds, &policy);
            assert!(total_allocated(&plan) <= funds + 1e-6, "funds {funds}");
            assert!(plan.iter().all(|r| r.amount > 0.0));
        }
    }
}
