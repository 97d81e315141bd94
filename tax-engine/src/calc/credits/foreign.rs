//! Foreign tax credit with the per-category limitation.
//!
//! Each income category is limited to the U.S. tax attributable to that
//! category's share of taxable income. Foreign tax above a category's limit
//! becomes a carryover rather than a current credit.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, ForeignCategory, ForeignIncome};
use crate::money::{Cents, clamp_zero, mul_rate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignCreditInput<'a> {
    pub foreign_income: &'a [ForeignIncome],
    pub taxable_income: Cents,
    /// Regular tax before credits, the base the limit is carved from.
    pub tax_before_credits: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignCreditResult {
    pub credit: Cents,
    /// Foreign tax above the limit, carried to other years.
    pub carryover: Cents,
    pub notes: Vec<Diagnostic>,
}

pub struct ForeignCreditCalculator;

impl ForeignCreditCalculator {
    pub fn calculate(input: &ForeignCreditInput<'_>) -> ForeignCreditResult {
        let mut result = ForeignCreditResult::default();

        if input.foreign_income.is_empty() {
            return result;
        }
        if input.taxable_income <= 0 || input.tax_before_credits <= 0 {
            // No U.S. tax to credit against; everything carries over.
            result.carryover = input.foreign_income.iter().map(|f| f.tax_paid).sum();
            if result.carryover > 0 {
                result.notes.push(Diagnostic::info(
                    "FTC_NO_LIABILITY",
                    "no tax liability, foreign tax carried over in full",
                ));
            }
            return result;
        }

        // Aggregate per category before applying the limitation.
        let mut by_category: BTreeMap<&'static str, (Cents, Cents)> = BTreeMap::new();
        for entry in input.foreign_income {
            let bucket = by_category.entry(category_name(entry.category)).or_default();
            bucket.0 += entry.income;
            bucket.1 += entry.tax_paid;
        }

        for (category, (income, tax_paid)) in by_category {
            let share = Decimal::from(clamp_zero(income).min(input.taxable_income))
                / Decimal::from(input.taxable_income);
            let limit = mul_rate(input.tax_before_credits, share);
            let credited = tax_paid.min(limit);
            result.credit += credited;
            let excess = tax_paid - credited;
            result.carryover += excess;
            if excess > 0 {
                result.notes.push(Diagnostic::info(
                    "FTC_LIMITED",
                    format!("foreign tax in the {category} category exceeds the limitation"),
                ));
            }
        }
        debug!(
            credit = result.credit,
            carryover = result.carryover,
            "foreign tax credit computed"
        );

        result
    }
}

fn category_name(category: ForeignCategory) -> &'static str {
    match category {
        ForeignCategory::General => "general",
        ForeignCategory::Passive => "passive",
        ForeignCategory::ForeignBranch => "foreign branch",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::money::from_dollars;

    fn entry(category: ForeignCategory, income: i64, tax_paid: i64) -> ForeignIncome {
        ForeignIncome {
            category,
            income: from_dollars(income),
            tax_paid: from_dollars(tax_paid),
        }
    }

    #[test]
    fn credit_below_the_limit_is_taken_in_full() {
        let foreign = [entry(ForeignCategory::General, 10_000, 1_000)];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(100_000),
            tax_before_credits: from_dollars(18_000),
        };

        let result = ForeignCreditCalculator::calculate(&input);

        // Limit is 18,000 × 10% = 1,800.
        assert_eq!(result.credit, from_dollars(1_000));
        assert_eq!(result.carryover, 0);
    }

    #[test]
    fn excess_over_the_limit_carries_over() {
        let foreign = [entry(ForeignCategory::General, 10_000, 3_000)];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(100_000),
            tax_before_credits: from_dollars(18_000),
        };

        let result = ForeignCreditCalculator::calculate(&input);

        assert_eq!(result.credit, from_dollars(1_800));
        assert_eq!(result.carryover, from_dollars(1_200));
        assert!(result.notes.iter().any(|n| n.code == "FTC_LIMITED"));
    }

    #[test]
    fn categories_are_limited_independently() {
        let foreign = [
            entry(ForeignCategory::General, 10_000, 500),
            entry(ForeignCategory::Passive, 5_000, 2_000),
        ];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(100_000),
            tax_before_credits: from_dollars(18_000),
        };

        let result = ForeignCreditCalculator::calculate(&input);

        // General takes 500 (limit 1,800); passive is limited to 900.
        assert_eq!(result.credit, from_dollars(1_400));
        assert_eq!(result.carryover, from_dollars(1_100));
    }

    #[test]
    fn same_category_entries_pool_before_the_limit() {
        let foreign = [
            entry(ForeignCategory::General, 5_000, 1_200),
            entry(ForeignCategory::General, 5_000, 400),
        ];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(100_000),
            tax_before_credits: from_dollars(18_000),
        };

        let result = ForeignCreditCalculator::calculate(&input);

        // Pooled limit 1,800 covers the pooled 1,600 of tax.
        assert_eq!(result.credit, from_dollars(1_600));
        assert_eq!(result.carryover, 0);
    }

    #[test]
    fn no_liability_carries_everything_over() {
        let foreign = [entry(ForeignCategory::General, 10_000, 1_000)];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(5_000),
            tax_before_credits: 0,
        };

        let result = ForeignCreditCalculator::calculate(&input);

        assert_eq!(result.credit, 0);
        assert_eq!(result.carryover, from_dollars(1_000));
        assert!(result.notes.iter().any(|n| n.code == "FTC_NO_LIABILITY"));
    }

    #[test]
    fn foreign_income_above_taxable_income_caps_the_share() {
        let foreign = [entry(ForeignCategory::General, 200_000, 50_000)];
        let input = ForeignCreditInput {
            foreign_income: &foreign,
            taxable_income: from_dollars(100_000),
            tax_before_credits: from_dollars(18_000),
        };

        let result = ForeignCreditCalculator::calculate(&input);

        // Share capped at 100%, so the limit is the whole liability.
        assert_eq!(result.credit, from_dollars(18_000));
        assert_eq!(result.carryover, from_dollars(32_000));
    }
}
