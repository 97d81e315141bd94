//! Child and dependent care credit.
//!
//! A sliding rate from 35% down to 20%, dropping one point per $2,000 of
//! AGI over $15,000, applied to capped care expenses. Expenses are also
//! limited by earned income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Diagnostic;
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::DependentCareRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentCareInput {
    pub qualifying_persons: usize,
    pub expenses: Cents,
    pub agi: i64,
    pub earned_income: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCareResult {
    pub eligible_expenses: Cents,
    pub rate: Decimal,
    pub credit: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct DependentCareCalculator<'a> {
    rules: &'a DependentCareRules,
}

impl<'a> DependentCareCalculator<'a> {
    pub fn new(rules: &'a DependentCareRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &DependentCareInput,
    ) -> DependentCareResult {
        let mut result = DependentCareResult::default();

        if input.qualifying_persons == 0 || input.expenses <= 0 {
            return result;
        }
        if input.earned_income <= 0 {
            result.notes.push(Diagnostic::info(
                "CARE_NO_EARNED_INCOME",
                "no earned income, so no dependent care credit",
            ));
            return result;
        }

        let cap = if input.qualifying_persons == 1 {
            self.rules.expense_cap_one
        } else {
            self.rules.expense_cap_two_or_more
        };
        result.eligible_expenses = input.expenses.min(cap).min(input.earned_income);
        result.rate = self.applicable_rate(input.agi);
        result.credit = mul_rate(result.eligible_expenses, result.rate);
        debug!(
            expenses = result.eligible_expenses,
            %result.rate,
            credit = result.credit,
            "dependent care credit computed"
        );

        result
    }

    /// One `rate_step` off the base rate per `agi_step` (or fraction) of AGI
    /// over the threshold, floored at the minimum rate.
    fn applicable_rate(
        &self,
        agi: i64,
    ) -> Decimal {
        let excess = clamp_zero(agi - self.rules.agi_threshold);
        let step = self.rules.agi_step;
        let decrements = (excess + step - 1) / step;
        let rate = self.rules.base_rate - self.rules.rate_step * Decimal::from(decrements);
        rate.max(self.rules.min_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::money::from_dollars;
    use crate::rules::RuleRegistry;

    fn calculate(input: &DependentCareInput) -> DependentCareResult {
        let registry = RuleRegistry::builtin();
        let rules = &registry.rules_for(2025).unwrap().dependent_care;
        DependentCareCalculator::new(rules).calculate(input)
    }

    fn base_input() -> DependentCareInput {
        DependentCareInput {
            qualifying_persons: 1,
            expenses: from_dollars(5_000),
            agi: from_dollars(50_000),
            earned_income: from_dollars(50_000),
        }
    }

    #[test]
    fn one_person_cap_and_floor_rate() {
        let result = calculate(&base_input());

        // Expenses capped at 3,000, rate floored at 20%.
        assert_eq!(result.eligible_expenses, from_dollars(3_000));
        assert_eq!(result.rate, dec!(0.20));
        assert_eq!(result.credit, from_dollars(600));
    }

    #[test]
    fn two_or_more_persons_double_the_cap() {
        let mut input = base_input();
        input.qualifying_persons = 2;
        input.expenses = from_dollars(10_000);

        let result = calculate(&input);

        assert_eq!(result.eligible_expenses, from_dollars(6_000));
        assert_eq!(result.credit, from_dollars(1_200));
    }

    #[test]
    fn low_agi_takes_the_full_rate() {
        let mut input = base_input();
        input.agi = from_dollars(15_000);
        input.earned_income = from_dollars(15_000);

        let result = calculate(&input);

        assert_eq!(result.rate, dec!(0.35));
        assert_eq!(result.credit, from_dollars(1_050));
    }

    #[test]
    fn rate_steps_down_per_two_thousand_of_agi() {
        let mut input = base_input();
        input.agi = from_dollars(25_000);

        let result = calculate(&input);

        // Five $2,000 steps over the threshold.
        assert_eq!(result.rate, dec!(0.30));
    }

    #[test]
    fn fraction_of_a_step_counts_as_a_full_step() {
        let mut input = base_input();
        input.agi = from_dollars(15_001);

        let result = calculate(&input);

        assert_eq!(result.rate, dec!(0.34));
    }

    #[test]
    fn exact_step_boundary_is_a_single_decrement() {
        let mut input = base_input();
        input.agi = from_dollars(17_000);

        let result = calculate(&input);

        // Exactly one $2,000 step over the threshold.
        assert_eq!(result.rate, dec!(0.34));
    }

    #[test]
    fn expenses_limited_by_earned_income() {
        let mut input = base_input();
        input.earned_income = from_dollars(1_000);

        let result = calculate(&input);

        assert_eq!(result.eligible_expenses, from_dollars(1_000));
        assert_eq!(result.credit, from_dollars(200));
    }

    #[test]
    fn zero_earned_income_gives_no_credit() {
        let mut input = base_input();
        input.earned_income = 0;

        let result = calculate(&input);

        assert_eq!(result.credit, 0);
        assert!(result.notes.iter().any(|n| n.code == "CARE_NO_EARNED_INCOME"));
    }

    #[test]
    fn no_qualifying_persons_gives_no_credit() {
        let mut input = base_input();
        input.qualifying_persons = 0;

        assert_eq!(calculate(&input).credit, 0);
    }
}
