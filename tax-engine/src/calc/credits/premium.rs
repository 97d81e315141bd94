//! Premium tax credit and advance-payment reconciliation.
//!
//! The expected contribution is the applicable percentage of household
//! income, interpolated between poverty-line-ratio breakpoints. The credit
//! is the benchmark premium over that contribution. Advance payments above
//! the final credit come back as additional tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, PremiumTaxInput};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::PremiumRules;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// Annual credit before reconciliation.
    pub credit: Cents,
    /// Refundable credit after subtracting advance payments.
    pub net_credit: Cents,
    /// Advance payments above the credit, owed back.
    pub repayment: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct PremiumCalculator<'a> {
    rules: &'a PremiumRules,
}

impl<'a> PremiumCalculator<'a> {
    pub fn new(rules: &'a PremiumRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &PremiumTaxInput,
    ) -> PremiumResult {
        let mut result = PremiumResult::default();

        if input.federal_poverty_line <= 0 || input.benchmark_premium <= 0 {
            result.repayment = input.advance_payments;
            if input.advance_payments > 0 {
                result.notes.push(Diagnostic::warning(
                    "PTC_NOT_COMPUTABLE",
                    "premium credit inputs are incomplete, advance payments owed back",
                ));
            }
            return result;
        }

        let fpl_ratio = Decimal::from(clamp_zero(input.household_income))
            / Decimal::from(input.federal_poverty_line);
        let rate = self.applicable_rate(fpl_ratio);
        let contribution = mul_rate(clamp_zero(input.household_income), rate);
        result.credit = clamp_zero(input.benchmark_premium - contribution);

        result.net_credit = clamp_zero(result.credit - input.advance_payments);
        result.repayment = clamp_zero(input.advance_payments - result.credit);
        if result.repayment > 0 {
            result.notes.push(Diagnostic::info(
                "PTC_REPAYMENT",
                "advance premium payments exceed the final credit",
            ));
        }
        debug!(
            credit = result.credit,
            repayment = result.repayment,
            "premium tax credit computed"
        );

        result
    }

    /// Applicable percentage at a poverty-line ratio, interpolating linearly
    /// between breakpoints and clamping at the ends.
    fn applicable_rate(
        &self,
        fpl_ratio: Decimal,
    ) -> Decimal {
        let points = &self.rules.breakpoints;
        let first = &points[0];
        if fpl_ratio <= first.fpl_ratio {
            return first.rate;
        }
        for pair in points.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if fpl_ratio <= hi.fpl_ratio {
                let span = hi.fpl_ratio - lo.fpl_ratio;
                let progress = (fpl_ratio - lo.fpl_ratio) / span;
                return lo.rate + (hi.rate - lo.rate) * progress;
            }
        }
        points[points.len() - 1].rate
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::money::from_dollars;
    use crate::rules::RuleRegistry;

    fn calculator_test(input: &PremiumTaxInput) -> PremiumResult {
        let registry = RuleRegistry::builtin();
        let rules = &registry.rules_for(2025).unwrap().premium;
        PremiumCalculator::new(rules).calculate(input)
    }

    fn base_input() -> PremiumTaxInput {
        PremiumTaxInput {
            benchmark_premium: from_dollars(8_000),
            advance_payments: 0,
            household_income: from_dollars(45_000),
            federal_poverty_line: from_dollars(15_000),
        }
    }

    #[test]
    fn credit_at_a_breakpoint_uses_the_breakpoint_rate() {
        // 45,000 / 15,000 = 3.0× the poverty line, 6% contribution.
        let result = calculator_test(&base_input());

        assert_eq!(result.credit, from_dollars(8_000 - 2_700));
        assert_eq!(result.net_credit, result.credit);
        assert_eq!(result.repayment, 0);
    }

    #[test]
    fn rate_interpolates_between_breakpoints() {
        let mut input = base_input();
        // 2.25× the poverty line: halfway between 2% and 4%.
        input.household_income = from_dollars(33_750);

        let result = calculator_test(&input);

        let contribution = crate::money::mul_rate(from_dollars(33_750), dec!(0.03));
        assert_eq!(result.credit, from_dollars(8_000) - contribution);
    }

    #[test]
    fn below_the_first_breakpoint_contribution_is_zero() {
        let mut input = base_input();
        input.household_income = from_dollars(18_000);

        let result = calculator_test(&input);

        assert_eq!(result.credit, from_dollars(8_000));
    }

    #[test]
    fn above_the_last_breakpoint_uses_the_top_rate() {
        let mut input = base_input();
        // 8× the poverty line: 8.5% of 120,000 exceeds the premium.
        input.household_income = from_dollars(120_000);

        let result = calculator_test(&input);

        assert_eq!(result.credit, 0);
    }

    #[test]
    fn advance_payments_above_the_credit_are_owed_back() {
        let mut input = base_input();
        input.advance_payments = from_dollars(7_000);

        let result = calculator_test(&input);

        assert_eq!(result.credit, from_dollars(5_300));
        assert_eq!(result.net_credit, 0);
        assert_eq!(result.repayment, from_dollars(1_700));
        assert!(result.notes.iter().any(|n| n.code == "PTC_REPAYMENT"));
    }

    #[test]
    fn advance_payments_below_the_credit_leave_a_net_credit() {
        let mut input = base_input();
        input.advance_payments = from_dollars(3_000);

        let result = calculator_test(&input);

        assert_eq!(result.net_credit, from_dollars(2_300));
        assert_eq!(result.repayment, 0);
    }

    #[test]
    fn missing_poverty_line_owes_advances_back() {
        let mut input = base_input();
        input.federal_poverty_line = 0;
        input.advance_payments = from_dollars(2_000);

        let result = calculator_test(&input);

        assert_eq!(result.credit, 0);
        assert_eq!(result.repayment, from_dollars(2_000));
        assert!(result.notes.iter().any(|n| n.code == "PTC_NOT_COMPUTABLE"));
    }
}
