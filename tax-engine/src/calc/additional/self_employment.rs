//! Self-employment tax.
//!
//! Net earnings are 92.35% of self-employment profit. The social security
//! portion applies up to the wage base remaining after W-2 wages; the
//! Medicare portion is uncapped. Half the tax comes back as an above-the-line
//! deduction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Diagnostic;
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::SeRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfEmploymentInput {
    /// Net self-employment profit or loss.
    pub business_income: i64,
    /// W-2 wages already counted against the social security wage base.
    pub wages: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentResult {
    pub net_earnings: Cents,
    pub social_security: Cents,
    pub medicare: Cents,
    pub tax: Cents,
    /// Half-of-SE-tax above-the-line deduction.
    pub deduction: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct SelfEmploymentCalculator<'a> {
    rules: &'a SeRules,
}

impl<'a> SelfEmploymentCalculator<'a> {
    pub fn new(rules: &'a SeRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &SelfEmploymentInput,
    ) -> SelfEmploymentResult {
        let mut result = SelfEmploymentResult::default();

        if input.business_income <= 0 {
            return result;
        }

        result.net_earnings = mul_rate(input.business_income, self.rules.net_earnings_factor);
        if result.net_earnings < self.rules.min_threshold {
            result.notes.push(Diagnostic::info(
                "SE_BELOW_THRESHOLD",
                "net earnings below the self-employment tax threshold",
            ));
            result.net_earnings = 0;
            return result;
        }

        // Wages consume the wage base first.
        let base_remaining = clamp_zero(self.rules.wage_base - input.wages);
        result.social_security = mul_rate(
            result.net_earnings.min(base_remaining),
            self.rules.social_security_rate,
        );
        if result.net_earnings > base_remaining {
            result.notes.push(Diagnostic::info(
                "SE_WAGE_BASE",
                "social security portion limited by the wage base",
            ));
        }
        result.medicare = mul_rate(result.net_earnings, self.rules.medicare_rate);
        result.tax = result.social_security + result.medicare;
        result.deduction = mul_rate(result.tax, self.rules.deduction_factor);
        debug!(tax = result.tax, deduction = result.deduction, "SE tax computed");

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::money::from_dollars;
    use crate::rules::RuleRegistry;

    fn calculate(input: &SelfEmploymentInput) -> SelfEmploymentResult {
        let registry = RuleRegistry::builtin();
        let rules = &registry.rules_for(2025).unwrap().self_employment;
        SelfEmploymentCalculator::new(rules).calculate(input)
    }

    #[test]
    fn basic_se_tax_below_the_wage_base() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(100_000),
            wages: 0,
        };

        let result = calculate(&input);

        assert_eq!(result.net_earnings, from_dollars(92_350));
        // 12.4% + 2.9% of 92,350.
        assert_eq!(result.social_security, 1_145_140);
        assert_eq!(result.medicare, 267_815);
        assert_eq!(result.tax, 1_412_955);
        assert_eq!(result.deduction, 706_478);
    }

    #[test]
    fn loss_produces_no_tax() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(-20_000),
            wages: 0,
        };

        let result = calculate(&input);

        assert_eq!(result.tax, 0);
        assert_eq!(result.deduction, 0);
    }

    #[test]
    fn below_the_400_dollar_threshold_is_exempt() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(400),
            wages: 0,
        };

        let result = calculate(&input);

        // 400 × 0.9235 = 369.40 < 400.
        assert_eq!(result.tax, 0);
        assert!(result.notes.iter().any(|n| n.code == "SE_BELOW_THRESHOLD"));
    }

    #[test]
    fn social_security_portion_caps_at_the_wage_base() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(250_000),
            wages: 0,
        };

        let result = calculate(&input);

        // Net earnings 230,875 exceed the 176,100 base.
        assert_eq!(result.social_security, mul_rate(from_dollars(176_100), dec!(0.124)));
        assert_eq!(result.medicare, mul_rate(from_dollars(230_875), dec!(0.029)));
        assert!(result.notes.iter().any(|n| n.code == "SE_WAGE_BASE"));
    }

    #[test]
    fn wages_consume_the_wage_base_first() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(100_000),
            wages: from_dollars(150_000),
        };

        let result = calculate(&input);

        // Only 26,100 of base remains for the social security portion.
        assert_eq!(result.social_security, mul_rate(from_dollars(26_100), dec!(0.124)));
        assert_eq!(result.medicare, mul_rate(result.net_earnings, dec!(0.029)));
    }

    #[test]
    fn wages_above_the_base_leave_only_medicare() {
        let input = SelfEmploymentInput {
            business_income: from_dollars(50_000),
            wages: from_dollars(200_000),
        };

        let result = calculate(&input);

        assert_eq!(result.social_security, 0);
        assert!(result.medicare > 0);
    }
}
