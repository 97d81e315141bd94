//! Net investment income tax.
//!
//! 3.8% of the smaller of net investment income and MAGI over the filing
//! status threshold.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::FilingStatus;
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::NiitRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NiitInput {
    pub filing_status: FilingStatus,
    pub net_investment_income: Cents,
    pub magi: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiitResult {
    pub tax: Cents,
}

#[derive(Debug, Clone)]
pub struct NiitCalculator<'a> {
    rules: &'a NiitRules,
}

impl<'a> NiitCalculator<'a> {
    pub fn new(rules: &'a NiitRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &NiitInput,
    ) -> NiitResult {
        let threshold = *self.rules.agi_threshold.get(input.filing_status);
        let excess = clamp_zero(input.magi - threshold);
        let base = clamp_zero(input.net_investment_income).min(excess);
        let tax = mul_rate(base, self.rules.rate);
        if tax > 0 {
            debug!(tax, "net investment income tax computed");
        }
        NiitResult { tax }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::money::from_dollars;
    use crate::rules::RuleRegistry;

    fn calculate(input: &NiitInput) -> NiitResult {
        let registry = RuleRegistry::builtin();
        let rules = &registry.rules_for(2025).unwrap().niit;
        NiitCalculator::new(rules).calculate(input)
    }

    #[test]
    fn magi_below_the_threshold_is_zero() {
        let input = NiitInput {
            filing_status: FilingStatus::Single,
            net_investment_income: from_dollars(50_000),
            magi: from_dollars(180_000),
        };

        assert_eq!(calculate(&input).tax, 0);
    }

    #[test]
    fn base_is_the_smaller_of_nii_and_magi_excess() {
        let input = NiitInput {
            filing_status: FilingStatus::Single,
            net_investment_income: from_dollars(50_000),
            magi: from_dollars(220_000),
        };

        // Excess 20,000 < NII 50,000: 3.8% × 20,000.
        assert_eq!(calculate(&input).tax, from_dollars(760));
    }

    #[test]
    fn small_nii_limits_the_base() {
        let input = NiitInput {
            filing_status: FilingStatus::Single,
            net_investment_income: from_dollars(5_000),
            magi: from_dollars(300_000),
        };

        assert_eq!(calculate(&input).tax, from_dollars(190));
    }

    #[test]
    fn joint_threshold_is_250k() {
        let input = NiitInput {
            filing_status: FilingStatus::MarriedFilingJointly,
            net_investment_income: from_dollars(100_000),
            magi: from_dollars(250_000),
        };

        assert_eq!(calculate(&input).tax, 0);
    }
}
