//! States that do not fit the declarative profile.
//!
//! Washington levies no tax on ordinary income but an excise on long-term
//! capital gains above a standard deduction, with a surcharge on very large
//! gains. The base is the gain itself rather than any federal income
//! figure, so it gets its own calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_engine::model::Diagnostic;
use tax_engine::money::{clamp_zero, mul_rate, Cents};
use tracing::debug;

use crate::model::{StateInput, StateResult};
use crate::strategy::StateCalculator;

/// Washington capital gains excise, 2025 parameters.
#[derive(Debug, Clone)]
pub struct WashingtonExcise {
    tax_year: i32,
    standard_deduction: Cents,
    rate: Decimal,
    surcharge_threshold: Cents,
    surcharge_rate: Decimal,
}

impl WashingtonExcise {
    pub fn new_2025() -> Self {
        Self {
            tax_year: 2025,
            standard_deduction: 270_000_00,
            rate: dec!(0.07),
            surcharge_threshold: 1_000_000_00,
            surcharge_rate: dec!(0.029),
        }
    }
}

impl StateCalculator for WashingtonExcise {
    fn code(&self) -> &str {
        "WA"
    }

    fn name(&self) -> &str {
        "Washington"
    }

    fn calculate(&self, input: &StateInput) -> StateResult {
        let mut result = StateResult::zero("WA", self.tax_year);
        result.agi = input.federal_agi;
        result.withholding = input.withholding;

        let taxable = clamp_zero(input.net_capital_gain - self.standard_deduction);
        result.taxable_income = taxable;
        if taxable == 0 {
            result.notes.push(Diagnostic::info(
                "WA_GAINS_UNDER_DEDUCTION",
                "long-term gains do not exceed the excise standard deduction",
            ));
            result.refund_or_owe = input.withholding;
            return result;
        }

        result.base_tax = mul_rate(taxable, self.rate);
        result.surtax = mul_rate(
            clamp_zero(taxable - self.surcharge_threshold),
            self.surcharge_rate,
        );
        result.total_tax = result.base_tax + result.surtax;
        result.refund_or_owe = input.withholding - result.total_tax;
        debug!(taxable, total = result.total_tax, "WA excise computed");

        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tax_engine::money::from_dollars;
    use tax_engine::FilingStatus;

    use super::*;

    fn input_with_gain(gain: i64) -> StateInput {
        let mut input = StateInput::new(FilingStatus::Single);
        input.net_capital_gain = from_dollars(gain);
        input.federal_agi = from_dollars(gain);
        input
    }

    #[test]
    fn gains_under_the_deduction_owe_nothing() {
        let result = WashingtonExcise::new_2025().calculate(&input_with_gain(200_000));

        assert_eq!(result.total_tax, 0);
        assert!(
            result
                .notes
                .iter()
                .any(|n| n.code == "WA_GAINS_UNDER_DEDUCTION")
        );
    }

    #[test]
    fn gains_over_the_deduction_pay_seven_percent() {
        let result = WashingtonExcise::new_2025().calculate(&input_with_gain(370_000));

        assert_eq!(result.base_tax, from_dollars(7_000));
        assert_eq!(result.surtax, 0);
        assert_eq!(result.total_tax, from_dollars(7_000));
    }

    #[test]
    fn very_large_gains_pay_the_surcharge() {
        let result = WashingtonExcise::new_2025().calculate(&input_with_gain(1_770_000));

        // Taxable 1,500,000: 7% on all of it, 2.9% on the 500,000 over
        // the surcharge threshold.
        assert_eq!(result.base_tax, from_dollars(105_000));
        assert_eq!(result.surtax, from_dollars(14_500));
    }

    #[test]
    fn ordinary_income_is_ignored() {
        let mut input = StateInput::new(FilingStatus::Single);
        input.federal_agi = from_dollars(5_000_000);
        input.net_capital_gain = 0;

        let result = WashingtonExcise::new_2025().calculate(&input);

        assert_eq!(result.total_tax, 0);
    }

    #[test]
    fn capital_loss_is_clamped() {
        let result = WashingtonExcise::new_2025().calculate(&input_with_gain(-50_000));

        assert_eq!(result.taxable_income, 0);
        assert_eq!(result.total_tax, 0);
    }
}
