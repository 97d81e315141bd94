//! Alternative minimum tax.
//!
//! AMTI starts from taxable income and adds back the deduction items the
//! AMT disallows: the standard deduction (or the SALT portion when
//! itemizing), private activity bond interest, and the ISO exercise spread.
//! The exemption phases out at 25 cents per dollar of AMTI over the
//! threshold. Tentative minimum tax uses the two-rate schedule; AMT is the
//! excess over regular tax. The prior-year minimum tax credit applies
//! against regular tax down to the tentative minimum.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AmtItems, Diagnostic, FilingStatus};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::AmtRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmtInput<'a> {
    pub filing_status: FilingStatus,
    pub taxable_income: Cents,
    /// Standard deduction taken, or SALT deducted when itemizing.
    pub deduction_addback: Cents,
    pub items: &'a AmtItems,
    /// Regular tax before credits less the foreign tax credit.
    pub regular_tax: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtResult {
    pub amti: Cents,
    pub exemption: Cents,
    pub tentative_minimum_tax: Cents,
    /// AMT owed on top of regular tax.
    pub amt: Cents,
    /// Prior-year minimum tax credit applied this year.
    pub credit_used: Cents,
    /// Minimum tax credit carried forward.
    pub credit_carryforward: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct AmtCalculator<'a> {
    rules: &'a AmtRules,
}

impl<'a> AmtCalculator<'a> {
    pub fn new(rules: &'a AmtRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &AmtInput<'_>,
    ) -> AmtResult {
        let mut result = AmtResult::default();

        result.amti = clamp_zero(input.taxable_income)
            + input.deduction_addback
            + input.items.private_activity_bond_interest
            + input.items.iso_exercise_spread;
        result.exemption = self.exemption(input.filing_status, result.amti);
        let base = clamp_zero(result.amti - result.exemption);
        result.tentative_minimum_tax = self.tentative_tax(input.filing_status, base);

        result.amt = clamp_zero(result.tentative_minimum_tax - input.regular_tax);
        if result.amt > 0 {
            result.notes.push(Diagnostic::info(
                "AMT_OWED",
                "tentative minimum tax exceeds regular tax",
            ));
        }

        // The minimum tax credit only reaches regular tax above the
        // tentative minimum; this year's AMT adds to the carryforward.
        let prior = input.items.prior_year_minimum_tax_credit;
        result.credit_used =
            prior.min(clamp_zero(input.regular_tax - result.tentative_minimum_tax));
        result.credit_carryforward = prior - result.credit_used + result.amt;
        debug!(
            amti = result.amti,
            tmt = result.tentative_minimum_tax,
            amt = result.amt,
            "AMT computed"
        );

        result
    }

    fn exemption(
        &self,
        filing_status: FilingStatus,
        amti: Cents,
    ) -> Cents {
        let base = *self.rules.exemption.get(filing_status);
        let threshold = *self.rules.exemption_phaseout_threshold.get(filing_status);
        let reduction = mul_rate(
            clamp_zero(amti - threshold),
            self.rules.exemption_phaseout_rate,
        );
        clamp_zero(base - reduction)
    }

    fn tentative_tax(
        &self,
        filing_status: FilingStatus,
        base: Cents,
    ) -> Cents {
        let breakpoint = *self.rules.rate_breakpoint.get(filing_status);
        let low = base.min(breakpoint);
        let high = clamp_zero(base - breakpoint);
        mul_rate(low, self.rules.low_rate) + mul_rate(high, self.rules.high_rate)
    }
}
