//! Earned income tax credit.
//!
//! Phase-in / plateau / phase-out over earned income, with the phase-out
//! measured against the greater of earned income and AGI. The credit is the
//! smaller of the phase-in amount and the phase-out ceiling. Investment
//! income above the ceiling disqualifies the credit entirely.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, FilingStatus};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::EitcRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EitcInput {
    pub filing_status: FilingStatus,
    pub earned_income: Cents,
    pub agi: i64,
    pub investment_income: Cents,
    pub qualifying_children: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcResult {
    pub credit: Cents,
    /// Set when the investment-income ceiling disqualified the credit.
    pub disqualified: bool,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct EitcCalculator<'a> {
    rules: &'a EitcRules,
}

impl<'a> EitcCalculator<'a> {
    pub fn new(rules: &'a EitcRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &EitcInput,
    ) -> EitcResult {
        let mut result = EitcResult::default();

        if input.filing_status == FilingStatus::MarriedFilingSeparately {
            result.notes.push(Diagnostic::info(
                "EITC_FILING_STATUS",
                "married filing separately is not eligible for the earned income credit",
            ));
            return result;
        }

        // The ceiling disqualifies regardless of earned income or AGI.
        if input.investment_income > self.rules.investment_income_limit {
            result.disqualified = true;
            result.notes.push(
                Diagnostic::warning(
                    "EITC_INVESTMENT_LIMIT",
                    "investment income exceeds the earned income credit ceiling",
                )
                .with_field("income"),
            );
            return result;
        }

        if input.earned_income <= 0 {
            result.notes.push(Diagnostic::info(
                "EITC_NO_EARNED_INCOME",
                "no earned income, so no earned income credit",
            ));
            return result;
        }

        let table = self.rules.table_for(input.qualifying_children);
        let phase_in = mul_rate(
            input.earned_income.min(table.earned_income_amount),
            table.phase_in_rate,
        )
        .min(table.max_credit);

        let threshold = if input.filing_status == FilingStatus::MarriedFilingJointly {
            table.phaseout_threshold_mfj
        } else {
            table.phaseout_threshold
        };
        let phaseout_base = input.agi.max(input.earned_income);
        let ceiling = if phaseout_base > threshold {
            clamp_zero(
                table.max_credit - mul_rate(phaseout_base - threshold, table.phaseout_rate),
            )
        } else {
            table.max_credit
        };

        result.credit = phase_in.min(ceiling);
        if result.credit == 0 && ceiling == 0 {
            result.notes.push(Diagnostic::info(
                "EITC_PHASED_OUT",
                "income is past the end of the earned income credit phase-out",
            ));
        }
        debug!(credit = result.credit, phase_in, ceiling, "EITC computed");

        result
    }
}
