//! Education credits: American opportunity credit and lifetime learning
//! credit.
//!
//! AOTC is computed per eligible student; all remaining students pool into
//! the lifetime learning credit. Both phase out over the same MAGI range.
//! 40% of the AOTC (after phase-out) is refundable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, FilingStatus, StudentExpense};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::EducationRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationInput<'a> {
    pub filing_status: FilingStatus,
    pub magi: Cents,
    pub students: &'a [StudentExpense],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationResult {
    /// AOTC after phase-out, refundable share included.
    pub american_opportunity: Cents,
    /// Lifetime learning credit after phase-out.
    pub lifetime_learning: Cents,
    pub nonrefundable: Cents,
    pub refundable: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct EducationCalculator<'a> {
    rules: &'a EducationRules,
}

impl<'a> EducationCalculator<'a> {
    pub fn new(rules: &'a EducationRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &EducationInput<'_>,
    ) -> EducationResult {
        let mut result = EducationResult::default();

        if input.students.is_empty() {
            return result;
        }
        if input.filing_status == FilingStatus::MarriedFilingSeparately {
            result.notes.push(Diagnostic::info(
                "EDU_FILING_STATUS",
                "married filing separately is not eligible for the education credits",
            ));
            return result;
        }

        let Some(retained) = self.phaseout_retained(input.filing_status, input.magi) else {
            result.notes.push(Diagnostic::info(
                "EDU_PHASED_OUT",
                "income is past the end of the education credit phase-out",
            ));
            return result;
        };

        let mut aotc = 0;
        let mut llc_expenses = 0;
        for student in input.students {
            if student.aotc_eligible {
                aotc += self.aotc_for_student(student.qualified_expenses);
            } else {
                llc_expenses += student.qualified_expenses;
            }
        }
        let llc = mul_rate(
            llc_expenses.min(self.rules.llc_expense_cap),
            self.rules.llc_rate,
        );

        result.american_opportunity = mul_rate(aotc, retained);
        result.lifetime_learning = mul_rate(llc, retained);
        result.refundable = mul_rate(
            result.american_opportunity,
            self.rules.aotc_refundable_share,
        );
        result.nonrefundable =
            result.american_opportunity - result.refundable + result.lifetime_learning;
        if retained < Decimal::ONE {
            result.notes.push(Diagnostic::info(
                "EDU_PHASEOUT",
                "education credits reduced by the income phase-out",
            ));
        }
        debug!(
            aotc = result.american_opportunity,
            llc = result.lifetime_learning,
            "education credits computed"
        );

        result
    }

    /// 100% of the first tier plus the second-tier rate on the next tier.
    fn aotc_for_student(
        &self,
        expenses: Cents,
    ) -> Cents {
        let first = expenses.min(self.rules.aotc_first_tier);
        let second = clamp_zero(expenses - self.rules.aotc_first_tier)
            .min(self.rules.aotc_second_tier);
        first + mul_rate(second, self.rules.aotc_second_rate)
    }

    /// Fraction of the credit retained after the MAGI phase-out, or `None`
    /// when fully phased out.
    fn phaseout_retained(
        &self,
        filing_status: FilingStatus,
        magi: Cents,
    ) -> Option<Decimal> {
        let (start, end) = if filing_status == FilingStatus::MarriedFilingJointly {
            (self.rules.phaseout_start_mfj, self.rules.phaseout_end_mfj)
        } else {
            (self.rules.phaseout_start, self.rules.phaseout_end)
        };
        if magi <= start {
            return Some(Decimal::ONE);
        }
        if magi >= end {
            return None;
        }
        Some(Decimal::from(end - magi) / Decimal::from(end - start))
    }
}
