//! Child tax credit and credit for other dependents.
//!
//! The non-refundable portion is capped by the tax liability *remaining
//! after* the other non-refundable credits — the orchestrator passes that
//! remainder in, which is what pins the statutory credit ordering. The
//! refundable additional child tax credit phases in at 15% of earned income
//! over the floor, limited per child.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Diagnostic;
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::ChildCreditRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCreditInput {
    pub qualifying_children: usize,
    pub other_dependents: usize,
    pub agi: i64,
    pub earned_income: Cents,
    /// AGI phase-out threshold for the filing status.
    pub phaseout_threshold: Cents,
    /// Tax liability left after the other non-refundable credits.
    pub remaining_liability: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCreditResult {
    /// Credit before phase-out, children and other dependents combined.
    pub gross_credit: Cents,
    pub phaseout_reduction: Cents,
    /// Non-refundable child credit actually allowed.
    pub child_credit: Cents,
    /// Non-refundable other-dependent credit actually allowed.
    pub other_dependent_credit: Cents,
    /// Refundable additional child tax credit.
    pub additional_credit: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct ChildCreditCalculator<'a> {
    rules: &'a ChildCreditRules,
}

impl<'a> ChildCreditCalculator<'a> {
    pub fn new(rules: &'a ChildCreditRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &ChildCreditInput,
    ) -> ChildCreditResult {
        let mut result = ChildCreditResult::default();

        if input.qualifying_children == 0 && input.other_dependents == 0 {
            result.notes.push(Diagnostic::info(
                "CTC_NO_DEPENDENTS",
                "no qualifying children or other dependents",
            ));
            return result;
        }

        let child_gross = self.rules.credit_per_child * input.qualifying_children as i64;
        let other_gross = self.rules.other_dependent_credit * input.other_dependents as i64;
        result.gross_credit = child_gross + other_gross;

        result.phaseout_reduction = self
            .phaseout_reduction(input.agi, input.phaseout_threshold)
            .min(result.gross_credit);
        if result.phaseout_reduction > 0 {
            result.notes.push(Diagnostic::info(
                "CTC_PHASEOUT",
                "child credit reduced by the AGI phase-out",
            ));
        }

        // The phase-out consumes the other-dependent credit first, so the
        // refundable portion is measured against the child component.
        let other_after = clamp_zero(other_gross - result.phaseout_reduction);
        let child_after = clamp_zero(
            child_gross - clamp_zero(result.phaseout_reduction - other_gross),
        );
        let total_after = child_after + other_after;

        let allowed = total_after.min(input.remaining_liability);
        result.other_dependent_credit = other_after.min(allowed);
        result.child_credit = allowed - result.other_dependent_credit;

        result.additional_credit = self.additional_credit(
            child_after - result.child_credit,
            input.qualifying_children,
            input.earned_income,
        );
        if total_after > allowed && result.additional_credit == 0 && input.qualifying_children > 0 {
            result.notes.push(Diagnostic::info(
                "CTC_LIMITED_BY_LIABILITY",
                "child credit limited by remaining tax liability",
            ));
        }
        debug!(
            gross = result.gross_credit,
            allowed,
            additional = result.additional_credit,
            "child credit computed"
        );

        result
    }

    /// $50 per $1,000 (or fraction) of AGI over the threshold.
    fn phaseout_reduction(
        &self,
        agi: i64,
        threshold: Cents,
    ) -> Cents {
        let excess = clamp_zero(agi - threshold);
        if excess == 0 {
            return 0;
        }
        // excess > 0 here, so the bump rounds any fraction up to a full
        // increment without needing signed div_ceil.
        let thousand = 100_000;
        let increments = (excess + thousand - 1) / thousand;
        increments * self.rules.phaseout_per_thousand
    }

    /// min(unused child credit, 15% of earned income over the floor,
    /// per-child refundable limit).
    fn additional_credit(
        &self,
        unused_child_credit: Cents,
        qualifying_children: usize,
        earned_income: Cents,
    ) -> Cents {
        if qualifying_children == 0 || unused_child_credit <= 0 {
            return 0;
        }
        let earned_excess = clamp_zero(earned_income - self.rules.earned_income_floor);
        let phase_in = mul_rate(earned_excess, self.rules.refundable_rate);
        let limit = self.rules.refundable_limit_per_child * qualifying_children as i64;
        unused_child_credit.min(phase_in).min(limit)
    }
}
