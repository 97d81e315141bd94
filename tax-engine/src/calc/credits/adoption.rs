//! Adoption credit.
//!
//! Per-child qualified expenses up to the annual maximum, with special-needs
//! adoptions deemed to have incurred the full maximum. One MAGI phase-out
//! applies to the combined credit. Non-refundable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AdoptionCase, Diagnostic};
use crate::money::{Cents, mul_rate};
use crate::rules::AdoptionRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionInput<'a> {
    pub magi: Cents,
    pub adoptions: &'a [AdoptionCase],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionResult {
    pub credit: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct AdoptionCalculator<'a> {
    rules: &'a AdoptionRules,
}

impl<'a> AdoptionCalculator<'a> {
    pub fn new(rules: &'a AdoptionRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &AdoptionInput<'_>,
    ) -> AdoptionResult {
        let mut result = AdoptionResult::default();

        if input.adoptions.is_empty() {
            return result;
        }

        let combined: Cents = input
            .adoptions
            .iter()
            .map(|adoption| {
                if adoption.special_needs {
                    self.rules.max_per_child
                } else {
                    adoption.qualified_expenses.min(self.rules.max_per_child)
                }
            })
            .sum();

        result.credit = match self.phaseout_retained(input.magi) {
            Some(retained) if retained < Decimal::ONE => {
                result.notes.push(Diagnostic::info(
                    "ADOPTION_PHASEOUT",
                    "adoption credit reduced by the income phase-out",
                ));
                mul_rate(combined, retained)
            }
            Some(_) => combined,
            None => {
                result.notes.push(Diagnostic::info(
                    "ADOPTION_PHASED_OUT",
                    "income is past the end of the adoption credit phase-out",
                ));
                0
            }
        };
        debug!(credit = result.credit, "adoption credit computed");

        result
    }

    fn phaseout_retained(
        &self,
        magi: Cents,
    ) -> Option<Decimal> {
        if magi <= self.rules.phaseout_start {
            return Some(Decimal::ONE);
        }
        if magi >= self.rules.phaseout_end {
            return None;
        }
        Some(
            Decimal::from(self.rules.phaseout_end - magi)
                / Decimal::from(self.rules.phaseout_end - self.rules.phaseout_start),
        )
    }
}
