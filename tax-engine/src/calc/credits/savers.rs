//! Retirement savings contributions credit.
//!
//! Tiered rate (50/20/10%) by AGI within the filing status's limits,
//! applied to contributions capped at $2,000. Above the last tier the
//! credit is zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, FilingStatus};
use crate::money::{Cents, mul_rate};
use crate::rules::SaversRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaversInput {
    pub filing_status: FilingStatus,
    pub agi: i64,
    pub contributions: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaversResult {
    pub rate: Decimal,
    pub credit: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct SaversCalculator<'a> {
    rules: &'a SaversRules,
}

impl<'a> SaversCalculator<'a> {
    pub fn new(rules: &'a SaversRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &SaversInput,
    ) -> SaversResult {
        let mut result = SaversResult::default();

        if input.contributions <= 0 {
            return result;
        }

        let tiers = self.rules.tiers.get(input.filing_status);
        let Some(tier) = tiers.iter().find(|t| input.agi <= t.agi_limit) else {
            result.notes.push(Diagnostic::info(
                "SAVERS_AGI_LIMIT",
                "income is above the saver's credit limit",
            ));
            return result;
        };

        result.rate = tier.rate;
        result.credit = mul_rate(
            input.contributions.min(self.rules.contribution_cap),
            tier.rate,
        );
        debug!(credit = result.credit, "saver's credit computed");

        result
    }
}
