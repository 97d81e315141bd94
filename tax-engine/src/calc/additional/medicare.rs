//! Additional Medicare surtax.
//!
//! 0.9% of Medicare wages plus self-employment earnings above the filing
//! status threshold. Kept separate from the self-employment tax, which has
//! its own rates and base.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::FilingStatus;
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::MedicareSurtaxRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicareSurtaxInput {
    pub filing_status: FilingStatus,
    pub wages: Cents,
    /// Net earnings from self-employment, after the 92.35% factor.
    pub se_net_earnings: Cents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareSurtaxResult {
    pub tax: Cents,
}

#[derive(Debug, Clone)]
pub struct MedicareSurtaxCalculator<'a> {
    rules: &'a MedicareSurtaxRules,
}

impl<'a> MedicareSurtaxCalculator<'a> {
    pub fn new(rules: &'a MedicareSurtaxRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &MedicareSurtaxInput,
    ) -> MedicareSurtaxResult {
        let threshold = *self.rules.threshold.get(input.filing_status);
        let base = clamp_zero(input.wages + input.se_net_earnings - threshold);
        let tax = mul_rate(base, self.rules.rate);
        if tax > 0 {
            debug!(tax, "additional Medicare surtax computed");
        }
        MedicareSurtaxResult { tax }
    }
}
