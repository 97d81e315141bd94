//! Qualified business income deduction.
//!
//! 20% of qualified business income, subject to the W-2 wage / UBIA limit
//! phased in over the taxable-income band above the threshold. Specified
//! service businesses phase out entirely across the same band. The overall
//! deduction is capped at 20% of taxable income less net capital gain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagnostic, FilingStatus, QbiBusiness};
use crate::money::{Cents, clamp_zero, mul_rate};
use crate::rules::QbiRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QbiInput<'a> {
    pub filing_status: FilingStatus,
    /// Taxable income before this deduction.
    pub taxable_income: Cents,
    /// Net capital gain plus qualified dividends, for the overall cap.
    pub net_capital_gain: Cents,
    pub businesses: &'a [QbiBusiness],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QbiResult {
    /// Sum of per-business components before the overall cap.
    pub combined: Cents,
    pub deduction: Cents,
    pub notes: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct QbiCalculator<'a> {
    rules: &'a QbiRules,
}

impl<'a> QbiCalculator<'a> {
    pub fn new(rules: &'a QbiRules) -> Self {
        Self { rules }
    }

    pub fn calculate(
        &self,
        input: &QbiInput<'_>,
    ) -> QbiResult {
        let mut result = QbiResult::default();

        if input.businesses.is_empty() {
            return result;
        }

        let limit_fraction = self.limit_fraction(input.filing_status, input.taxable_income);

        let mut combined: i64 = 0;
        for business in input.businesses {
            combined += self.business_component(business, limit_fraction, &mut result.notes);
        }
        result.combined = combined;
        if combined < 0 {
            result.notes.push(Diagnostic::info(
                "QBI_NET_LOSS",
                "combined qualified business income is a net loss",
            ));
        }

        let cap = mul_rate(
            clamp_zero(input.taxable_income - input.net_capital_gain),
            self.rules.rate,
        );
        result.deduction = clamp_zero(combined).min(cap);
        debug!(
            combined,
            deduction = result.deduction,
            "QBI deduction computed"
        );

        result
    }

    /// How far into the phase-in band taxable income sits: 0 below the
    /// threshold, 1 at or past the top of the band.
    fn limit_fraction(
        &self,
        filing_status: FilingStatus,
        taxable_income: Cents,
    ) -> Decimal {
        let threshold = *self.rules.threshold.get(filing_status);
        let range = *self.rules.phase_in_range.get(filing_status);
        let excess = clamp_zero(taxable_income - threshold);
        if excess == 0 {
            return Decimal::ZERO;
        }
        if excess >= range {
            return Decimal::ONE;
        }
        Decimal::from(excess) / Decimal::from(range)
    }

    fn business_component(
        &self,
        business: &QbiBusiness,
        limit_fraction: Decimal,
        notes: &mut Vec<Diagnostic>,
    ) -> i64 {
        // Losses flow through at the deduction rate and offset other
        // businesses; no wage limit applies to a loss.
        if business.qualified_income <= 0 {
            return mul_rate(business.qualified_income, self.rules.rate);
        }

        // SSTB income, wages, and basis shrink linearly across the band and
        // vanish at the top.
        let sstb_retained = if business.is_sstb {
            Decimal::ONE - limit_fraction
        } else {
            Decimal::ONE
        };
        if business.is_sstb && sstb_retained.is_zero() {
            notes.push(Diagnostic::info(
                "QBI_SSTB_EXCLUDED",
                "specified service business excluded above the phase-out band",
            ));
            return 0;
        }

        let income = mul_rate(business.qualified_income, sstb_retained);
        let wages = mul_rate(business.w2_wages, sstb_retained);
        let ubia = mul_rate(business.ubia, sstb_retained);

        let tentative = mul_rate(income, self.rules.rate);
        if limit_fraction.is_zero() {
            return tentative;
        }

        let wage_limit = mul_rate(wages, self.rules.w2_wage_rate)
            .max(mul_rate(wages, self.rules.w2_wage_ubia_rate) + mul_rate(ubia, self.rules.ubia_rate));
        let reduction = mul_rate(clamp_zero(tentative - wage_limit), limit_fraction);
        if reduction > 0 {
            notes.push(Diagnostic::info(
                "QBI_WAGE_LIMITED",
                "qualified business income deduction limited by W-2 wages and basis",
            ));
        }
        tentative - reduction
    }
}
