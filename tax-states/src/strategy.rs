//! Data-driven state calculator.
//!
//! Most states fit one shape: a starting base (federal AGI or federal
//! taxable income) adjusted by state additions and subtractions, a
//! deduction rule, per-dependent exemptions, a rate structure (none, flat,
//! or progressive), and optional layers on top (millionaire surtax, county
//! income tax, federal EITC match). A [`StateProfile`] captures those
//! choices as data and [`ProfileCalculator`] evaluates them. States that
//! genuinely do not fit implement [`StateCalculator`] directly.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tax_engine::calc::BracketSchedule;
use tax_engine::model::Diagnostic;
use tax_engine::money::{clamp_zero, mul_rate, Cents};
use tax_engine::rules::StatusTable;
use tracing::debug;

use crate::model::{StateInput, StateResult};

/// One state's tax computation.
pub trait StateCalculator: Send + Sync {
    /// Two-letter state code.
    fn code(&self) -> &str;

    fn name(&self) -> &str;

    fn calculate(&self, input: &StateInput) -> StateResult;
}

/// Income the state starts its computation from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxBase {
    FederalAgi,
    FederalTaxableIncome,
}

/// The state's rate structure.
#[derive(Debug, Clone)]
pub enum TaxShape {
    /// No personal income tax.
    Untaxed,
    Flat(Decimal),
    Progressive(StatusTable<BracketSchedule>),
}

/// How the state deduction is determined.
#[derive(Debug, Clone)]
pub enum DeductionRule {
    None,
    Fixed(StatusTable<Cents>),
    /// A maximum that shrinks by `rate` per dollar of income over the
    /// threshold, floored at zero.
    PhaseOut {
        max: StatusTable<Cents>,
        threshold: StatusTable<Cents>,
        rate: Decimal,
    },
}

/// Extra rate on income above a threshold.
#[derive(Debug, Clone)]
pub struct Surtax {
    pub threshold: Cents,
    pub rate: Decimal,
}

/// State EITC as a fraction of the federal credit.
#[derive(Debug, Clone)]
pub struct EitcMatch {
    pub rate: Decimal,
    /// Refundable matches pay out past zero liability; non-refundable
    /// matches stop there.
    pub refundable: bool,
}

/// Declarative description of one state.
#[derive(Debug, Clone)]
pub struct StateProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub tax_year: i32,
    pub base: TaxBase,
    pub shape: TaxShape,
    pub deduction: DeductionRule,
    pub exemption_per_dependent: Cents,
    pub surtax: Option<Surtax>,
    pub eitc_match: Option<EitcMatch>,
    /// County income tax rates on state taxable income, keyed by
    /// lowercase county name.
    pub county_rates: BTreeMap<String, Decimal>,
}

/// Evaluates a [`StateProfile`].
#[derive(Debug, Clone)]
pub struct ProfileCalculator {
    profile: StateProfile,
}

impl ProfileCalculator {
    pub fn new(profile: StateProfile) -> Self {
        Self { profile }
    }

    /// The standard deduction per the profile rule, or the state itemized
    /// total when the filer claims more.
    fn deduction(
        &self,
        input: &StateInput,
        state_agi: i64,
    ) -> Cents {
        let standard = match &self.profile.deduction {
            // States with no deduction allow no itemizing either.
            DeductionRule::None => return 0,
            DeductionRule::Fixed(table) => *table.get(input.filing_status),
            DeductionRule::PhaseOut {
                max,
                threshold,
                rate,
            } => {
                let max = *max.get(input.filing_status);
                let excess = clamp_zero(state_agi - *threshold.get(input.filing_status));
                clamp_zero(max - mul_rate(excess, *rate))
            }
        };
        match input.itemized_deductions {
            Some(itemized) => standard.max(itemized),
            None => standard,
        }
    }

    fn county_tax(
        &self,
        input: &StateInput,
        taxable: Cents,
        notes: &mut Vec<Diagnostic>,
    ) -> Cents {
        if self.profile.county_rates.is_empty() {
            return 0;
        }
        let Some(county) = &input.county else {
            return 0;
        };
        match self.profile.county_rates.get(&county.to_lowercase()) {
            Some(rate) => mul_rate(taxable, *rate),
            None => {
                notes.push(
                    Diagnostic::warning(
                        "UNKNOWN_COUNTY",
                        format!("no county rate on file for {county}"),
                    )
                    .with_field("county"),
                );
                0
            }
        }
    }
}

impl StateCalculator for ProfileCalculator {
    fn code(&self) -> &str {
        self.profile.code
    }

    fn name(&self) -> &str {
        self.profile.name
    }

    fn calculate(&self, input: &StateInput) -> StateResult {
        let mut result = StateResult::zero(self.profile.code, self.profile.tax_year);
        result.withholding = input.withholding;
        result.agi = input.federal_agi + input.agi_additions - input.agi_subtractions;

        if matches!(self.profile.shape, TaxShape::Untaxed) {
            result.notes.push(Diagnostic::info(
                "NO_INCOME_TAX",
                format!("{} has no personal income tax", self.profile.name),
            ));
            result.refund_or_owe = input.withholding;
            return result;
        }

        let base = match self.profile.base {
            TaxBase::FederalAgi => result.agi,
            TaxBase::FederalTaxableIncome => {
                input.federal_taxable_income + input.agi_additions - input.agi_subtractions
            }
        };
        let exemptions = self.profile.exemption_per_dependent * input.dependents as i64;
        result.taxable_income =
            clamp_zero(base - self.deduction(input, result.agi) - exemptions);

        result.base_tax = match &self.profile.shape {
            TaxShape::Untaxed => 0,
            TaxShape::Flat(rate) => mul_rate(result.taxable_income, *rate),
            TaxShape::Progressive(schedules) => schedules
                .get(input.filing_status)
                .tax_for(result.taxable_income),
        };

        if let Some(surtax) = &self.profile.surtax {
            result.surtax = mul_rate(
                clamp_zero(result.taxable_income - surtax.threshold),
                surtax.rate,
            );
        }
        result.county_tax = self.county_tax(input, result.taxable_income, &mut result.notes);

        let liability = result.base_tax + result.surtax + result.county_tax;
        let mut refundable_excess = 0;
        if let Some(eitc) = &self.profile.eitc_match {
            result.eitc_credit = mul_rate(input.federal_eitc, eitc.rate);
            if result.eitc_credit > liability {
                if eitc.refundable {
                    refundable_excess = result.eitc_credit - liability;
                } else {
                    result.notes.push(Diagnostic::info(
                        "STATE_EITC_NONREFUNDABLE",
                        "state earned income credit exceeds the liability and is not refundable",
                    ));
                }
            }
        }

        result.total_tax = clamp_zero(liability - result.eitc_credit);
        result.refund_or_owe = input.withholding + refundable_excess - result.total_tax;
        debug!(
            state = self.profile.code,
            taxable = result.taxable_income,
            total = result.total_tax,
            refund = result.refund_or_owe,
            "state tax computed"
        );

        result
    }
}
