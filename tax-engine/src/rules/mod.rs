//! Year-keyed rule tables.
//!
//! Every statutory constant the calculators consume lives here, keyed by
//! `(tax_year, filing_status)`. Rule sets are immutable once loaded and are
//! safe to share across concurrent calculation requests. No calculator embeds
//! a year literal.

mod year_2025;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calc::brackets::{BracketSchedule, ScheduleError};
use crate::model::FilingStatus;
use crate::money::Cents;

/// Errors from rule lookup and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("no rule table for tax year {0}")]
    UnsupportedYear(i32),

    #[error("invalid {table} schedule for {status}: {source}")]
    InvalidSchedule {
        table: &'static str,
        status: &'static str,
        source: ScheduleError,
    },
}

/// A value per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTable<T> {
    pub single: T,
    pub married_joint: T,
    pub married_separate: T,
    pub head_of_household: T,
}

impl<T> StatusTable<T> {
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_joint,
            FilingStatus::MarriedFilingSeparately => &self.married_separate,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }
}

impl<T: Clone> StatusTable<T> {
    /// The same value for every status.
    pub fn uniform(value: T) -> Self {
        Self {
            single: value.clone(),
            married_joint: value.clone(),
            married_separate: value.clone(),
            head_of_household: value,
        }
    }
}

/// Child tax credit and credit for other dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCreditRules {
    pub credit_per_child: Cents,
    pub other_dependent_credit: Cents,
    pub phaseout_threshold: StatusTable<Cents>,
    /// Reduction per $1,000 (or fraction) of AGI over the threshold.
    pub phaseout_per_thousand: Cents,
    pub refundable_limit_per_child: Cents,
    pub refundable_rate: Decimal,
    pub earned_income_floor: Cents,
}

/// One EITC row, keyed by number of qualifying children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcTable {
    pub phase_in_rate: Decimal,
    /// Earned income at which the credit reaches its maximum.
    pub earned_income_amount: Cents,
    pub max_credit: Cents,
    pub phaseout_rate: Decimal,
    pub phaseout_threshold: Cents,
    pub phaseout_threshold_mfj: Cents,
}

/// Earned income credit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcRules {
    pub investment_income_limit: Cents,
    /// Indexed by qualifying children: 0, 1, 2, 3-or-more.
    pub tables: [EitcTable; 4],
}

impl EitcRules {
    pub fn table_for(
        &self,
        qualifying_children: usize,
    ) -> &EitcTable {
        &self.tables[qualifying_children.min(3)]
    }
}

/// Education credit parameters (AOTC and LLC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRules {
    /// AOTC: 100% of expenses up to this tier.
    pub aotc_first_tier: Cents,
    /// AOTC: this rate on the next tier of equal size.
    pub aotc_second_rate: Decimal,
    pub aotc_second_tier: Cents,
    pub aotc_refundable_share: Decimal,
    pub llc_rate: Decimal,
    /// Pooled expense ceiling for the LLC.
    pub llc_expense_cap: Cents,
    pub phaseout_start: Cents,
    pub phaseout_end: Cents,
    pub phaseout_start_mfj: Cents,
    pub phaseout_end_mfj: Cents,
}

/// Child and dependent care credit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCareRules {
    pub expense_cap_one: Cents,
    pub expense_cap_two_or_more: Cents,
    pub base_rate: Decimal,
    pub min_rate: Decimal,
    /// Rate drops by `rate_step` per `agi_step` of AGI over `agi_threshold`.
    pub agi_threshold: Cents,
    pub agi_step: Cents,
    pub rate_step: Decimal,
}

/// One saver's credit tier: contributions credited at `rate` up to an AGI
/// ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaversTier {
    pub agi_limit: Cents,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaversRules {
    pub contribution_cap: Cents,
    pub tiers: StatusTable<[SaversTier; 3]>,
}

/// Qualified business income deduction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QbiRules {
    pub rate: Decimal,
    pub threshold: StatusTable<Cents>,
    /// Width of the phase-in band above the threshold.
    pub phase_in_range: StatusTable<Cents>,
    pub w2_wage_rate: Decimal,
    pub w2_wage_ubia_rate: Decimal,
    pub ubia_rate: Decimal,
}

/// Adoption credit parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRules {
    pub max_per_child: Cents,
    pub phaseout_start: Cents,
    pub phaseout_end: Cents,
}

/// One premium-tax-credit applicable-percentage breakpoint: at
/// `fpl_ratio` × the poverty line, the expected contribution is `rate` of
/// household income. Percentages interpolate linearly between breakpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumBreakpoint {
    pub fpl_ratio: Decimal,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumRules {
    /// Ascending by `fpl_ratio`. Below the first breakpoint the rate is the
    /// first rate; above the last it is the last rate.
    pub breakpoints: Vec<PremiumBreakpoint>,
}

/// Self-employment tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeRules {
    pub wage_base: Cents,
    pub social_security_rate: Decimal,
    pub medicare_rate: Decimal,
    pub net_earnings_factor: Decimal,
    pub deduction_factor: Decimal,
    pub min_threshold: Cents,
}

/// Net investment income tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiitRules {
    pub rate: Decimal,
    pub agi_threshold: StatusTable<Cents>,
}

/// Additional Medicare surtax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareSurtaxRules {
    pub rate: Decimal,
    pub threshold: StatusTable<Cents>,
}

/// Alternative minimum tax parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtRules {
    pub exemption: StatusTable<Cents>,
    pub exemption_phaseout_threshold: StatusTable<Cents>,
    pub exemption_phaseout_rate: Decimal,
    pub low_rate: Decimal,
    pub high_rate: Decimal,
    /// AMTI breakpoint between the two rates.
    pub rate_breakpoint: StatusTable<Cents>,
}

/// All statutory constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub tax_year: i32,
    pub brackets: StatusTable<BracketSchedule>,
    pub capital_gains_brackets: StatusTable<BracketSchedule>,
    pub standard_deduction: StatusTable<Cents>,
    /// Add-on per age-65/blind condition.
    pub aged_blind_addon: StatusTable<Cents>,
    pub salt_cap: Cents,
    pub medical_agi_floor: Decimal,
    /// Net operating loss deduction cap, as a share of income before the
    /// loss.
    pub nol_limit_rate: Decimal,
    pub child_credit: ChildCreditRules,
    pub eitc: EitcRules,
    pub education: EducationRules,
    pub dependent_care: DependentCareRules,
    pub savers: SaversRules,
    pub qbi: QbiRules,
    pub adoption: AdoptionRules,
    pub premium: PremiumRules,
    pub self_employment: SeRules,
    pub niit: NiitRules,
    pub additional_medicare: MedicareSurtaxRules,
    pub amt: AmtRules,
}

impl RuleSet {
    /// Re-validates every bracket schedule in the set.
    ///
    /// Schedules built with [`BracketSchedule::from_steps`] hold the
    /// invariant by construction; deserialized rule sets go through this.
    pub fn validate(&self) -> Result<(), RulesError> {
        for status in FilingStatus::ALL {
            for (table, schedules) in [
                ("ordinary bracket", &self.brackets),
                ("capital gains bracket", &self.capital_gains_brackets),
            ] {
                BracketSchedule::new(schedules.get(status).brackets().to_vec()).map_err(
                    |source| RulesError::InvalidSchedule {
                        table,
                        status: status.as_str(),
                        source,
                    },
                )?;
            }
        }
        Ok(())
    }
}

/// Immutable registry of rule sets, keyed by tax year.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: BTreeMap<i32, RuleSet>,
}

impl RuleRegistry {
    /// The registry of built-in rule tables.
    pub fn builtin() -> Self {
        let mut rules = BTreeMap::new();
        let year = year_2025::rules();
        rules.insert(year.tax_year, year);
        Self { rules }
    }

    /// Rule set for a tax year.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnsupportedYear`] when no table is loaded for
    /// the year.
    pub fn rules_for(
        &self,
        tax_year: i32,
    ) -> Result<&RuleSet, RulesError> {
        self.rules
            .get(&tax_year)
            .ok_or(RulesError::UnsupportedYear(tax_year))
    }

    pub fn years(&self) -> Vec<i32> {
        self.rules.keys().copied().collect()
    }
}
