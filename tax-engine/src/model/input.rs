//! Taxpayer input model.
//!
//! A [`TaxpayerInput`] is supplied once per calculation request and is
//! immutable for that request. All monetary fields are integer cents; fields
//! that can legitimately represent a net loss are signed and documented as
//! such.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::FilingStatus;
use crate::money::Cents;

/// Demographic data for the primary taxpayer or spouse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonProfile {
    /// Social security number, `XXX-XX-XXXX` or digits only.
    pub ssn: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub blind: bool,
}

impl PersonProfile {
    /// Whether the person is treated as 65 or older for the tax year.
    ///
    /// A person born on January 1 is considered 65 on December 31 of the
    /// prior year, so the cutoff is January 2 of `tax_year - 64`.
    pub fn is_65_or_older(
        &self,
        tax_year: i32,
    ) -> bool {
        match (self.birth_date, NaiveDate::from_ymd_opt(tax_year - 64, 1, 2)) {
            (Some(birth), Some(cutoff)) => birth < cutoff,
            _ => false,
        }
    }
}

/// A dependent claimed on the return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub ssn: Option<String>,
    pub birth_date: NaiveDate,
    /// Qualifying child (true) vs. qualifying relative (false).
    pub is_qualifying_child: bool,
}

impl Dependent {
    /// Age on December 31 of the tax year.
    pub fn age_at_year_end(
        &self,
        tax_year: i32,
    ) -> i32 {
        tax_year - self.birth_date.year()
    }

    /// Child-credit qualifying child: qualifying child, under 17 at year
    /// end, with an SSN on file.
    pub fn qualifies_for_child_credit(
        &self,
        tax_year: i32,
    ) -> bool {
        self.is_qualifying_child && self.age_at_year_end(tax_year) < 17 && self.ssn.is_some()
    }
}

/// Income by category. Signed fields may carry net losses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSources {
    pub wages: Cents,
    pub interest: Cents,
    pub ordinary_dividends: Cents,
    /// Portion of `ordinary_dividends` that is qualified.
    pub qualified_dividends: Cents,
    /// Net capital gain; negative for a net loss.
    pub net_capital_gain: i64,
    /// Net self-employment profit or loss (Schedule C).
    pub business_income: i64,
    /// Pass-through (K-1) income or loss.
    pub k1_income: i64,
    pub other_income: Cents,
}

impl IncomeSources {
    /// Investment income as counted against the EITC ceiling and NIIT base:
    /// interest, dividends, and net capital gain floored at zero.
    pub fn investment_income(&self) -> Cents {
        self.interest + self.ordinary_dividends + self.net_capital_gain.max(0)
    }
}

/// Itemized deduction components, before caps and floors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedDeductions {
    pub state_local_taxes: Cents,
    pub mortgage_interest: Cents,
    pub charitable_contributions: Cents,
    pub medical_expenses: Cents,
    pub other: Cents,
}

/// Payments already made toward the year's liability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payments {
    pub withholding: Cents,
    pub estimated_payments: Cents,
}

impl Payments {
    pub fn total(&self) -> Cents {
        self.withholding + self.estimated_payments
    }
}

/// One student's education expenses for the education credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentExpense {
    pub student: String,
    pub qualified_expenses: Cents,
    /// Within the first four years of postsecondary education, enrolled at
    /// least half-time, and not previously claimed four times.
    pub aotc_eligible: bool,
}

/// One qualified trade or business for the QBI deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QbiBusiness {
    pub name: String,
    /// Qualified business income; negative for a loss.
    pub qualified_income: i64,
    pub w2_wages: Cents,
    /// Unadjusted basis immediately after acquisition of qualified property.
    pub ubia: Cents,
    /// Specified service trade or business.
    pub is_sstb: bool,
}

/// Foreign tax credit income category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForeignCategory {
    General,
    Passive,
    ForeignBranch,
}

/// Foreign-source income and tax paid, per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignIncome {
    pub category: ForeignCategory,
    pub income: Cents,
    pub tax_paid: Cents,
}

/// One adoption for the adoption credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionCase {
    pub qualified_expenses: Cents,
    /// Special-needs adoptions take the full per-child maximum regardless
    /// of actual expenses.
    pub special_needs: bool,
}

/// Premium tax credit sub-input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumTaxInput {
    /// Annual second-lowest-cost silver plan premium.
    pub benchmark_premium: Cents,
    /// Advance credit already paid to the insurer.
    pub advance_payments: Cents,
    pub household_income: Cents,
    /// Federal poverty line for the household size.
    pub federal_poverty_line: Cents,
}

/// AMT preference and adjustment items plus prior-year credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtItems {
    pub private_activity_bond_interest: Cents,
    pub iso_exercise_spread: Cents,
    pub prior_year_minimum_tax_credit: Cents,
}

/// Complete input for one federal calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerInput {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub primary: PersonProfile,
    pub spouse: Option<PersonProfile>,
    pub dependents: Vec<Dependent>,
    pub income: IncomeSources,
    /// Above-the-line adjustments other than the half-SE-tax deduction,
    /// which the engine computes itself.
    pub above_line_adjustments: Cents,
    /// Net operating loss carried forward from prior years.
    pub nol_carryforward: Cents,
    pub itemized: Option<ItemizedDeductions>,
    /// Itemize even when the standard deduction is larger.
    pub force_itemize: bool,
    pub payments: Payments,
    pub education: Vec<StudentExpense>,
    pub qbi_businesses: Vec<QbiBusiness>,
    pub foreign_income: Vec<ForeignIncome>,
    pub dependent_care_expenses: Cents,
    /// Eligible retirement contributions for the saver's credit.
    pub retirement_contributions: Cents,
    pub adoptions: Vec<AdoptionCase>,
    pub premium_tax: Option<PremiumTaxInput>,
    pub amt_items: AmtItems,
}

impl TaxpayerInput {
    /// A zeroed input for the given year and status.
    pub fn new(
        tax_year: i32,
        filing_status: FilingStatus,
    ) -> Self {
        Self {
            tax_year,
            filing_status,
            primary: PersonProfile::default(),
            spouse: None,
            dependents: Vec::new(),
            income: IncomeSources::default(),
            above_line_adjustments: 0,
            nol_carryforward: 0,
            itemized: None,
            force_itemize: false,
            payments: Payments::default(),
            education: Vec::new(),
            qbi_businesses: Vec::new(),
            foreign_income: Vec::new(),
            dependent_care_expenses: 0,
            retirement_contributions: 0,
            adoptions: Vec::new(),
            premium_tax: None,
            amt_items: AmtItems::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // PersonProfile tests
    // =========================================================================

    #[test]
    fn person_born_before_cutoff_is_65() {
        let person = PersonProfile {
            birth_date: Some(date(1961, 1, 1)),
            ..Default::default()
        };

        assert!(person.is_65_or_older(2025));
    }

    #[test]
    fn person_born_on_cutoff_is_not_65() {
        let person = PersonProfile {
            birth_date: Some(date(1961, 1, 2)),
            ..Default::default()
        };

        assert!(!person.is_65_or_older(2025));
    }

    #[test]
    fn person_without_birth_date_is_not_65() {
        assert!(!PersonProfile::default().is_65_or_older(2025));
    }

    // =========================================================================
    // Dependent tests
    // =========================================================================

    #[test]
    fn dependent_under_17_with_ssn_qualifies_for_child_credit() {
        let dep = Dependent {
            ssn: Some("123-45-6789".to_string()),
            birth_date: date(2015, 6, 1),
            is_qualifying_child: true,
        };

        assert_eq!(dep.age_at_year_end(2025), 10);
        assert!(dep.qualifies_for_child_credit(2025));
    }

    #[test]
    fn dependent_turning_17_does_not_qualify() {
        let dep = Dependent {
            ssn: Some("123-45-6789".to_string()),
            birth_date: date(2008, 12, 31),
            is_qualifying_child: true,
        };

        assert_eq!(dep.age_at_year_end(2025), 17);
        assert!(!dep.qualifies_for_child_credit(2025));
    }

    #[test]
    fn dependent_without_ssn_does_not_qualify() {
        let dep = Dependent {
            ssn: None,
            birth_date: date(2015, 6, 1),
            is_qualifying_child: true,
        };

        assert!(!dep.qualifies_for_child_credit(2025));
    }

    // =========================================================================
    // IncomeSources tests
    // =========================================================================

    #[test]
    fn investment_income_sums_interest_dividends_and_gains() {
        let income = IncomeSources {
            interest: 100_000,
            ordinary_dividends: 200_000,
            net_capital_gain: 300_000,
            ..Default::default()
        };

        assert_eq!(income.investment_income(), 600_000);
    }

    #[test]
    fn investment_income_floors_capital_loss_at_zero() {
        let income = IncomeSources {
            interest: 100_000,
            net_capital_gain: -300_000,
            ..Default::default()
        };

        assert_eq!(income.investment_income(), 100_000);
    }

    #[test]
    fn payments_total_adds_withholding_and_estimates() {
        let payments = Payments {
            withholding: 500_000,
            estimated_payments: 100_000,
        };

        assert_eq!(payments.total(), 600_000);
    }
}
