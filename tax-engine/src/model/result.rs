//! Federal calculation result.

use serde::{Deserialize, Serialize};

use crate::model::{Diagnostic, FilingStatus};
use crate::money::Cents;

/// Credit amounts, split by refundability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditsBreakdown {
    // Non-refundable.
    pub child_credit: Cents,
    pub other_dependent_credit: Cents,
    pub education_nonrefundable: Cents,
    pub dependent_care: Cents,
    pub savers: Cents,
    pub foreign_tax: Cents,
    pub adoption: Cents,
    /// Prior-year minimum tax credit applied this year.
    pub prior_minimum_tax: Cents,

    // Refundable.
    pub earned_income_credit: Cents,
    pub additional_child_credit: Cents,
    pub education_refundable: Cents,
    pub premium_credit: Cents,
}

impl CreditsBreakdown {
    pub fn nonrefundable_total(&self) -> Cents {
        self.child_credit
            + self.other_dependent_credit
            + self.education_nonrefundable
            + self.dependent_care
            + self.savers
            + self.foreign_tax
            + self.adoption
            + self.prior_minimum_tax
    }

    pub fn refundable_total(&self) -> Cents {
        self.earned_income_credit
            + self.additional_child_credit
            + self.education_refundable
            + self.premium_credit
    }
}

/// Taxes owed in addition to the regular bracket tax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalTaxes {
    pub self_employment: Cents,
    pub net_investment_income: Cents,
    pub additional_medicare: Cents,
    pub alternative_minimum: Cents,
    /// Excess advance premium tax credit that must be repaid.
    pub premium_repayment: Cents,
}

impl AdditionalTaxes {
    pub fn total(&self) -> Cents {
        self.self_employment
            + self.net_investment_income
            + self.additional_medicare
            + self.alternative_minimum
            + self.premium_repayment
    }
}

/// Amounts carried forward to future years.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carryovers {
    pub foreign_tax_credit: Cents,
    pub minimum_tax_credit: Cents,
    pub net_operating_loss: Cents,
}

/// Result of one federal calculation.
///
/// Invariants, maintained by the orchestrator:
/// `total_tax = max(0, tax_before_credits - nonrefundable) + additional`,
/// `refund_or_owe = payments + refundable - total_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalResult {
    pub tax_year: i32,
    pub filing_status: FilingStatus,

    pub total_income: i64,
    pub agi: i64,
    pub deduction_used: Cents,
    pub itemizing: bool,
    pub qbi_deduction: Cents,
    /// Net operating loss deduction taken this year.
    pub nol_deduction: Cents,
    pub taxable_income: Cents,

    pub tax_before_credits: Cents,
    pub credits: CreditsBreakdown,
    pub additional_taxes: AdditionalTaxes,
    pub total_tax: Cents,

    pub total_payments: Cents,
    /// Positive: refund due. Negative: balance owed.
    pub refund_or_owe: i64,

    pub earned_income: Cents,
    pub carryovers: Carryovers,
    pub diagnostics: Vec<Diagnostic>,
}

impl FederalResult {
    /// A zeroed result carrying only diagnostics, returned when validation
    /// rejects the input before calculation.
    pub fn rejected(
        tax_year: i32,
        filing_status: FilingStatus,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            tax_year,
            filing_status,
            total_income: 0,
            agi: 0,
            deduction_used: 0,
            itemizing: false,
            qbi_deduction: 0,
            nol_deduction: 0,
            taxable_income: 0,
            tax_before_credits: 0,
            credits: CreditsBreakdown::default(),
            additional_taxes: AdditionalTaxes::default(),
            total_tax: 0,
            total_payments: 0,
            refund_or_owe: 0,
            earned_income: 0,
            carryovers: Carryovers::default(),
            diagnostics,
        }
    }
}
