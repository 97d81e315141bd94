//! State calculation input and result.

use serde::{Deserialize, Serialize};
use tax_engine::model::Diagnostic;
use tax_engine::money::Cents;
use tax_engine::FilingStatus;

/// Input to one state calculation, carried over from the federal result
/// plus state-specific overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInput {
    pub filing_status: FilingStatus,
    pub federal_agi: i64,
    /// Federal taxable income, for states that start from it.
    pub federal_taxable_income: Cents,
    /// State additions to the federal starting figure.
    pub agi_additions: Cents,
    /// State subtractions from the federal starting figure.
    pub agi_subtractions: Cents,
    /// Itemized deductions claimed at the state level; taken when larger
    /// than the state standard deduction.
    pub itemized_deductions: Option<Cents>,
    /// Net long-term capital gain; negative for a net loss.
    pub net_capital_gain: i64,
    /// Federal earned income credit, for states with a percentage match.
    pub federal_eitc: Cents,
    pub dependents: usize,
    /// County of residence, for states with county income taxes.
    pub county: Option<String>,
    /// State income tax withheld.
    pub withholding: Cents,
}

impl StateInput {
    /// A zeroed input for the filing status.
    pub fn new(filing_status: FilingStatus) -> Self {
        Self {
            filing_status,
            federal_agi: 0,
            federal_taxable_income: 0,
            agi_additions: 0,
            agi_subtractions: 0,
            itemized_deductions: None,
            net_capital_gain: 0,
            federal_eitc: 0,
            dependents: 0,
            county: None,
            withholding: 0,
        }
    }
}

/// Result of one state calculation. Every state fills the same shape;
/// components a state does not levy stay zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    /// Two-letter state code.
    pub state: String,
    pub tax_year: i32,
    /// State AGI after additions and subtractions.
    pub agi: i64,
    pub taxable_income: Cents,
    /// Tax from the state's rate structure before surtaxes and credits.
    pub base_tax: Cents,
    pub surtax: Cents,
    pub county_tax: Cents,
    /// State earned income credit.
    pub eitc_credit: Cents,
    pub total_tax: Cents,
    pub withholding: Cents,
    /// Positive: refund due. Negative: balance owed.
    pub refund_or_owe: i64,
    pub notes: Vec<Diagnostic>,
}

impl StateResult {
    /// An all-zero result for a state and year.
    pub fn zero(
        state: &str,
        tax_year: i32,
    ) -> Self {
        Self {
            state: state.to_string(),
            tax_year,
            agi: 0,
            taxable_income: 0,
            base_tax: 0,
            surtax: 0,
            county_tax: 0,
            eitc_credit: 0,
            total_tax: 0,
            withholding: 0,
            refund_or_owe: 0,
            notes: Vec::new(),
        }
    }
}
