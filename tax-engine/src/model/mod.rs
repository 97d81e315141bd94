mod diagnostics;
mod filing_status;
mod input;
mod result;

pub use diagnostics::{Diagnostic, Severity, has_errors};
pub use filing_status::FilingStatus;
pub use input::{
    AdoptionCase, AmtItems, Dependent, ForeignCategory, ForeignIncome, IncomeSources,
    ItemizedDeductions, Payments, PersonProfile, PremiumTaxInput, QbiBusiness, StudentExpense,
    TaxpayerInput,
};
pub use result::{AdditionalTaxes, Carryovers, CreditsBreakdown, FederalResult};
