//! Structural input validation.
//!
//! Runs before any calculation. Failures here are error-severity
//! diagnostics: malformed SSNs, filing-status/spouse mismatches, negative
//! amounts in fields that must be non-negative. Business-rule edge cases
//! are not validation failures and are handled inside the calculators.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Diagnostic, FilingStatus, TaxpayerInput};

fn ssn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Compile-checked literal; cannot fail at runtime.
        Regex::new(r"^(\d{3})-?(\d{2})-?(\d{4})$").unwrap()
    })
}

/// Whether a string is a plausibly valid SSN.
///
/// Checks the shape and the never-issued ranges (area 000, 666, 900+;
/// all-zero group or serial).
pub fn is_valid_ssn(ssn: &str) -> bool {
    let Some(captures) = ssn_pattern().captures(ssn) else {
        return false;
    };
    let area = &captures[1];
    let group = &captures[2];
    let serial = &captures[3];
    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

/// Validates a [`TaxpayerInput`], returning error-severity diagnostics for
/// every structural problem found. An empty vector means calculation may
/// proceed.
pub fn validate(input: &TaxpayerInput) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_ssns(input, &mut diagnostics);
    check_spouse_consistency(input, &mut diagnostics);
    check_amounts(input, &mut diagnostics);

    diagnostics
}

fn check_ssns(
    input: &TaxpayerInput,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Some(ssn) = &input.primary.ssn
        && !is_valid_ssn(ssn)
    {
        diagnostics
            .push(Diagnostic::error("BAD_SSN", "primary SSN is not valid").with_field("primary.ssn"));
    }
    if let Some(spouse) = &input.spouse
        && let Some(ssn) = &spouse.ssn
        && !is_valid_ssn(ssn)
    {
        diagnostics
            .push(Diagnostic::error("BAD_SSN", "spouse SSN is not valid").with_field("spouse.ssn"));
    }
    for (i, dependent) in input.dependents.iter().enumerate() {
        if let Some(ssn) = &dependent.ssn
            && !is_valid_ssn(ssn)
        {
            diagnostics.push(
                Diagnostic::error("BAD_SSN", "dependent SSN is not valid")
                    .with_field(format!("dependents[{i}].ssn")),
            );
        }
    }
}

fn check_spouse_consistency(
    input: &TaxpayerInput,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if input.filing_status == FilingStatus::MarriedFilingJointly && input.spouse.is_none() {
        diagnostics.push(
            Diagnostic::error(
                "MISSING_SPOUSE",
                "married filing jointly requires spouse data",
            )
            .with_field("spouse"),
        );
    }
    // Spouse data is optional when filing separately and forbidden for the
    // unmarried statuses.
    if !input.filing_status.is_married() && input.spouse.is_some() {
        diagnostics.push(
            Diagnostic::error(
                "UNEXPECTED_SPOUSE",
                "spouse data is incompatible with the filing status",
            )
            .with_field("spouse"),
        );
    }

    if input.filing_status == FilingStatus::HeadOfHousehold && input.dependents.is_empty() {
        diagnostics.push(
            Diagnostic::error(
                "HOH_NO_DEPENDENT",
                "head of household requires at least one dependent",
            )
            .with_field("dependents"),
        );
    }
}

fn check_amounts(
    input: &TaxpayerInput,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let non_negative: [(&str, i64); 10] = [
        ("income.wages", input.income.wages),
        ("income.interest", input.income.interest),
        ("income.ordinary_dividends", input.income.ordinary_dividends),
        ("income.qualified_dividends", input.income.qualified_dividends),
        ("income.other_income", input.income.other_income),
        ("above_line_adjustments", input.above_line_adjustments),
        ("nol_carryforward", input.nol_carryforward),
        ("payments.withholding", input.payments.withholding),
        ("dependent_care_expenses", input.dependent_care_expenses),
        ("retirement_contributions", input.retirement_contributions),
    ];
    for (field, amount) in non_negative {
        if amount < 0 {
            diagnostics.push(
                Diagnostic::error("NEGATIVE_AMOUNT", format!("{field} must be non-negative"))
                    .with_field(field),
            );
        }
    }

    if input.income.qualified_dividends > input.income.ordinary_dividends {
        diagnostics.push(
            Diagnostic::error(
                "QUALIFIED_EXCEEDS_ORDINARY",
                "qualified dividends cannot exceed ordinary dividends",
            )
            .with_field("income.qualified_dividends"),
        );
    }

    if let Some(itemized) = &input.itemized {
        let fields = [
            ("itemized.state_local_taxes", itemized.state_local_taxes),
            ("itemized.mortgage_interest", itemized.mortgage_interest),
            (
                "itemized.charitable_contributions",
                itemized.charitable_contributions,
            ),
            ("itemized.medical_expenses", itemized.medical_expenses),
            ("itemized.other", itemized.other),
        ];
        for (field, amount) in fields {
            if amount < 0 {
                diagnostics.push(
                    Diagnostic::error("NEGATIVE_AMOUNT", format!("{field} must be non-negative"))
                        .with_field(field),
                );
            }
        }
    }
}
