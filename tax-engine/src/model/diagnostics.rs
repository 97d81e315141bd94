//! Calculation diagnostics.
//!
//! The engine never raises for a tax-code edge case. Ineligibility, applied
//! caps and other business-rule outcomes surface as info/warning diagnostics
//! attached to the result; structurally invalid input surfaces as
//! error-severity diagnostics produced before any calculation runs.

use serde::{Deserialize, Serialize};

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single note attached to a calculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `EITC_INVESTMENT_LIMIT`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
    /// Input field the note refers to, when one applies.
    pub field: Option<String>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Info)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            severity,
        }
    }
}

/// True when any diagnostic in the slice is error-severity.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}
