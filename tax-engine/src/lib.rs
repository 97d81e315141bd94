//! Federal personal income tax computation for tax year 2025.
//!
//! The engine is a pure function from a [`TaxpayerInput`] to a
//! [`FederalResult`]: no I/O, no shared state, all money in integer cents.
//! Statutory constants live in year-keyed [`rules`] tables; the calculators
//! in [`calc`] are worksheets over those tables and never embed a year
//! literal.
//!
//! ```
//! use tax_engine::{FilingStatus, TaxEngine, TaxpayerInput};
//!
//! let engine = TaxEngine::new();
//! let mut input = TaxpayerInput::new(2025, FilingStatus::Single);
//! input.income.wages = 50_000_00;
//!
//! let result = engine.calculate(&input)?;
//! assert_eq!(result.taxable_income, 34_250_00);
//! # Ok::<(), tax_engine::RulesError>(())
//! ```

pub mod calc;
pub mod model;
pub mod money;
pub mod rules;
pub mod validate;

pub use calc::{BracketSchedule, FederalCalculator, QualifiedRateWorksheet};
pub use model::{
    AdditionalTaxes, Carryovers, CreditsBreakdown, Diagnostic, FederalResult, FilingStatus,
    Severity, TaxpayerInput,
};
pub use money::{Cents, MoneyError};
pub use rules::{RuleRegistry, RuleSet, RulesError};

/// Entry point owning the rule registry.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    registry: RuleRegistry,
}

impl TaxEngine {
    /// An engine over the built-in rule tables.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::builtin(),
        }
    }

    /// An engine over a caller-supplied registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn supported_years(&self) -> Vec<i32> {
        self.registry.years()
    }

    /// Computes one federal return for the input's tax year.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnsupportedYear`] when no rule table is loaded
    /// for the input's year.
    pub fn calculate(
        &self,
        input: &TaxpayerInput,
    ) -> Result<FederalResult, RulesError> {
        let rules = self.registry.rules_for(input.tax_year)?;
        Ok(FederalCalculator::new(rules).calculate(input))
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn engine_rejects_unsupported_years() {
        let engine = TaxEngine::new();
        let input = TaxpayerInput::new(2019, FilingStatus::Single);

        assert_eq!(
            engine.calculate(&input).err(),
            Some(RulesError::UnsupportedYear(2019))
        );
    }

    #[test]
    fn engine_supports_2025() {
        let engine = TaxEngine::new();

        assert_eq!(engine.supported_years(), vec![2025]);
    }
}
