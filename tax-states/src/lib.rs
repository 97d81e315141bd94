//! State personal income tax calculators for tax year 2025.
//!
//! States plug into one [`StateCalculator`] trait and produce one
//! [`StateResult`] shape. Most states are declarative [`StateProfile`]
//! data evaluated by [`ProfileCalculator`]; Washington's capital gains
//! excise is the one bespoke implementation.
//!
//! ```
//! use tax_engine::FilingStatus;
//! use tax_states::{StateInput, StateRegistry};
//!
//! let registry = StateRegistry::builtin_2025();
//! let mut input = StateInput::new(FilingStatus::Single);
//! input.federal_agi = 80_000_00;
//!
//! let result = registry.calculate("PA", &input)?;
//! assert_eq!(result.total_tax, 2_456_00);
//! # Ok::<(), tax_states::StateError>(())
//! ```

pub mod model;
pub mod profiles;
pub mod special;
pub mod strategy;

use std::collections::BTreeMap;

use thiserror::Error;

pub use model::{StateInput, StateResult};
pub use special::WashingtonExcise;
pub use strategy::{
    DeductionRule, EitcMatch, ProfileCalculator, StateCalculator, StateProfile, Surtax, TaxBase,
    TaxShape,
};

/// Errors from state lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("no calculator for state {0:?}")]
    UnknownState(String),
}

/// Registry of state calculators keyed by two-letter code.
pub struct StateRegistry {
    states: BTreeMap<String, Box<dyn StateCalculator>>,
}

impl StateRegistry {
    /// The registry of built-in 2025 state calculators.
    pub fn builtin_2025() -> Self {
        let mut states = BTreeMap::new();
        for calculator in profiles::all_2025() {
            states.insert(calculator.code().to_string(), calculator);
        }
        Self { states }
    }

    /// Calculator for a state code. Lookup is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownState`] for codes with no calculator.
    pub fn get(
        &self,
        code: &str,
    ) -> Result<&dyn StateCalculator, StateError> {
        self.states
            .get(&code.to_uppercase())
            .map(Box::as_ref)
            .ok_or_else(|| StateError::UnknownState(code.to_string()))
    }

    /// Looks up the state and runs its calculation.
    pub fn calculate(
        &self,
        code: &str,
        input: &StateInput,
    ) -> Result<StateResult, StateError> {
        Ok(self.get(code)?.calculate(input))
    }

    pub fn codes(&self) -> Vec<&str> {
        self.states.keys().map(String::as_str).collect()
    }
}
