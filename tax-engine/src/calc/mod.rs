//! Calculation worksheets.

pub mod additional;
pub mod brackets;
pub mod credits;
pub mod deductions;
pub mod federal;
pub mod qbi;

pub use brackets::{Bracket, BracketSchedule, QualifiedRateWorksheet, ScheduleError};
pub use deductions::{DeductionResolver, DeductionResult};
pub use federal::FederalCalculator;
pub use qbi::{QbiCalculator, QbiInput, QbiResult};
