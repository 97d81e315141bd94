//! Credit calculators.
//!
//! Each calculator is a pure worksheet over its rule table. The orchestrator
//! owns the statutory ordering: the child credit runs last among the
//! non-refundable credits and receives the liability left after the others.

pub mod adoption;
pub mod child;
pub mod dependent_care;
pub mod education;
pub mod eitc;
pub mod foreign;
pub mod premium;
pub mod savers;

pub use adoption::{AdoptionCalculator, AdoptionInput, AdoptionResult};
pub use child::{ChildCreditCalculator, ChildCreditInput, ChildCreditResult};
pub use dependent_care::{DependentCareCalculator, DependentCareInput, DependentCareResult};
pub use education::{EducationCalculator, EducationInput, EducationResult};
pub use eitc::{EitcCalculator, EitcInput, EitcResult};
pub use foreign::{ForeignCreditCalculator, ForeignCreditInput, ForeignCreditResult};
pub use premium::{PremiumCalculator, PremiumResult};
pub use savers::{SaversCalculator, SaversInput, SaversResult};
