//! Additional taxes layered on top of the regular income tax.

pub mod amt;
pub mod medicare;
pub mod niit;
pub mod self_employment;

pub use amt::{AmtCalculator, AmtInput, AmtResult};
pub use medicare::{MedicareSurtaxCalculator, MedicareSurtaxInput, MedicareSurtaxResult};
pub use niit::{NiitCalculator, NiitInput, NiitResult};
pub use self_employment::{
    SelfEmploymentCalculator, SelfEmploymentInput, SelfEmploymentResult,
};
