//! Exchange-agnostic domain types and pure computations.

pub mod cost;
pub mod error;
pub mod fee;
pub mod id;
pub mod money;
pub mod opportunity;
pub mod quote;

pub use cost::{CostModel, ProfitBreakdown};
pub use error::DomainError;
pub use fee::FeeSchedule;
pub use id::{InstrumentId, OpportunityId, SourceId};
pub use money::{FeePct, Price, Volume};
pub use opportunity::{Opportunity, OpportunityBuildError, OpportunityBuilder};
pub use quote::Quote;
