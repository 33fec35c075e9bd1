//! Persistence port for detected opportunities.

use async_trait::async_trait;

use crate::domain::opportunity::Opportunity;
use crate::error::Result;

/// Durable sink for opportunities that passed simulated execution.
///
/// Callers bound every call with their own timeout and never retry; an
/// error is reported and the opportunity discarded.
#[async_trait]
pub trait OpportunityRepository: Send + Sync {
    /// Persist one opportunity.
    async fn log_opportunity(&self, opportunity: &Opportunity) -> Result<()>;
}
