//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   ┌───────────┐      ┌─────────────────────────┐      ┌───────────┐
//!   │ Exchange  │ ───▶ │ Application (engine)    │ ───▶ │  Store    │
//!   │ Adapters  │      │ Domain + Port           │      │  Adapter  │
//!   └───────────┘      └─────────────────────────┘      └───────────┘
//! ```
//!
//! - [`QuoteStream`] - Normalized quote feed from one price source
//! - [`OpportunityRepository`] - Persistence for detected opportunities

pub mod outbound;

pub use outbound::exchange::{QuoteEvent, QuoteStream};
pub use outbound::store::OpportunityRepository;
