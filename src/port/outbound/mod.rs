//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the price sources
//! that feed quotes in and the store that receives detected opportunities.

pub mod exchange;
pub mod store;
