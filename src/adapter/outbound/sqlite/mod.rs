//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`OpportunityRepository`](crate::port::OpportunityRepository)
//! and the read queries behind `referee history`, using Diesel ORM.

pub mod database;
pub mod repository;

pub use repository::SqliteOpportunityRepository;
