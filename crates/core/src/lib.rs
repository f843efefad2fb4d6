//! Domain types and pure logic shared by every clipdeck crate.
//!
//! This crate has zero internal dependencies so it can be used by the
//! db, catalog, engine, and api layers alike. Anything requiring I/O
//! (database, catalog service, timers) lives in the crates above it.

pub mod conditions;
pub mod error;
pub mod family;
pub mod schedule;
pub mod types;
