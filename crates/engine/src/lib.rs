//! Playlist reconciliation and scheduled job engine.
//!
//! The modules here own everything with real invariants: membership
//! resolution from declarative rules, the transactional reconcile diff,
//! actor x template playlist generation, the orphaned-item maintenance
//! sweep, snapshot backups, and the per-family scheduler with its
//! single-flight guards and run history.

pub mod backup;
pub mod error;
pub mod generation;
pub mod guard;
pub mod jobs;
pub mod maintenance;
pub mod reconcile;
pub mod refresh;
pub mod resolver;
pub mod scheduler;

pub use error::EngineError;
pub use scheduler::SchedulerCoordinator;
