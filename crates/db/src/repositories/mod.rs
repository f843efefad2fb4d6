//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or an open transaction, for multi-statement
//! invariants) as the first argument.

pub mod actor_repo;
pub mod item_repo;
pub mod job_run_repo;
pub mod playlist_item_repo;
pub mod playlist_repo;
pub mod settings_repo;
pub mod template_repo;

pub use actor_repo::ActorRepo;
pub use item_repo::ItemRepo;
pub use job_run_repo::JobRunRepo;
pub use playlist_item_repo::PlaylistItemRepo;
pub use playlist_repo::PlaylistRepo;
pub use settings_repo::SettingsRepo;
pub use template_repo::TemplateRepo;

/// Shorthand for an open Postgres transaction.
pub type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;
