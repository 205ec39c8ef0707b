//! Named-group membership engine.
//!
//! Members belong to zero or more groups identified purely by name, through
//! rows in the `group_memberships` table. Each row may carry an optional
//! membership type (a role-like tag) used to scope queries.
//!
//! Two entry points:
//!
//! - [`NamedGroupCollection`]: a per-member, set-like view that mutates and
//!   reads the relation rows for one member.
//! - [`NamedGroupQueries`]: bulk predicates on a member entity, translated
//!   into joins and grouped count comparisons so "all"/"only" checks run in
//!   the database instead of loading rows into memory.

pub use collection::NamedGroupCollection;
pub use error::EngineError;
pub use query::NamedGroupQueries;

pub mod collection;
mod error;
pub mod group_memberships;
pub mod members;
pub mod query;

pub type ResultEngine<T> = Result<T, EngineError>;
