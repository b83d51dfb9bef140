//! Domain types, validation and pure computations for LevelUp.
//!
//! Nothing in this crate performs I/O. The `db` and `api` crates call into
//! these modules for every rule that does not need the database.

pub mod anime;
pub mod calendar;
pub mod error;
pub mod exp;
pub mod invite;
pub mod manga;
pub mod party;
pub mod profile;
pub mod quest;
pub mod tier_list;
pub mod types;
pub mod workout;
