//! Row structs (`FromRow` + `Serialize`) and request DTOs (`Deserialize`),
//! one module per table group.

pub mod anime;
pub mod calendar;
pub mod manga;
pub mod party;
pub mod profile;
pub mod quest;
pub mod workout;
