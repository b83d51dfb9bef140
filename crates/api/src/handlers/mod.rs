pub mod anime;
pub mod calendar;
pub mod manga;
pub mod parties;
pub mod profile;
pub mod quests;
pub mod search;
pub mod workouts;
