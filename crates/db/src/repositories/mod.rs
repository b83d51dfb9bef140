//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. User-owned rows are always
//! filtered by `user_id`, so a foreign id behaves exactly like a missing one.

pub mod anime_repo;
pub mod calendar_repo;
pub mod manga_repo;
pub mod party_list_repo;
pub mod party_member_repo;
pub mod party_repo;
pub mod profile_repo;
pub mod quest_completion_repo;
pub mod quest_repo;
pub mod workout_exercise_repo;
pub mod workout_repo;
pub mod workout_set_repo;

pub use anime_repo::AnimeRepo;
pub use calendar_repo::CalendarRepo;
pub use manga_repo::MangaRepo;
pub use party_list_repo::PartyListRepo;
pub use party_member_repo::PartyMemberRepo;
pub use party_repo::PartyRepo;
pub use profile_repo::ProfileRepo;
pub use quest_completion_repo::QuestCompletionRepo;
pub use quest_repo::QuestRepo;
pub use workout_exercise_repo::WorkoutExerciseRepo;
pub use workout_repo::WorkoutRepo;
pub use workout_set_repo::WorkoutSetRepo;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 200;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
