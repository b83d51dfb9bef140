#![allow(dead_code)]

use levelup_db::models::profile::Profile;
use levelup_db::repositories::ProfileRepo;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a fresh profile with a random id.
pub async fn new_user(pool: &PgPool) -> Profile {
    let id = Uuid::new_v4();
    let username = levelup_core::profile::default_username(&id);
    let fallback = levelup_core::profile::fallback_username(&id);
    ProfileRepo::ensure_exists(pool, id, &username, &fallback)
        .await
        .unwrap()
}
