//! Integration tests for party membership:
//! - creating a party enrols the owner
//! - joins respect the member cap and refuse disbanded parties
//! - owner succession and disbanding on leave
//! - invite codes are released when a party is disbanded

mod common;

use levelup_core::party;
use levelup_db::models::party::{JoinOutcome, LeaveOutcome};
use levelup_db::repositories::{PartyListRepo, PartyMemberRepo, PartyRepo};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_enrols_owner(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Weekend Watchers", owner.id, "ABC123")
        .await
        .unwrap();
    assert!(p.is_active);
    assert_eq!(p.owner_id, owner.id);

    let role = PartyMemberRepo::find_role(&pool, p.id, owner.id).await.unwrap();
    assert_eq!(role.as_deref(), Some(party::ROLE_OWNER));

    let summaries = PartyRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].member_count, 1);
    assert_eq!(summaries[0].role, party::ROLE_OWNER);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_join_is_idempotent_and_capped(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Tiny", owner.id, "TINY01")
        .await
        .unwrap();

    let guest = common::new_user(&pool).await;
    assert_eq!(
        PartyMemberRepo::join(&pool, p.id, guest.id, 2).await.unwrap(),
        JoinOutcome::Joined
    );
    assert_eq!(
        PartyMemberRepo::join(&pool, p.id, guest.id, 2).await.unwrap(),
        JoinOutcome::AlreadyMember
    );

    let late = common::new_user(&pool).await;
    assert_eq!(
        PartyMemberRepo::join(&pool, p.id, late.id, 2).await.unwrap(),
        JoinOutcome::Full
    );
    assert_eq!(PartyMemberRepo::count(&pool, p.id).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_join_after_disband_is_refused(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Gone", owner.id, "GONE01")
        .await
        .unwrap();
    assert!(PartyRepo::deactivate(&pool, p.id).await.unwrap());

    let guest = common::new_user(&pool).await;
    assert_eq!(
        PartyMemberRepo::join(&pool, p.id, guest.id, 10).await.unwrap(),
        JoinOutcome::Inactive
    );
    assert_eq!(
        PartyMemberRepo::join(&pool, p.id + 1000, guest.id, 10).await.unwrap(),
        JoinOutcome::Inactive
    );
    assert_eq!(PartyMemberRepo::count(&pool, p.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_leaving_transfers_ownership(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let first = common::new_user(&pool).await;
    let second = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Crew", owner.id, "CREW01")
        .await
        .unwrap();
    PartyMemberRepo::join(&pool, p.id, first.id, 10).await.unwrap();
    PartyMemberRepo::join(&pool, p.id, second.id, 10).await.unwrap();

    let outcome = PartyMemberRepo::leave(&pool, p.id, owner.id).await.unwrap();
    assert_eq!(outcome, Some(LeaveOutcome::OwnershipTransferred(first.id)));

    let reloaded = PartyRepo::find_active(&pool, p.id).await.unwrap().unwrap();
    assert_eq!(reloaded.owner_id, first.id);
    let members = PartyMemberRepo::list(&pool, p.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, first.id);
    assert_eq!(members[0].role, party::ROLE_OWNER);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_last_member_leaving_disbands(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Solo", owner.id, "SOLO01")
        .await
        .unwrap();

    let outcome = PartyMemberRepo::leave(&pool, p.id, owner.id).await.unwrap();
    assert_eq!(outcome, Some(LeaveOutcome::Disbanded));
    assert!(PartyRepo::find_active(&pool, p.id).await.unwrap().is_none());

    let stranger = common::new_user(&pool).await;
    assert!(PartyMemberRepo::leave(&pool, p.id, stranger.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_disbanded_party_releases_invite_code(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "First", owner.id, "REUSE1")
        .await
        .unwrap();
    assert!(PartyRepo::invite_code_in_use(&pool, "REUSE1").await.unwrap());

    // A second active party cannot take the same code.
    let other = common::new_user(&pool).await;
    let clash = PartyRepo::create_with_owner(&pool, "Second", other.id, "REUSE1").await;
    assert!(clash.is_err());

    assert!(PartyRepo::deactivate(&pool, p.id).await.unwrap());
    assert!(!PartyRepo::invite_code_in_use(&pool, "REUSE1").await.unwrap());
    assert!(PartyRepo::find_active_by_invite_code(&pool, "REUSE1")
        .await
        .unwrap()
        .is_none());

    let reused = PartyRepo::create_with_owner(&pool, "Second", other.id, "REUSE1")
        .await
        .unwrap();
    assert_eq!(reused.invite_code, "REUSE1");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_remove_member_never_removes_owner(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let member = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Crew", owner.id, "CREW02")
        .await
        .unwrap();
    PartyMemberRepo::join(&pool, p.id, member.id, 10).await.unwrap();

    assert!(!PartyMemberRepo::remove_member(&pool, p.id, owner.id).await.unwrap());
    assert!(PartyMemberRepo::remove_member(&pool, p.id, member.id).await.unwrap());
    assert!(PartyMemberRepo::find_role(&pool, p.id, member.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_content_write_is_rejected(pool: PgPool) {
    let owner = common::new_user(&pool).await;
    let p = PartyRepo::create_with_owner(&pool, "Rankers", owner.id, "RANK01")
        .await
        .unwrap();
    let list = PartyListRepo::create(
        &pool,
        p.id,
        owner.id,
        "Season picks",
        party::LIST_TYPE_WATCHLIST,
        &json!({"items": []}),
    )
    .await
    .unwrap();

    let first = PartyListRepo::update_content_if_unchanged(
        &pool,
        p.id,
        list.id,
        &json!({"items": ["a"]}),
        list.updated_at,
    )
    .await
    .unwrap();
    assert!(first.is_some());

    // Second writer still holds the old timestamp.
    let stale = PartyListRepo::update_content_if_unchanged(
        &pool,
        p.id,
        list.id,
        &json!({"items": ["b"]}),
        list.updated_at,
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let current = PartyListRepo::find(&pool, p.id, list.id).await.unwrap().unwrap();
    assert_eq!(current.content, json!({"items": ["a"]}));
}
