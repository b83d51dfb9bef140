//! Integration tests for workouts, exercises and sets.

mod common;

use levelup_core::workout;
use levelup_db::models::workout::{CreateExercise, CreateSet, CreateWorkout};
use levelup_db::repositories::{WorkoutExerciseRepo, WorkoutRepo, WorkoutSetRepo};
use sqlx::PgPool;

fn new_workout(name: &str) -> CreateWorkout {
    CreateWorkout {
        name: name.to_string(),
        notes: None,
        started_at: None,
    }
}

fn new_set(reps: i32, weight_kg: f64) -> CreateSet {
    CreateSet {
        set_number: None,
        reps,
        weight_kg: Some(weight_kg),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_only_once(pool: PgPool) {
    let user = common::new_user(&pool).await;
    let w = WorkoutRepo::create(&pool, user.id, &new_workout("Push day"))
        .await
        .unwrap();
    assert_eq!(w.status, workout::STATUS_IN_PROGRESS);
    assert!(w.completed_at.is_none());

    let done = WorkoutRepo::complete(&pool, user.id, w.id).await.unwrap().unwrap();
    assert_eq!(done.status, workout::STATUS_COMPLETED);
    assert!(done.completed_at.is_some());

    assert!(WorkoutRepo::complete(&pool, user.id, w.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_exercises_and_sets_are_numbered(pool: PgPool) {
    let user = common::new_user(&pool).await;
    let w = WorkoutRepo::create(&pool, user.id, &new_workout("Legs"))
        .await
        .unwrap();

    let squat = WorkoutExerciseRepo::create(
        &pool,
        w.id,
        &CreateExercise {
            name: "Squat".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();
    let lunge = WorkoutExerciseRepo::create(
        &pool,
        w.id,
        &CreateExercise {
            name: "Lunge".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(squat.sort_order, 0);
    assert_eq!(lunge.sort_order, 1);

    let s1 = WorkoutSetRepo::create(&pool, squat.id, &new_set(5, 100.0)).await.unwrap();
    let s2 = WorkoutSetRepo::create(&pool, squat.id, &new_set(5, 105.0)).await.unwrap();
    assert_eq!((s1.set_number, s2.set_number), (1, 2));

    let dup = WorkoutSetRepo::create(
        &pool,
        squat.id,
        &CreateSet {
            set_number: Some(1),
            reps: 3,
            weight_kg: None,
        },
    )
    .await;
    assert!(dup.is_err());

    WorkoutSetRepo::create(&pool, lunge.id, &new_set(10, 20.0)).await.unwrap();
    let all = WorkoutSetRepo::list_for_workout(&pool, w.id).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(WorkoutSetRepo::list_for_exercise(&pool, squat.id).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_cascades_to_sets(pool: PgPool) {
    let user = common::new_user(&pool).await;
    let w = WorkoutRepo::create(&pool, user.id, &new_workout("Pull"))
        .await
        .unwrap();
    let row = WorkoutExerciseRepo::create(
        &pool,
        w.id,
        &CreateExercise {
            name: "Row".to_string(),
            sort_order: None,
        },
    )
    .await
    .unwrap();
    WorkoutSetRepo::create(&pool, row.id, &new_set(8, 60.0)).await.unwrap();

    assert!(WorkoutRepo::delete(&pool, user.id, w.id).await.unwrap());
    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workout_sets")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_scoped_and_paginated(pool: PgPool) {
    let user = common::new_user(&pool).await;
    let other = common::new_user(&pool).await;
    for name in ["A", "B", "C"] {
        WorkoutRepo::create(&pool, user.id, &new_workout(name)).await.unwrap();
    }
    WorkoutRepo::create(&pool, other.id, &new_workout("X")).await.unwrap();

    let page = WorkoutRepo::list_for_user(&pool, user.id, None, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    let rest = WorkoutRepo::list_for_user(&pool, user.id, None, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    let completed = WorkoutRepo::list_for_user(&pool, user.id, Some(workout::STATUS_COMPLETED), 50, 0)
        .await
        .unwrap();
    assert!(completed.is_empty());
}
