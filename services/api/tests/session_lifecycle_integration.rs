//! Integration tests for the session lifecycle and owner-scoped saves
//!
//! These tests verify the invariants that live in the database: a re-login
//! supersedes the previous token, logout revokes an unexpired token, and
//! save slots are only ever visible to their owner. They require a
//! reachable PostgreSQL instance (`DATABASE_URL`, with the usual local
//! default).

use api::jwt::{TokenConfig, TokenService};
use api::models::{SaveProgressRequest, SignupRequest, User};
use api::repositories::{DuplicateUsername, ProgressRepository, UserRepository};
use common::database::{DatabaseConfig, init_pool};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

async fn setup() -> Result<(PgPool, TokenService), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;
    sqlx::migrate!().run(&pool).await?;

    let token_service = TokenService::new(TokenConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    });

    Ok((pool, token_service))
}

fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// Sign up a fresh user and establish a session, the way the sign-up
/// handler does: create, issue, persist the token, then hand it out.
async fn signup(
    users: &UserRepository,
    tokens: &TokenService,
    prefix: &str,
) -> Result<(User, String), Box<dyn std::error::Error>> {
    let user = users
        .create(&SignupRequest {
            username: unique_username(prefix),
            password: "correct horse".to_string(),
            adventurer_name: "Zel".to_string(),
        })
        .await?;

    let token = tokens.issue(user.id, &user.username)?;
    users.set_token(user.id, Some(&token)).await?;

    Ok((user, token))
}

#[tokio::test]
async fn relogin_supersedes_previous_token() -> Result<(), Box<dyn std::error::Error>> {
    let (pool, tokens) = setup().await?;
    let users = UserRepository::new(pool);

    let (user, first_token) = signup(&users, &tokens, "relogin").await?;
    assert!(users.token_matches(user.id, &first_token).await?);

    // Re-login: a fresh token replaces the stored one
    let second_token = tokens.issue(user.id, &user.username)?;
    users.set_token(user.id, Some(&second_token)).await?;

    // The first token is still statelessly valid but no longer the stored
    // one, so the gate's composite check now rejects it
    assert!(tokens.verify(&first_token).is_ok());
    assert!(!users.token_matches(user.id, &first_token).await?);
    assert!(users.token_matches(user.id, &second_token).await?);

    Ok(())
}

#[tokio::test]
async fn logout_revokes_unexpired_token() -> Result<(), Box<dyn std::error::Error>> {
    let (pool, tokens) = setup().await?;
    let users = UserRepository::new(pool);

    let (user, token) = signup(&users, &tokens, "logout").await?;
    assert!(users.token_matches(user.id, &token).await?);

    users.set_token(user.id, None).await?;

    // Far from its natural expiry, yet revoked
    assert!(tokens.verify(&token).is_ok());
    assert!(!users.token_matches(user.id, &token).await?);

    // Clearing an already-clear token is a no-op
    users.set_token(user.id, None).await?;
    assert!(!users.token_matches(user.id, &token).await?);

    Ok(())
}

#[tokio::test]
async fn delete_is_scoped_to_the_owner() -> Result<(), Box<dyn std::error::Error>> {
    let (pool, tokens) = setup().await?;
    let users = UserRepository::new(pool.clone());
    let progress = ProgressRepository::new(pool);

    let (owner, _) = signup(&users, &tokens, "owner").await?;
    let (intruder, _) = signup(&users, &tokens, "intruder").await?;

    let slot = progress
        .create(
            owner.id,
            &SaveProgressRequest {
                story_id: 1,
                chapter_id: 2,
                game_state: json!({"hp": 10}),
                inventory: json!(["lantern"]),
                save_name: "slot1".to_string(),
            },
        )
        .await?;

    // Someone else's slot answers exactly like a missing one
    assert!(!progress.delete(intruder.id, slot.id).await?);

    // And the owner's row is untouched
    let latest = progress.find_latest(owner.id).await?.unwrap();
    assert_eq!(latest.id, slot.id);

    assert!(progress.delete(owner.id, slot.id).await?);
    assert!(progress.find_latest(owner.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn latest_save_is_per_owner_and_most_recent() -> Result<(), Box<dyn std::error::Error>> {
    let (pool, tokens) = setup().await?;
    let users = UserRepository::new(pool.clone());
    let progress = ProgressRepository::new(pool);

    let (alice, _) = signup(&users, &tokens, "alice").await?;
    let (bob, _) = signup(&users, &tokens, "bob").await?;

    progress
        .create(
            alice.id,
            &SaveProgressRequest {
                story_id: 1,
                chapter_id: 1,
                game_state: json!({}),
                inventory: json!([]),
                save_name: "slot1".to_string(),
            },
        )
        .await?;
    let newer = progress
        .create(
            alice.id,
            &SaveProgressRequest {
                story_id: 1,
                chapter_id: 3,
                game_state: json!({}),
                inventory: json!([]),
                save_name: "slot2".to_string(),
            },
        )
        .await?;

    let latest = progress.find_latest(alice.id).await?.unwrap();
    assert_eq!(latest.id, newer.id);
    assert_eq!(latest.save_name, "slot2");
    assert_eq!(latest.user_id, alice.id);

    // A user with no saves sees nothing, not a neighbour's slot
    assert!(progress.find_latest(bob.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_username_and_wrong_password_fail() -> Result<(), Box<dyn std::error::Error>> {
    let (pool, tokens) = setup().await?;
    let users = UserRepository::new(pool);

    let (user, _) = signup(&users, &tokens, "dup").await?;

    let err = users
        .create(&SignupRequest {
            username: user.username.clone(),
            password: "another pass".to_string(),
            adventurer_name: "Imposter".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<DuplicateUsername>().is_some());

    assert!(users.verify_password(&user, "correct horse").await?);
    assert!(!users.verify_password(&user, "wrong").await?);

    Ok(())
}
