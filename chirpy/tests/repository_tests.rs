//! Postgres adapter tests. Each test runs against a throwaway database and
//! returns early when `DATABASE_URL` is unset.

mod common;

use auth::CredentialStore;
use auth::RefreshToken;
use auth::RefreshTokenRepository;
use chirpy::chirp::errors::ChirpError;
use chirpy::chirp::models::Chirp;
use chirpy::chirp::models::ChirpBody;
use chirpy::chirp::models::ChirpId;
use chirpy::chirp::ports::ChirpRepository;
use chirpy::repositories::PostgresChirpRepository;
use chirpy::repositories::PostgresRefreshTokenRepository;
use chirpy::repositories::PostgresUserRepository;
use chirpy::user::errors::UserError;
use chirpy::user::models::EmailAddress;
use chirpy::user::models::User;
use chirpy::user::models::UserId;
use chirpy::user::ports::UserRepository;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use common::TestDb;

fn user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn chirp(author: UserId, body: &str, created_at: DateTime<Utc>) -> Chirp {
    Chirp {
        id: ChirpId::new(),
        body: ChirpBody::new(body.to_string()).unwrap(),
        user_id: author,
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
async fn test_refresh_token_lifecycle() {
    let Some(db) = TestDb::from_env().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());
    let tokens = PostgresRefreshTokenRepository::new(db.pool.clone());

    let owner = users.create(user("owner@example.com")).await.unwrap();
    let token = RefreshToken::generate(owner.id.0);
    tokens.insert(&token).await.expect("Failed to insert token");

    let found = tokens.find(&token.token).await.unwrap().expect("Token missing");
    assert_eq!(found.user_id, owner.id.0);
    assert!(found.revoked_at.is_none());

    let first = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let second = first + Duration::hours(1);

    assert!(tokens.revoke(&token.token, first).await.unwrap());
    // Second revoke succeeds and keeps the first timestamp
    assert!(tokens.revoke(&token.token, second).await.unwrap());

    let revoked = tokens.find(&token.token).await.unwrap().expect("Token missing");
    assert_eq!(revoked.revoked_at, Some(first));

    assert!(!tokens.revoke("unknown", second).await.unwrap());
    assert!(tokens.find("unknown").await.unwrap().is_none());

    // Primary key rejects a duplicate token
    assert!(tokens.insert(&token).await.is_err());

    db.drop_database().await;
}

#[tokio::test]
async fn test_user_email_uniqueness() {
    let Some(db) = TestDb::from_env().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());

    let first = users.create(user("nicola@example.com")).await.unwrap();

    let duplicate = users.create(user("nicola@example.com")).await;
    assert!(matches!(duplicate, Err(UserError::EmailAlreadyExists(_))));

    let second = users.create(user("walt@example.com")).await.unwrap();
    let mut renamed = second.clone();
    renamed.email = first.email.clone();
    let conflict = users.update(renamed).await;
    assert!(matches!(conflict, Err(UserError::EmailAlreadyExists(_))));

    let missing = users.update(user("ghost@example.com")).await;
    assert!(matches!(missing, Err(UserError::NotFound(_))));

    db.drop_database().await;
}

#[tokio::test]
async fn test_user_lookups() {
    let Some(db) = TestDb::from_env().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());

    let created = users.create(user("nicola@example.com")).await.unwrap();

    let found = users.find_by_id(&created.id).await.unwrap().expect("User missing");
    assert_eq!(found.email, created.email);
    assert_eq!(found.password_hash, created.password_hash);
    assert!(users.find_by_id(&UserId::new()).await.unwrap().is_none());

    let credentials = users
        .find_by_email("nicola@example.com")
        .await
        .unwrap()
        .expect("Credentials missing");
    assert_eq!(credentials.user_id, created.id.0);
    assert_eq!(credentials.password_hash, created.password_hash);
    assert!(users.find_by_email("nobody@example.com").await.unwrap().is_none());

    db.drop_database().await;
}

#[tokio::test]
async fn test_chirps_listed_oldest_first() {
    let Some(db) = TestDb::from_env().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());
    let chirps = PostgresChirpRepository::new(db.pool.clone());

    let author = users.create(user("nicola@example.com")).await.unwrap();
    let now = Utc::now();

    chirps.create(chirp(author.id, "newest", now)).await.unwrap();
    chirps
        .create(chirp(author.id, "oldest", now - Duration::hours(2)))
        .await
        .unwrap();
    chirps
        .create(chirp(author.id, "middle", now - Duration::hours(1)))
        .await
        .unwrap();

    let listed: Vec<String> = chirps
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(|c| c.body.as_str().to_string())
        .collect();
    assert_eq!(listed, vec!["oldest", "middle", "newest"]);

    db.drop_database().await;
}

#[tokio::test]
async fn test_chirp_delete_and_cascade() {
    let Some(db) = TestDb::from_env().await else {
        return;
    };
    let users = PostgresUserRepository::new(db.pool.clone());
    let chirps = PostgresChirpRepository::new(db.pool.clone());

    let author = users.create(user("nicola@example.com")).await.unwrap();
    let kept = chirps.create(chirp(author.id, "kept", Utc::now())).await.unwrap();
    let gone = chirps.create(chirp(author.id, "gone", Utc::now())).await.unwrap();

    chirps.delete(&gone.id).await.expect("Failed to delete");
    assert!(chirps.find_by_id(&gone.id).await.unwrap().is_none());
    assert!(matches!(
        chirps.delete(&gone.id).await,
        Err(ChirpError::NotFound(_))
    ));
    assert!(chirps.find_by_id(&kept.id).await.unwrap().is_some());

    // Deleting users removes their chirps through the foreign key
    assert_eq!(users.delete_all().await.unwrap(), 1);
    assert!(chirps.list_all().await.unwrap().is_empty());

    db.drop_database().await;
}
