mod common;

use common::{TEST_APP_ID, memory_service, test_app};
use sso::auth::AuthErrorKind;
use sso::auth::token::verify_token;
use sso::store::UserStore;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[tokio::test]
async fn register_then_login_issues_token() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    let user_id = auth
        .register_new_user("alice@example.com", "correct horse")
        .await
        .expect("register");
    assert!(user_id > 0);

    let token = auth
        .login("alice@example.com", "correct horse", TEST_APP_ID)
        .await
        .expect("login");
    assert!(!token.is_empty());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    auth.register_new_user("bob@example.com", "pw-one")
        .await
        .expect("first");
    let err = auth
        .register_new_user("bob@example.com", "pw-two")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::UserAlreadyExists);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    auth.register_new_user("carol@example.com", "right")
        .await
        .expect("register");

    let wrong_password = auth
        .login("carol@example.com", "wrong", TEST_APP_ID)
        .await
        .unwrap_err();
    let unknown_email = auth
        .login("nobody@example.com", "right", TEST_APP_ID)
        .await
        .unwrap_err();
    assert_eq!(wrong_password.kind(), AuthErrorKind::InvalidCredentials);
    assert_eq!(unknown_email.kind(), AuthErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn token_claims_match_user_and_app() {
    let ttl = Duration::from_secs(900);
    let (_store, auth) = memory_service(ttl);
    let user_id = auth
        .register_new_user("dave@example.com", "pw")
        .await
        .expect("register");

    let issued_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64;
    let token = auth
        .login("dave@example.com", "pw", TEST_APP_ID)
        .await
        .expect("login");

    let claims = verify_token(&test_app(), &token, 0).expect("verify");
    assert_eq!(claims.uid, user_id);
    assert_eq!(claims.email, "dave@example.com");
    assert_eq!(claims.app_id, TEST_APP_ID);
    let expected_exp = issued_at + ttl.as_secs() as i64;
    assert!(
        (claims.exp - expected_exp).abs() <= 1,
        "exp {} not within 1s of {}",
        claims.exp,
        expected_exp
    );
}

#[tokio::test]
async fn admin_flag_defaults_false_and_unknown_user_is_reported() {
    let (store, auth) = memory_service(Duration::from_secs(3600));
    let user_id = auth
        .register_new_user("erin@example.com", "pw")
        .await
        .expect("register");
    assert!(!auth.is_admin(user_id).await.expect("is_admin"));

    store.set_admin(user_id, true).await.expect("promote");
    assert!(auth.is_admin(user_id).await.expect("is_admin"));

    let err = auth.is_admin(user_id + 1000).await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::UserNotFound);
}

#[tokio::test]
async fn unknown_app_is_only_reported_after_valid_credentials() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    auth.register_new_user("frank@example.com", "pw")
        .await
        .expect("register");

    let err = auth
        .login("frank@example.com", "pw", 4242)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::AppNotFound);

    let err = auth
        .login("frank@example.com", "not-pw", 4242)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_have_one_winner() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    let auth = Arc::new(auth);

    let mut handles = Vec::new();
    for attempt in 0..8 {
        let auth = auth.clone();
        handles.push(tokio::spawn(async move {
            auth.register_new_user("grace@example.com", &format!("pw-{attempt}"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err.kind(), AuthErrorKind::UserAlreadyExists),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn stored_password_is_a_bcrypt_hash() {
    let (store, auth) = memory_service(Duration::from_secs(3600));
    auth.register_new_user("heidi@example.com", "plain-text")
        .await
        .expect("register");
    let user = store
        .find_user_by_email("heidi@example.com")
        .await
        .expect("user");
    let hash = String::from_utf8(user.password_hash).expect("utf8");
    assert!(hash.starts_with("$2"));
    assert!(!hash.contains("plain-text"));
}

#[tokio::test]
async fn corrupt_stored_hash_is_a_hashing_failure() {
    let (store, auth) = memory_service(Duration::from_secs(3600));
    store
        .save_user("ivan@example.com", b"not-a-bcrypt-hash")
        .await
        .expect("seed");
    let err = auth
        .login("ivan@example.com", "pw", TEST_APP_ID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::HashingFailed);
}

#[tokio::test]
async fn empty_app_secret_fails_signing() {
    let (store, auth) = memory_service(Duration::from_secs(3600));
    store
        .insert_app(sso::model::App {
            id: 9,
            name: "unsigned".to_string(),
            secret: Vec::new(),
        })
        .await;
    auth.register_new_user("judy@example.com", "pw")
        .await
        .expect("register");
    let err = auth.login("judy@example.com", "pw", 9).await.unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::TokenSigningFailed);
}

#[tokio::test]
async fn long_passwords_cannot_share_a_prefix() {
    let (_store, auth) = memory_service(Duration::from_secs(3600));
    let prefix = "a".repeat(72);

    let err = auth
        .register_new_user("kim@example.com", &format!("{prefix}REAL-SUFFIX"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::HashingFailed);

    auth.register_new_user("kim@example.com", &prefix)
        .await
        .expect("72 bytes registers");
    let err = auth
        .login("kim@example.com", &format!("{prefix}totally-different"), TEST_APP_ID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn unrepresentable_ttl_fails_signing_without_panicking() {
    let (_store, auth) = memory_service(Duration::from_secs(i64::MAX as u64));
    auth.register_new_user("lou@example.com", "pw")
        .await
        .expect("register");
    let err = auth
        .login("lou@example.com", "pw", TEST_APP_ID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuthErrorKind::TokenSigningFailed);
}
