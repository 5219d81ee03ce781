use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{middleware, routing::get, Extension, Router};
use reqkit::config::AuthConfig;
use reqkit::credentials::{check_login, hash_password, LoginError, StoredUser};
use reqkit::token::{authenticate_request, require_auth, AuthContext, AuthFailure, TokenSigner};
use tower::ServiceExt;

fn signer() -> TokenSigner {
    TokenSigner::new(&AuthConfig {
        secret: "integration_test_secret_long_enough_for_hs256".to_string(),
        token_ttl_secs: 3600,
    })
}

async fn stored_user(id: &str, password: &str) -> StoredUser {
    StoredUser {
        id: id.to_string(),
        password_hash: hash_password(password).await.unwrap(),
    }
}

#[tokio::test]
async fn test_login_then_authenticated_request() {
    let signer = signer();
    let user = stored_user("1", "CorrectHorse1!").await;

    // login succeeds and the issued token carries the record id
    let login = check_login("CorrectHorse1!", Some(&user), &signer)
        .await
        .unwrap();
    assert_eq!(login.user_id, "1");

    // a request presenting that token for the same user passes
    let header = format!("Bearer {}", login.token);
    let context = authenticate_request(Some(&header), Some("1"), &signer).unwrap();
    assert_eq!(context.user_id, "1");
}

#[tokio::test]
async fn test_token_for_other_user_is_rejected() {
    let signer = signer();
    let user = stored_user("1", "CorrectHorse1!").await;

    let login = check_login("CorrectHorse1!", Some(&user), &signer)
        .await
        .unwrap();

    let header = format!("Bearer {}", login.token);
    let result = authenticate_request(Some(&header), Some("2"), &signer);
    assert_eq!(result.unwrap_err(), AuthFailure::UserMismatch);
}

#[tokio::test]
async fn test_rejection_paths_stay_distinct() {
    let signer = signer();
    let user = stored_user("1", "CorrectHorse1!").await;

    let missing = check_login("CorrectHorse1!", None, &signer).await;
    assert!(matches!(missing, Err(LoginError::UnknownUser)));

    let wrong = check_login("WrongHorse1!", Some(&user), &signer).await;
    assert!(matches!(wrong, Err(LoginError::WrongPassword)));
}

async fn whoami(Extension(context): Extension<AuthContext>) -> String {
    context.user_id
}

fn protected_app(signer: TokenSigner) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(signer, require_auth))
}

fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = auth {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_middleware_passes_valid_token_and_stashes_identity() {
    let signer = signer();
    let token = signer.sign("1").unwrap();
    let app = protected_app(signer);

    let response = app
        .oneshot(get_request("/whoami", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // the handler echoes the AuthContext inserted by the middleware
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"1");
}

#[tokio::test]
async fn test_middleware_rejects_missing_header() {
    let app = protected_app(signer());

    let response = app.oneshot(get_request("/whoami", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_middleware_rejects_garbage_token() {
    let app = protected_app(signer());

    let response = app
        .oneshot(get_request("/whoami", Some("Bearer not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_middleware_rejects_token_from_other_secret() {
    let other = TokenSigner::new(&AuthConfig {
        secret: "some_other_secret_that_is_also_long_enough".to_string(),
        token_ttl_secs: 3600,
    });
    let token = other.sign("1").unwrap();
    let app = protected_app(signer());

    let response = app
        .oneshot(get_request("/whoami", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_unauthorized() {
    let signer = signer();
    let other = TokenSigner::new(&AuthConfig {
        secret: "some_other_secret_that_is_also_long_enough".to_string(),
        token_ttl_secs: 3600,
    });

    let user = stored_user("1", "CorrectHorse1!").await;
    let login = check_login("CorrectHorse1!", Some(&user), &other)
        .await
        .unwrap();

    let header = format!("Bearer {}", login.token);
    let result = authenticate_request(Some(&header), Some("1"), &signer);
    assert_eq!(result.unwrap_err(), AuthFailure::InvalidToken);
}
