use crate::config::AuthConfig;
use crate::error::ApiResult;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub iat: usize,  // Issued at
    pub exp: usize,  // Expiration time
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("system clock is before the unix epoch")]
    Clock,
}

/// Why a request failed authentication. Response writing stays with the
/// caller; every variant maps to a 401 at the HTTP boundary.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken,
    UserMismatch,
}

/// Identity established by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
}

impl AuthContext {
    /// Checks a caller-asserted user id against the token's subject.
    pub fn assert_user(&self, claimed: &str) -> Result<(), AuthFailure> {
        if claimed == self.user_id {
            Ok(())
        } else {
            Err(AuthFailure::UserMismatch)
        }
    }
}

/// Signs and verifies HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.secret.as_ref()),
            validation,
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issues a token embedding `user_id` with the configured expiry.
    pub fn sign(&self, user_id: &str) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TokenError::Clock)?
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now as usize,
            exp: (now + self.token_ttl_secs) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        // decode accepts exp == now; the boundary counts as expired here,
        // so a zero-TTL token is never valid
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or(0);
        if data.claims.exp <= now {
            return Err(jsonwebtoken::errors::ErrorKind::ExpiredSignature.into());
        }

        Ok(data.claims)
    }
}

/// Authenticates a request from its `Authorization` header.
///
/// When `expected_user` is given it must match the token's subject; this
/// covers handlers where the body asserts an identity of its own.
pub fn authenticate_request(
    auth_header: Option<&str>,
    expected_user: Option<&str>,
    signer: &TokenSigner,
) -> Result<AuthContext, AuthFailure> {
    let header = auth_header.ok_or(AuthFailure::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthFailure::MissingToken)?;

    let claims = signer.verify(token).map_err(|err| {
        tracing::debug!("token verification failed: {}", err);
        AuthFailure::InvalidToken
    })?;

    let context = AuthContext {
        user_id: claims.sub,
    };

    if let Some(expected) = expected_user {
        context.assert_user(expected)?;
    }

    Ok(context)
}

/// Extract and validate the bearer token from the Authorization header.
///
/// On success the [`AuthContext`] is stored in request extensions for the
/// downstream handler; any failure becomes a 401 response.
pub async fn require_auth(
    State(signer): State<TokenSigner>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let context = authenticate_request(auth_header, None, &signer)?;

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}
