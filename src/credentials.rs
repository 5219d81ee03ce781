use crate::error::ApiError;
use crate::token::TokenSigner;

/// A credential record as loaded from storage.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: String,
    pub password_hash: String,
}

/// Successful login: the record's id plus a signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginToken {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("no matching user record")]
    UnknownUser,

    #[error("password does not match")]
    WrongPassword,

    #[error("credential check failed: {0}")]
    Internal(String),
}

// UnknownUser maps to 404: a missing record is a lookup miss, not a bad
// credential.
impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::UnknownUser => ApiError::NotFound("no matching user record".to_string()),
            LoginError::WrongPassword => ApiError::Unauthorized,
            LoginError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Compares a plaintext password against a stored record and issues a
/// session token on success.
///
/// The three rejection paths are distinct: an absent record, a failed
/// comparison, and an unexpected hashing or signing failure.
pub async fn check_login(
    password: &str,
    stored: Option<&StoredUser>,
    signer: &TokenSigner,
) -> Result<LoginToken, LoginError> {
    let user = stored.ok_or(LoginError::UnknownUser)?;

    let password = password.to_string();
    let hash = user.password_hash.clone();

    // bcrypt is CPU-bound, keep it off the async workers
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
        .await
        .map_err(|err| LoginError::Internal(format!("join error: {}", err)))?
        .map_err(|err| LoginError::Internal(format!("bcrypt error: {}", err)))?;

    if !valid {
        return Err(LoginError::WrongPassword);
    }

    let token = signer
        .sign(&user.id)
        .map_err(|err| LoginError::Internal(err.to_string()))?;

    tracing::debug!(user_id = %user.id, "login succeeded, session token issued");

    Ok(LoginToken {
        user_id: user.id.clone(),
        token,
    })
}

/// Hashes a plaintext password for storage (bcrypt, default cost).
pub async fn hash_password(password: &str) -> Result<String, LoginError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|err| LoginError::Internal(format!("join error: {}", err)))?
        .map_err(|err| LoginError::Internal(format!("bcrypt error: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn test_signer() -> TokenSigner {
        TokenSigner::new(&AuthConfig {
            secret: "test_secret_key_that_is_long_enough_for_hs256".to_string(),
            token_ttl_secs: 3600,
        })
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let result = check_login("whatever", None, &test_signer()).await;
        assert!(matches!(result, Err(LoginError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let hash = hash_password("CorrectHorse1!").await.unwrap();
        let user = StoredUser {
            id: "42".to_string(),
            password_hash: hash,
        };

        let result = check_login("WrongHorse1!", Some(&user), &test_signer()).await;
        assert!(matches!(result, Err(LoginError::WrongPassword)));
    }

    #[tokio::test]
    async fn test_login_success_embeds_user_id() {
        let signer = test_signer();
        let hash = hash_password("CorrectHorse1!").await.unwrap();
        let user = StoredUser {
            id: "42".to_string(),
            password_hash: hash,
        };

        let login = check_login("CorrectHorse1!", Some(&user), &signer)
            .await
            .unwrap();
        assert_eq!(login.user_id, "42");

        let claims = signer.verify(&login.token).unwrap();
        assert_eq!(claims.sub, "42");
    }

    #[tokio::test]
    async fn test_login_garbage_hash_is_internal() {
        let user = StoredUser {
            id: "42".to_string(),
            password_hash: "not a bcrypt hash".to_string(),
        };

        let result = check_login("CorrectHorse1!", Some(&user), &test_signer()).await;
        assert!(matches!(result, Err(LoginError::Internal(_))));
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            ApiError::from(LoginError::UnknownUser),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(LoginError::WrongPassword),
            ApiError::Unauthorized
        ));
    }
}
