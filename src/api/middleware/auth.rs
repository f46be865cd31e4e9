//! JWT authentication middleware.
//!
//! Tokens are issued by an external identity provider; this side only
//! verifies them and turns the claims into a `Principal` for the
//! service layer.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{Config, BEARER_TOKEN_PREFIX};
use crate::domain::{Principal, UserRole};
use crate::errors::{AppError, AppResult};

/// JWT claims carried by tokens from the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Expiration timestamp
    pub exp: usize,
}

/// Verifies bearer tokens against the shared signing secret.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &Config) -> Self {
        Self::from_secret(config.jwt_secret_bytes())
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Decode and validate a token, returning its claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// The principal handed to service operations.
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.token_verifier.verify(token)?;

    // A token carrying an unknown role never maps to a principal
    let role = UserRole::parse(&claims.role).ok_or(AppError::Unauthorized)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        role,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn verifier(secret: &str) -> TokenVerifier {
        TokenVerifier::from_secret(secret.as_bytes())
    }

    fn token(secret: &str, role: &str, exp: usize) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            role: role.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn valid_token_round_trips() {
        let claims = verifier("secret").verify(&token("secret", "donor", future_exp())).unwrap();
        assert_eq!(claims.role, "donor");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        assert!(verifier("secret").verify(&token("other", "donor", future_exp())).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = (chrono::Utc::now().timestamp() - 3600) as usize;
        assert!(verifier("secret").verify(&token("secret", "donor", expired)).is_err());
    }
}
