// src/utils/jwt.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, error::AppError};

/// Scheme prefix used on issued tokens and expected in `Authorization`.
pub const TOKEN_SCHEME: &str = "JWT";

/// JWT Claims structure. The user id is the only claim.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    pub id: Uuid,
}

/// Signs a token for the user and returns it with the `JWT ` prefix,
/// ready to be echoed back in the `Authorization` header.
pub fn sign_jwt(id: Uuid, secret: &str) -> Result<String, AppError> {
    let token = encode(
        &Header::default(),
        &Claims { id },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(format!("{} {}", TOKEN_SCHEME, token))
}

/// Verifies and decodes a raw JWT string (no scheme prefix).
///
/// Tokens carry no expiry, so validity is purely the signature.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::Forbidden(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extracts the raw token from an `Authorization` value.
/// Accepts `JWT <token>` and `Bearer <token>`.
pub fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    if scheme == TOKEN_SCHEME || scheme.eq_ignore_ascii_case("bearer") {
        Some(token)
    } else {
        None
    }
}

/// Axum Middleware: Authentication.
///
/// Validates the `Authorization: JWT <token>` header and injects `Claims` into the
/// request extensions. Missing or invalid tokens short-circuit with a 403 before the
/// handler runs. The user row is not consulted here.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("No auth token".to_string()))?;

    let token = token_from_header(auth_header)
        .ok_or_else(|| AppError::Forbidden("Malformed authorization header".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret)?;
    tracing::debug!(user_id = %claims.id, "Authenticated request");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_round_trips() {
        let id = Uuid::new_v4();
        let header = sign_jwt(id, "secret").unwrap();
        assert!(header.starts_with("JWT "));

        let token = token_from_header(&header).unwrap();
        assert_eq!(verify_jwt(token, "secret").unwrap(), Claims { id });
    }

    #[test]
    fn wrong_secret_is_forbidden() {
        let header = sign_jwt(Uuid::new_v4(), "secret").unwrap();
        let token = token_from_header(&header).unwrap();
        assert!(matches!(verify_jwt(token, "other"), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn header_schemes() {
        assert_eq!(token_from_header("JWT abc"), Some("abc"));
        assert_eq!(token_from_header("Bearer abc"), Some("abc"));
        assert_eq!(token_from_header("Basic abc"), None);
        assert_eq!(token_from_header("JWT"), None);
        assert_eq!(token_from_header("JWT   "), None);
    }
}
