// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

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

/// Role claim carried by privileged backend tokens.
pub const SERVICE_ROLE: &str = "service_role";

/// Claims of an access token issued by the external auth provider.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user's UUID.
    pub sub: String,

    /// Expiration time as Unix timestamp.
    pub exp: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// e.g. 'authenticated' or 'service_role'.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::AuthError("Invalid subject".to_string()))
    }

    pub fn is_service_role(&self) -> bool {
        self.role.as_deref() == Some(SERVICE_ROLE)
    }
}

/// Signs a token the same way the auth provider does (HS256).
/// Only used for tooling and tests; production tokens come from the provider.
pub fn sign_jwt(
    user_id: Uuid,
    role: &str,
    audience: Option<&str>,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs()
        + expiration_seconds;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration as usize,
        aud: audience.map(str::to_owned),
        role: Some(role.to_owned()),
        email: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// The audience is checked only when one is configured.
pub fn verify_jwt(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::AuthError("Invalid token".to_string())
    })?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and injects `Claims`
/// into the request extensions. Missing or invalid tokens get a 401.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret, config.jwt_audience.as_deref())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: service-role authorization.
///
/// Must run AFTER `auth_middleware`.
pub async fn service_role_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    if !claims.is_service_role() {
        return Err(AppError::Forbidden("Service role required".to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_verify_accepts_matching_audience() {
        let user = Uuid::new_v4();
        let token = sign_jwt(user, "authenticated", Some("authenticated"), SECRET, 60).unwrap();

        let claims = verify_jwt(&token, SECRET, Some("authenticated")).unwrap();
        assert_eq!(claims.user_id().unwrap(), user);
        assert!(!claims.is_service_role());
    }

    #[test]
    fn test_verify_rejects_wrong_secret_and_audience() {
        let token = sign_jwt(Uuid::new_v4(), "authenticated", Some("authenticated"), SECRET, 60)
            .unwrap();

        assert!(verify_jwt(&token, "other-secret", Some("authenticated")).is_err());
        assert!(verify_jwt(&token, SECRET, Some("somebody-else")).is_err());
    }

    #[test]
    fn test_audience_check_can_be_disabled() {
        let token = sign_jwt(Uuid::new_v4(), SERVICE_ROLE, None, SECRET, 60).unwrap();
        let claims = verify_jwt(&token, SECRET, None).unwrap();
        assert!(claims.is_service_role());
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: "42".into(),
            exp: 0,
            aud: None,
            role: None,
            email: None,
        };
        assert!(matches!(claims.user_id(), Err(AppError::AuthError(_))));
    }
}
