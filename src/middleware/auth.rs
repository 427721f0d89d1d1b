//! Bearer-token extraction. Handlers that require a caller take [`Identity`]
//! as a parameter; handlers that merely behave differently when someone is
//! logged in take [`Session`], which never rejects.

use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{
    domain::{Identity, Session},
    dto::auth::Claims,
    error::AppError,
    state::AppState,
};

pub fn ensure_admin(identity: &Identity) -> Result<(), AppError> {
    if !identity.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn identity_from_parts(
    parts: &axum::http::request::Parts,
    secret: &str,
) -> Result<Identity, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::InvalidArgument("Missing Authorization header".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::InvalidArgument("Invalid Authorization header".into()))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(AppError::InvalidArgument("Invalid Authorization scheme".into()));
    }
    let token = auth_str.trim_start_matches("Bearer ").trim();

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthenticationFailed)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::InvalidArgument("Invalid user id in token".into()))?;

    Ok(Identity {
        user_id,
        email: decoded.claims.email.clone(),
        full_name: decoded.claims.name.clone(),
        admin: decoded.claims.admin,
    })
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts, &state.config.jwt_secret)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = std::convert::Infallible;

    // Absent or invalid credentials are simply an anonymous session.
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut session = Session::default();
        if let Ok(identity) = identity_from_parts(parts, &state.config.jwt_secret) {
            session.login(identity);
        }
        Ok(session)
    }
}
