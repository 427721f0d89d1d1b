use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{Identity, Rule, Session, ValidationError, Violation},
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::ApiResponse,
    state::AppState,
};

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        email,
        full_name,
        password,
    } = payload;

    let mut violations = Vec::new();
    if email.trim().is_empty() {
        violations.push(Violation::new("email", Rule::Required));
    }
    if full_name.trim().is_empty() {
        violations.push(Violation::new("full_name", Rule::Required));
    }
    if password.is_empty() {
        violations.push(Violation::new("password", Rule::Required));
    }

    if !email.trim().is_empty() {
        let exists = Users::find()
            .filter(UserCol::Email.eq(email.as_str()))
            .one(&state.orm)
            .await?;
        if exists.is_some() {
            violations.push(Violation::new("email", Rule::Unique));
        }
    }

    if !violations.is_empty() {
        return Err(ValidationError { violations }.into());
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        full_name: Set(full_name),
        password_hash: Set(password_hash),
        is_admin: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("User created", user_model(user)))
}

/// Both the unknown-email and wrong-password paths collapse into the same
/// `AuthenticationFailed`, so a caller cannot probe which emails exist.
pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::AuthenticationFailed)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::AuthenticationFailed);
    }

    let identity = Identity {
        user_id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        admin: user.is_admin,
    };
    let token = issue_token(&identity, &state.config.jwt_secret)?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
    ))
}

/// Clears the session unconditionally. Calling it while anonymous is fine.
pub async fn logout_user(
    state: &AppState,
    mut session: Session,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if let Some(identity) = session.identity() {
        if let Err(err) = log_audit(
            &state.orm,
            Some(identity.user_id),
            "user_logout",
            Some("users"),
            None,
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }
    }

    session.logout();
    debug_assert!(!session.is_authenticated());

    Ok(ApiResponse::success("Logged out", serde_json::json!({})))
}

fn issue_token(identity: &Identity, secret: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: identity.user_id.to_string(),
        email: identity.email.clone(),
        name: identity.full_name.clone(),
        admin: identity.admin,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub(crate) fn user_model(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        full_name: model.full_name,
        is_admin: model.is_admin,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
