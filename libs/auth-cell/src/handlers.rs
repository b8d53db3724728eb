// libs/auth-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use shared_database::AppState;
use shared_models::auth::{AuthUser, Role, TokenResponse, UserOut};
use shared_models::error::AppError;
use shared_utils::jwt::{claims_for, issue_token};
use shared_utils::password::{hash_password, verify_password};

use crate::models::{LoginRequest, RegisterRequest, UserRow};

const TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

fn user_out(row: &UserRow, role: Role) -> UserOut {
    UserOut {
        id: row.id,
        email: row.email.clone(),
        username: row.username.clone(),
        role,
        created_at: row.created_at,
    }
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), AppError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::ValidationError("A valid email is required".to_string()));
    }
    if request.username.trim().is_empty() {
        return Err(AppError::ValidationError("username is required".to_string()));
    }
    if request.password.len() < 8 {
        return Err(AppError::ValidationError(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let role = request.role.unwrap_or(Role::Patient);
    let password_hash = hash_password(&request.password).map_err(AppError::Internal)?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, username, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(request.email.trim())
    .bind(request.username.trim())
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AppError::Conflict("Email or username already registered".to_string())
        }
        _ => AppError::Database(e.to_string()),
    })?;

    info!("Registered {} account {}", role, row.id);
    Ok((StatusCode::CREATED, Json(user_out(&row, role))))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Login attempt for {}", request.email);

    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(request.email.trim())
        .fetch_optional(&state.db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // Same answer whether the account is missing or the password is wrong.
    let Some(row) = row else {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    };
    if !verify_password(&request.password, &row.password_hash) {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let role = Role::parse(&row.role)
        .ok_or_else(|| AppError::Internal(format!("unknown role in store: {}", row.role)))?;

    let user = AuthUser {
        id: row.id,
        email: row.email.clone(),
        role,
    };
    let token = issue_token(&claims_for(&user, TOKEN_TTL_SECS), &state.config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        email: row.email,
    }))
}

#[axum::debug_handler]
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
