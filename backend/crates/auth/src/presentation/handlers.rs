//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::validation::ValidatedJson;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthContext, CurrentUserUseCase, RefreshTokenUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, SignUpInput, SignUpUseCase, TokenIssuer,
};
use crate::domain::repository::{AdminRepository, AuthSessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    CurrentUserResponse, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    RefreshResponse, RegisterRequest, RegisterResponse,
};
use crate::presentation::extract::ClientIp;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        SignUpUseCase::new(state.repo.clone(), state.tokens.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            email: req.email,
            user_name: req.username,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user: (&output.user).into(),
            token: output.token,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
            // Already checked by the rule set
            platform: req
                .platform
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            device_info: req.device_info,
            ip_address: ip.map(|ip| ip.to_string()),
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        user: (&output.user).into(),
        token: output.token,
        session_token: output.session_token,
        platform: output.platform,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// The body is optional; an unreadable body counts as "no session token".
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthContext,
    body: Bytes,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let req: LogoutRequest = serde_json::from_slice(&body).unwrap_or_default();

    let use_case = SignOutUseCase::new(state.repo.clone());
    use_case
        .execute(auth.user_id, req.session_token.as_deref())
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout successful",
    }))
}

// ============================================================================
// Current user / Refresh
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthContext,
) -> AuthResult<Json<CurrentUserResponse>>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .execute(auth.user_id)
        .await?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthContext,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token = RefreshTokenUseCase::new(state.repo.clone(), state.tokens.clone())
        .execute(auth.user_id)
        .await?;

    Ok(Json(RefreshResponse {
        message: "Token refreshed successfully",
        token,
    }))
}
