//! Auth Middleware
//!
//! Gate for protected routes. Attach with
//! `axum::middleware::from_fn_with_state(gate, require_auth::<R>)`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::client::bearer_token;

use crate::application::{AuthenticateUseCase, TokenIssuer};
use crate::domain::repository::{AdminRepository, UserRepository};
use crate::error::AuthError;

/// Middleware state shared by every gated router
#[derive(Clone)]
pub struct AuthGate<R>
where
    R: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenIssuer>,
}

impl<R> AuthGate<R>
where
    R: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>) -> Self {
        Self { repo, tokens }
    }

    fn use_case(&self) -> AuthenticateUseCase<R> {
        AuthenticateUseCase::new(self.repo.clone(), self.tokens.clone())
    }
}

fn bearer(req: &Request) -> Option<String> {
    bearer_token(req.headers()).map(str::to_owned)
}

/// Reject unless the bearer token belongs to an active user
pub async fn require_auth<R>(
    State(gate): State<AuthGate<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let token = bearer(&req);
    let ctx = gate.use_case().execute(token.as_deref()).await?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Attach the caller's identity when a valid token is present; never rejects
pub async fn optional_auth<R>(
    State(gate): State<AuthGate<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = bearer(&req) {
        match gate.use_case().execute(Some(&token)).await {
            Ok(ctx) => {
                req.extensions_mut().insert(ctx);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credential on optional route");
            }
        }
    }

    next.run(req).await
}

/// Reject unless the caller is an active administrator
pub async fn require_admin<R>(
    State(gate): State<AuthGate<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let token = bearer(&req);
    let ctx = gate.use_case().execute_admin(token.as_deref()).await?;

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
