//! In-memory repositories for router tests
//!
//! Mirrors the store's uniqueness constraints so duplicate handling can be
//! exercised without PostgreSQL.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::UserId;

use crate::domain::entity::{AuthSession, User};
use crate::domain::repository::{AdminRepository, AuthSessionRepository, UserRepository};
use crate::domain::value_object::{Email, UserName};
use crate::error::AuthResult;

#[derive(Default)]
struct State {
    users: Vec<User>,
    admins: HashSet<UserId>,
    sessions: Vec<AuthSession>,
}

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `user_id` as an administrative account
    pub fn grant_admin(&self, user_id: UserId) {
        self.lock().admins.insert(user_id);
    }

    pub fn set_active(&self, user_id: UserId, active: bool) {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.user_id == user_id) {
            user.is_active = active;
        }
    }

    pub fn remove_user(&self, user_id: UserId) {
        self.lock().users.retain(|u| u.user_id != user_id);
    }

    pub fn user(&self, user_id: UserId) -> Option<User> {
        self.lock().users.iter().find(|u| u.user_id == user_id).cloned()
    }

    pub fn sessions(&self) -> Vec<AuthSession> {
        self.lock().sessions.clone()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|u| u.email == user.email || u.user_name == user.user_name)
        {
            return Err(AppError::duplicate("A record with this value already exists").into());
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.user(user_id))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.lock().users.iter().any(|u| &u.email == email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.lock().users.iter().any(|u| &u.user_name == user_name))
    }

    async fn touch(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.user_id == user_id) {
            user.updated_at = at;
        }
        Ok(())
    }
}

impl AdminRepository for MemoryAuthRepository {
    async fn is_active_admin(&self, user_id: UserId) -> AuthResult<bool> {
        let state = self.lock();
        Ok(state.admins.contains(&user_id)
            && state
                .users
                .iter()
                .any(|u| u.user_id == user_id && u.is_active))
    }
}

impl AuthSessionRepository for MemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.lock().sessions.push(session.clone());
        Ok(())
    }

    async fn deactivate(&self, user_id: UserId, session_token: &str) -> AuthResult<u64> {
        let mut count = 0;
        for session in self.lock().sessions.iter_mut().filter(|s| {
            s.user_id == user_id && s.session_token == session_token && s.is_active
        }) {
            session.is_active = false;
            count += 1;
        }
        Ok(count)
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut count = 0;
        for session in self
            .lock()
            .sessions
            .iter_mut()
            .filter(|s| s.is_active && s.is_expired_at(now))
        {
            session.is_active = false;
            count += 1;
        }
        Ok(count)
    }
}
