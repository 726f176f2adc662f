use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::auth::{AuthError, Principal};
use crate::config::AuthConfig;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, User};

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct AccountService<U> {
    repo: U,
    auth: AuthConfig,
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(repo: U, auth: AuthConfig) -> Self {
        Self { repo, auth }
    }

    pub fn register(&self, registration: Registration, role: Role) -> Result<Session, DomainError> {
        let name = registration.name.trim().to_string();
        let email = normalize_email(&registration.email);
        if name.is_empty() {
            return Err(DomainError::validation("Missing required field: name"));
        }
        if email.is_empty() {
            return Err(DomainError::validation("Missing required field: email"));
        }
        if registration.password.is_empty() {
            return Err(DomainError::validation("Missing required field: password"));
        }

        // The unique index on email is authoritative; this only gives the
        // common case a cheap answer.
        if self.repo.find_by_email(&email)?.is_some() {
            return Err(DomainError::validation("User already exists"));
        }

        let password_hash = hash_password(&registration.password)?;
        let id = self.repo.create(NewUser {
            name,
            email: email.clone(),
            password_hash,
            role,
        })?;
        let user = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::Internal(format!("user {id} vanished after insert")))?;

        log::info!("Registered {} account {}", role, id);
        self.session_for(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .repo
            .find_by_email(&normalize_email(email))?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            log::warn!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }
        self.session_for(user)
    }

    /// Loads the account behind a verified principal.
    pub fn current_user(&self, principal: &Principal) -> Result<User, DomainError> {
        let id = principal.require_user_id()?;
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("User not found"))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repo.find_by_email(&normalize_email(email))
    }

    fn session_for(&self, user: User) -> Result<Session, DomainError> {
        let token = issue_token(user.id, &user.email, user.role, &self.auth)?;
        Ok(Session { token, user })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
