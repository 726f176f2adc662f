//! One authorization check for every protected surface.
//!
//! A request may present a signed user token, the static admin PIN, or
//! both. [`AuthGate::authorize`] turns whatever was presented into a
//! [`Principal`] carrying a role; the API handlers and the admin page guard
//! both go through it.

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::user::Role;

use super::token;
use super::AuthError;

/// Raw credentials as found on a request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub token: Option<String>,
    pub admin_pin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// `None` for callers admitted by PIN alone.
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_user_id(&self) -> Result<Uuid, AuthError> {
        self.user_id.ok_or(AuthError::UserRequired)
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    config: AuthConfig,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// A valid token wins. Otherwise a matching PIN admits an admin.
    pub fn authorize(&self, credentials: &Credentials) -> Result<Principal, AuthError> {
        let token_result = credentials
            .token
            .as_deref()
            .map(|raw| self.verify_token(raw));

        if let Some(Ok(principal)) = token_result {
            return Ok(principal);
        }

        if let Some(pin) = credentials.admin_pin.as_deref() {
            return self
                .verify_pin(pin)
                .map_err(|e| token_result.and_then(Result::err).unwrap_or(e));
        }

        match token_result {
            Some(Err(e)) => Err(e),
            _ => Err(AuthError::MissingCredentials),
        }
    }

    /// Like [`authorize`](Self::authorize) but also demands `role`. A shopper
    /// token that falls short of admin still passes with a valid PIN. A role
    /// mismatch is reported as unauthorized.
    pub fn require(&self, credentials: &Credentials, role: Role) -> Result<Principal, AuthError> {
        let principal = self.authorize(credentials)?;
        match (role, principal.role) {
            (Role::Admin, Role::User) => credentials
                .admin_pin
                .as_deref()
                .ok_or(AuthError::AdminRequired)
                .and_then(|pin| self.verify_pin(pin))
                .map_err(|_| AuthError::AdminRequired),
            _ => Ok(principal),
        }
    }

    fn verify_pin(&self, pin: &str) -> Result<Principal, AuthError> {
        match self.config.admin_pin.as_deref() {
            Some(expected) if expected == pin => Ok(Principal {
                user_id: None,
                email: None,
                role: Role::Admin,
            }),
            _ => Err(AuthError::InvalidPin),
        }
    }

    fn verify_token(&self, raw: &str) -> Result<Principal, AuthError> {
        let claims = token::decode_token(raw, &self.config)?;
        Ok(Principal {
            user_id: Some(claims.user_id()?),
            email: Some(claims.email),
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::issue_token;

    fn gate() -> AuthGate {
        let mut config = AuthConfig::new("gate-secret");
        config.admin_pin = Some("admin123".into());
        AuthGate::new(config)
    }

    fn token_for(role: Role) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let token = issue_token(id, "someone@example.com", role, gate().config()).unwrap();
        (id, token)
    }

    fn with_token(token: String) -> Credentials {
        Credentials {
            token: Some(token),
            admin_pin: None,
        }
    }

    fn with_pin(pin: &str) -> Credentials {
        Credentials {
            token: None,
            admin_pin: Some(pin.into()),
        }
    }

    #[test]
    fn user_token_yields_user_principal() {
        let (id, token) = token_for(Role::User);
        let principal = gate().authorize(&with_token(token)).unwrap();
        assert_eq!(principal.user_id, Some(id));
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn nothing_presented_is_missing_credentials() {
        assert_eq!(
            gate().authorize(&Credentials::default()).unwrap_err(),
            AuthError::MissingCredentials
        );
    }

    #[test]
    fn pin_grants_admin_without_user_id() {
        let principal = gate().require(&with_pin("admin123"), Role::Admin).unwrap();
        assert!(principal.is_admin());
        assert_eq!(
            principal.require_user_id().unwrap_err(),
            AuthError::UserRequired
        );
    }

    #[test]
    fn wrong_pin_is_rejected() {
        assert_eq!(
            gate().authorize(&with_pin("1234")).unwrap_err(),
            AuthError::InvalidPin
        );
    }

    #[test]
    fn pin_is_ignored_when_not_configured() {
        let gate = AuthGate::new(AuthConfig::new("gate-secret"));
        assert_eq!(
            gate.authorize(&with_pin("admin123")).unwrap_err(),
            AuthError::InvalidPin
        );
    }

    #[test]
    fn user_token_on_admin_route_is_unauthorized() {
        let (_, token) = token_for(Role::User);
        assert_eq!(
            gate().require(&with_token(token), Role::Admin).unwrap_err(),
            AuthError::AdminRequired
        );
    }

    #[test]
    fn user_token_with_valid_pin_passes_admin_check() {
        let (_, token) = token_for(Role::User);
        let creds = Credentials {
            token: Some(token),
            admin_pin: Some("admin123".into()),
        };

        let principal = gate().require(&creds, Role::Admin).unwrap();
        assert!(principal.is_admin());
        assert_eq!(principal.user_id, None);

        // Shopper routes still see the token's own identity.
        let shopper = gate().require(&creds, Role::User).unwrap();
        assert_eq!(shopper.role, Role::User);
        assert!(shopper.user_id.is_some());
    }

    #[test]
    fn user_token_with_wrong_pin_is_still_unauthorized() {
        let (_, token) = token_for(Role::User);
        let creds = Credentials {
            token: Some(token),
            admin_pin: Some("0000".into()),
        };
        assert_eq!(
            gate().require(&creds, Role::Admin).unwrap_err(),
            AuthError::AdminRequired
        );
    }

    #[test]
    fn admin_token_passes_admin_check() {
        let (id, token) = token_for(Role::Admin);
        let principal = gate().require(&with_token(token), Role::Admin).unwrap();
        assert_eq!(principal.require_user_id().unwrap(), id);
    }

    #[test]
    fn bad_token_falls_back_to_valid_pin() {
        let creds = Credentials {
            token: Some("garbage".into()),
            admin_pin: Some("admin123".into()),
        };
        assert!(gate().authorize(&creds).unwrap().is_admin());
    }

    #[test]
    fn bad_token_without_pin_reports_token_error() {
        assert_eq!(
            gate().authorize(&with_token("garbage".into())).unwrap_err(),
            AuthError::TokenInvalid
        );
    }
}
