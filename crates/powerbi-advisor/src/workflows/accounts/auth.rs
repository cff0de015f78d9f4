use tokio::sync::watch;

use super::domain::{SessionToken, SignUpProfile, UserIdentity};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Email/password authentication.
///
/// `current_user` and `subscribe` follow the process-local session moved by
/// `sign_up`, `sign_in` and `sign_out`. Remote clients each hold their own
/// bearer session instead, opened after a successful sign-up or sign-in.
pub trait AuthProvider: Send + Sync {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: SignUpProfile,
    ) -> Result<UserIdentity, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
    fn sign_out(&self) -> Result<(), AuthError>;
    fn reset_password(&self, email: &str) -> Result<(), AuthError>;
    fn current_user(&self) -> Option<UserIdentity>;
    /// Receives the current user now and on every sign-in or sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>>;
    fn open_session(&self, user: &UserIdentity) -> Result<SessionToken, AuthError>;
    /// Identity behind a bearer session; `InvalidSession` once it is closed.
    fn session_user(&self, token: &SessionToken) -> Result<UserIdentity, AuthError>;
    fn close_session(&self, token: &SessionToken) -> Result<(), AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("an account already exists for {0}")]
    EmailInUse(String),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("no account found for {0}")]
    UnknownAccount(String),
    #[error("user must be authenticated")]
    NotSignedIn,
    #[error("session is invalid or has been closed")]
    InvalidSession,
    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),
}

/// Lower-cased, trimmed email, or an error if it is not plausibly an address.
pub fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail(raw.trim().to_string()))
    }
}
