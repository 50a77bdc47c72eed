//! Package registry sessions
//!
//! Makes sure the package client on a host is logged in as the expected
//! identity before anything is subscribed.
//!
//! - API key supplied: exactly one key login; any failure is terminal.
//! - Otherwise: an existing session is kept when it matches the expected
//!   identity (or none was given). A mismatch counts as logged out.
//! - Logged out: log in with the supplied secret, or ask the prompt for
//!   one. A rejected secret is discarded and the prompt asked again until
//!   it succeeds, the user cancels or `max_attempts` is reached.
//!
//! The credentials passed in are updated as logins happen, so a caller
//! walking several hosts reuses the secret that worked and never resends
//! one that was rejected.

mod prompt;


pub use prompt::{CredentialPrompt, InteractivePrompt, NonInteractivePrompt};

use crate::client::PackageClient;
use crate::domain::{Credentials, Login, Secret};
use crate::error::{Result, SyncError};

/// How the session was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOrigin {
    /// A matching session already existed
    Existing,
    ApiKey,
    Password,
}

/// An authenticated session on one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Logged-in identity; unknown for API-key sessions
    pub identity: Option<String>,
    pub origin: SessionOrigin,
    /// Login calls made to obtain the session
    pub attempts: u32,
}

/// Drives the login state machine against a [`PackageClient`]
#[derive(Debug, Clone, Default)]
pub struct SessionAuthenticator {
    max_attempts: Option<u32>,
}

impl SessionAuthenticator {
    pub fn new(max_attempts: Option<u32>) -> Self {
        Self { max_attempts }
    }

    /// Ensure `client` holds a session for the identity in `credentials`
    ///
    /// On return `credentials` holds the identity and secret of the last
    /// successful password login; a rejected secret is cleared.
    pub fn ensure_session(
        &self,
        client: &dyn PackageClient,
        prompt: &dyn CredentialPrompt,
        credentials: &mut Credentials,
    ) -> Result<Session> {
        if let Some(key) = &credentials.api_key {
            return Self::login_with_api_key(client, key.clone());
        }

        let current = client.current_identity()?;
        match (&current, &credentials.identity) {
            (Some(active), Some(expected)) if !active.eq_ignore_ascii_case(expected) => {
                tracing::info!(
                    active = %active,
                    expected = %expected,
                    "session belongs to another identity, logging in again"
                );
            }
            (Some(active), _) => {
                tracing::debug!(identity = %active, "reusing existing session");
                return Ok(Session {
                    identity: current.clone(),
                    origin: SessionOrigin::Existing,
                    attempts: 0,
                });
            }
            (None, _) => tracing::debug!("no active session"),
        }

        self.login_with_password(client, prompt, credentials)
    }

    fn login_with_api_key(client: &dyn PackageClient, key: Secret) -> Result<Session> {
        match client.login(&Login::ApiKey { key }) {
            Ok(()) => Ok(Session {
                identity: None,
                origin: SessionOrigin::ApiKey,
                attempts: 1,
            }),
            Err(e) => {
                tracing::warn!(error = %e, code = %e.code_str(), "API key login failed");
                Err(SyncError::InvalidApiKey)
            }
        }
    }

    fn login_with_password(
        &self,
        client: &dyn PackageClient,
        prompt: &dyn CredentialPrompt,
        credentials: &mut Credentials,
    ) -> Result<Session> {
        let mut identity = credentials.identity.clone();
        let mut secret = credentials.secret.clone();
        let mut attempts = 0u32;

        loop {
            let (login_identity, login_secret) = match (identity.take(), secret.take()) {
                (Some(id), Some(sec)) => (id, sec),
                (hint, _) => match prompt.ask(hint.as_deref())? {
                    Some(answer) => answer,
                    None => return Err(SyncError::LoginCancelled),
                },
            };

            attempts += 1;
            let login = Login::Password {
                identity: login_identity.clone(),
                secret: login_secret.clone(),
            };
            match client.login(&login) {
                Ok(()) => {
                    tracing::info!(identity = %login_identity, attempts, "logged in");
                    credentials.identity = Some(login_identity.clone());
                    credentials.secret = Some(login_secret);
                    return Ok(Session {
                        identity: Some(login_identity),
                        origin: SessionOrigin::Password,
                        attempts,
                    });
                }
                Err(e) if e.is_login_rejection() => {
                    tracing::warn!(identity = %login_identity, error = %e, "login rejected");
                    if self.max_attempts.is_some_and(|max| attempts >= max) {
                        return Err(SyncError::LoginAttemptsExhausted { attempts });
                    }
                    // Keep the identity as the next hint; the secret is gone
                    credentials.identity = Some(login_identity.clone());
                    credentials.secret = None;
                    identity = Some(login_identity);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
