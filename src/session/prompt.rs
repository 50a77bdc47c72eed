//! Credential prompts

use indicatif::ProgressBar;
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

use crate::domain::Secret;
use crate::error::Result;

/// Source of interactively supplied credentials
pub trait CredentialPrompt {
    /// Ask for an identity and secret; `None` means the user cancelled
    fn ask(&self, identity_hint: Option<&str>) -> Result<Option<(String, Secret)>>;
}

/// Terminal prompt; Esc or Ctrl-C cancels
#[derive(Default)]
pub struct InteractivePrompt {
    progress: Option<ProgressBar>,
}

impl InteractivePrompt {
    /// Prompt that hides `progress` while it is asking
    pub fn with_progress(progress: ProgressBar) -> Self {
        Self {
            progress: Some(progress),
        }
    }

    fn ask_inner(identity_hint: Option<&str>) -> Result<Option<(String, Secret)>> {
        let mut identity_prompt = Text::new("Registry user:");
        if let Some(hint) = identity_hint {
            identity_prompt = identity_prompt.with_initial_value(hint);
        }
        let identity = match identity_prompt.prompt() {
            Ok(identity) => identity,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let secret = match Password::new("Password:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
        {
            Ok(secret) => secret,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some((identity.trim().to_string(), Secret::new(secret))))
    }
}

impl CredentialPrompt for InteractivePrompt {
    fn ask(&self, identity_hint: Option<&str>) -> Result<Option<(String, Secret)>> {
        match &self.progress {
            Some(progress) => progress.suspend(|| Self::ask_inner(identity_hint)),
            None => Self::ask_inner(identity_hint),
        }
    }
}

/// Prompt for unattended runs: every request counts as cancelled
#[derive(Debug, Default)]
pub struct NonInteractivePrompt;

impl CredentialPrompt for NonInteractivePrompt {
    fn ask(&self, identity_hint: Option<&str>) -> Result<Option<(String, Secret)>> {
        tracing::debug!(hint = ?identity_hint, "credentials needed but prompting is disabled");
        Ok(None)
    }
}
