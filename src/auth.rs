use crate::error::AuthError;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    /// Bearer token forwarded to the question service, when the provider issues one.
    pub id_token: Option<String>,
}

/// Third-party sign-in flow.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self) -> Result<UserProfile, AuthError>;
}

/// Signs in as a fixed local profile, for terminals without a browser flow.
#[derive(Debug, Clone)]
pub struct LocalProfileProvider {
    display_name: Option<String>,
    id_token: Option<String>,
}

impl LocalProfileProvider {
    pub fn new(display_name: Option<String>, id_token: Option<String>) -> Self {
        Self {
            display_name,
            id_token,
        }
    }
}

impl IdentityProvider for LocalProfileProvider {
    fn sign_in(&self) -> Result<UserProfile, AuthError> {
        let name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AuthError::Unavailable("set STUDY_USER to sign in".to_string()))?;

        Ok(UserProfile {
            uid: local_uid(name),
            display_name: name.to_string(),
            photo_url: None,
            id_token: self.id_token.clone(),
        })
    }
}

fn local_uid(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("local:{}", slug)
}

/// Sign-in capability handed to the controller and the screens.
#[derive(Clone)]
pub struct Auth {
    provider: Arc<dyn IdentityProvider>,
    user: Arc<RwLock<Option<UserProfile>>>,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.current_user())
            .finish()
    }
}

impl Auth {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.user.read().ok().and_then(|u| u.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn sign_in(&self) -> Result<UserProfile, AuthError> {
        let profile = self.provider.sign_in()?;
        tracing::info!(uid = %profile.uid, "signed in");
        if let Ok(mut user) = self.user.write() {
            *user = Some(profile.clone());
        }
        Ok(profile)
    }

    pub fn sign_out(&self) {
        if let Ok(mut user) = self.user.write()
            && let Some(previous) = user.take()
        {
            tracing::info!(uid = %previous.uid, "signed out");
        }
    }
}
