//! Admin session: the client-side data and authentication context.
//!
//! A session moves `Loading → Ready`, and while ready is either logged out
//! or logged in. Edits change only the local document; [`PortfolioSession::save`]
//! sends the whole document as one replacement. Logging out only drops the
//! token, since tokens are not tracked by the server.

use serde_json::Value;
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};

use folio_core::defaults::default_document;
use folio_core::document::PortfolioDocument;

use crate::client::PortfolioClient;
use crate::error::ClientError;

/// Minimum length of a new admin credential, in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The initial fetch has not finished.
    Loading,
    /// The initial fetch finished, successfully or not.
    Ready,
}

struct SessionState {
    phase: SessionPhase,
    data: PortfolioDocument,
    token: Option<String>,
}

/// Client-side portfolio context.
pub struct PortfolioSession {
    client: PortfolioClient,
    state: RwLock<SessionState>,
    loaded: OnceCell<()>,
}

impl std::fmt::Debug for PortfolioSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSession")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl PortfolioSession {
    /// Create a session in `Loading` with the built-in default document.
    #[must_use]
    pub fn new(client: PortfolioClient) -> Self {
        Self {
            client,
            state: RwLock::new(SessionState {
                phase: SessionPhase::Loading,
                data: default_document(),
                token: None,
            }),
            loaded: OnceCell::new(),
        }
    }

    /// Fetch the stored document once and become `Ready`.
    ///
    /// Fetched top-level sections override the defaults. A failed fetch
    /// still leaves the session `Ready` on the defaults; the error is
    /// returned so the caller can report it. Calls after the first wait for
    /// it to finish and then return `Ok`. No lock is held during the fetch,
    /// so readers observe `Loading` meanwhile.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or `ClientError::Document` if the fetched
    /// document cannot be merged over the defaults.
    pub async fn load(&self) -> Result<(), ClientError> {
        let mut outcome = Ok(());
        let slot = &mut outcome;
        self.loaded
            .get_or_init(|| async move {
                *slot = self.fetch_initial().await;
            })
            .await;
        outcome
    }

    async fn fetch_initial(&self) -> Result<(), ClientError> {
        let fetched = self.client.fetch().await;

        let mut state = self.state.write().await;
        state.phase = SessionPhase::Ready;

        match fetched {
            Ok(Some(stored)) => {
                state.data = state.data.merged_with(&stored)?;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, "portfolio fetch failed, keeping built-in defaults");
                Err(e)
            }
        }
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    /// Whether a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    /// A copy of the local document.
    pub async fn data(&self) -> PortfolioDocument {
        self.state.read().await.data.clone()
    }

    /// Pretty-printed JSON of the local document.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Document` if serialization fails.
    pub async fn export_json(&self) -> Result<String, ClientError> {
        Ok(self.state.read().await.data.to_pretty_json()?)
    }

    // ── Local edits ──────────────────────────────────────────────────

    /// Replace one top-level section locally.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Document` if the value does not fit the section.
    pub async fn update_section(&self, section: &str, value: Value) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        state.data = state.data.with_section(section, value)?;
        Ok(())
    }

    /// Set one field inside an object section locally.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Document` if the section is not an object or
    /// the value does not fit.
    pub async fn update_nested_field(
        &self,
        section: &str,
        key: &str,
        value: Value,
    ) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        state.data = state.data.with_nested_field(section, key, value)?;
        Ok(())
    }

    /// Replace the whole local document.
    pub async fn replace_local(&self, document: PortfolioDocument) {
        self.state.write().await.data = document;
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and keep the returned token. On failure the session stays
    /// logged out.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Auth` for a wrong credential, or the transport
    /// error.
    pub async fn login(&self, password: &str) -> Result<(), ClientError> {
        let token = self.client.login(password).await?;
        self.state.write().await.token = Some(token);
        info!("logged in");
        Ok(())
    }

    /// Drop the token. Does not contact the server.
    pub async fn logout(&self) {
        self.state.write().await.token = None;
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Send the whole local document as a replacement.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without a token, otherwise
    /// the update error.
    pub async fn save(&self) -> Result<(), ClientError> {
        let (token, data) = {
            let state = self.state.read().await;
            let token = state.token.clone().ok_or(ClientError::NotAuthenticated)?;
            (token, state.data.clone())
        };
        self.client.update(&token, &data).await
    }

    /// Shallow-merge `patch` into the local document, then save.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Document` if the merge fails, otherwise as
    /// [`save`](Self::save).
    pub async fn update_and_save(&self, patch: &PortfolioDocument) -> Result<(), ClientError> {
        {
            let mut state = self.state.write().await;
            state.data = state.data.merged_with(patch)?;
        }
        self.save().await
    }

    /// Replace the local document with the built-in defaults and, when
    /// logged in, save it.
    ///
    /// The stored credential override is carried over so the session's
    /// token stays valid.
    ///
    /// # Errors
    ///
    /// Returns the save error when logged in.
    pub async fn reset_to_defaults(&self) -> Result<(), ClientError> {
        let authenticated = {
            let mut state = self.state.write().await;
            let admin_password = state.data.admin_password.take();
            state.data = PortfolioDocument {
                admin_password,
                ..default_document()
            };
            state.token.is_some()
        };

        if authenticated {
            self.save().await?;
        }
        Ok(())
    }

    /// Change the admin credential, then log in again with it.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotAuthenticated` without a token.
    /// - `ClientError::Validation` if the credential is empty, shorter than
    ///   [`MIN_PASSWORD_LEN`] characters, or differs from `confirmation`.
    /// - Otherwise the save or login error.
    pub async fn change_password(
        &self,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), ClientError> {
        if !self.is_authenticated().await {
            return Err(ClientError::NotAuthenticated);
        }
        validate_new_password(new_password, confirmation)?;

        let patch = PortfolioDocument {
            admin_password: Some(new_password.to_owned()),
            ..PortfolioDocument::default()
        };
        self.update_and_save(&patch).await?;
        self.login(new_password).await?;
        info!("admin credential changed");
        Ok(())
    }

    /// Set the contact-form relay key and save.
    ///
    /// # Errors
    ///
    /// As [`update_and_save`](Self::update_and_save).
    pub async fn set_form_key(&self, key: &str) -> Result<(), ClientError> {
        let patch = PortfolioDocument {
            web3forms_key: Some(key.to_owned()),
            ..PortfolioDocument::default()
        };
        self.update_and_save(&patch).await
    }
}

fn validate_new_password(new_password: &str, confirmation: &str) -> Result<(), ClientError> {
    if new_password.is_empty() {
        return Err(ClientError::Validation("password cannot be empty".to_owned()));
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if new_password != confirmation {
        return Err(ClientError::Validation("passwords do not match".to_owned()));
    }
    Ok(())
}
