//! Admin credential resolution.
//!
//! The current admin credential is the override stored in the portfolio
//! document when present and non-empty, otherwise the configured default.
//! Exactly one of the two is authoritative; they are never combined.
//!
//! A store failure while resolving is treated as "no override" so that login
//! and update stay usable with the default credential while the store is
//! down. This is the only place in the system that swallows a store error.

use std::fmt;
use std::sync::Arc;

use tracing::warn;
use zeroize::Zeroizing;

use crate::repository::PortfolioRepository;

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The override stored in the portfolio document.
    Override,
    /// The configured default; the store was read and has no override.
    Default,
    /// The configured default, because the store could not be read.
    DegradedDefault,
}

/// A resolved admin credential. Zeroized on drop, redacted in `Debug`.
pub struct ResolvedCredential {
    value: Zeroizing<String>,
    source: CredentialSource,
}

impl ResolvedCredential {
    /// The credential itself.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Which source won.
    #[must_use]
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick the authoritative credential: the stored override when non-empty,
/// otherwise `default`.
fn resolve_from(stored: Option<String>, default: &str) -> ResolvedCredential {
    match stored.filter(|s| !s.is_empty()) {
        Some(value) => ResolvedCredential {
            value: Zeroizing::new(value),
            source: CredentialSource::Override,
        },
        None => ResolvedCredential {
            value: Zeroizing::new(default.to_owned()),
            source: CredentialSource::Default,
        },
    }
}

/// Resolves the admin credential against the repository.
pub struct CredentialResolver {
    repository: Arc<PortfolioRepository>,
    default_credential: Zeroizing<String>,
}

impl CredentialResolver {
    /// Create a resolver falling back to `default_credential`.
    #[must_use]
    pub fn new(repository: Arc<PortfolioRepository>, default_credential: impl Into<String>) -> Self {
        Self {
            repository,
            default_credential: Zeroizing::new(default_credential.into()),
        }
    }

    /// Resolve the current credential. Never fails: only a store that cannot
    /// be read falls back to the default, whatever the stored body contains.
    pub async fn resolve(&self) -> ResolvedCredential {
        match self.repository.credential_override().await {
            Ok(stored) => resolve_from(stored, &self.default_credential),
            Err(e) => {
                warn!(error = %e, "credential lookup failed, using configured default");
                ResolvedCredential {
                    value: self.default_credential.clone(),
                    source: CredentialSource::DegradedDefault,
                }
            }
        }
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("repository", &self.repository)
            .field("default_credential", &"[REDACTED]")
            .finish()
    }
}
