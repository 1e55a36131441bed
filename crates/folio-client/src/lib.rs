//! Client for the Folio portfolio API.
//!
//! [`PortfolioClient`] is a thin typed wrapper over the four HTTP routes.
//! [`PortfolioSession`] is the admin-side context built on it: it loads the
//! document once, holds local edits in memory, and saves them as a single
//! full replacement when asked.
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_client::{PortfolioClient, PortfolioSession};
//!
//! # async fn example() -> Result<(), folio_client::ClientError> {
//! let session = PortfolioSession::new(PortfolioClient::new()?);
//! session.load().await?;
//! session.login("admin123").await?;
//! session.update_nested_field("personal", "name", "Ada".into()).await?;
//! session.save().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod session;
mod types;

pub use client::PortfolioClient;
pub use error::ClientError;
pub use session::{MIN_PASSWORD_LEN, PortfolioSession, SessionPhase};
pub use types::ProbeReport;

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`PortfolioClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL. Empty falls back to `FOLIO_URL`, then
    /// `http://127.0.0.1:3000`.
    pub base_url: String,
    /// Request timeout. Zero means the default of 10 seconds.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
