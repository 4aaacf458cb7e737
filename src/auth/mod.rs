//! Instagram OAuth: credentials, long-lived tokens and their persistence.

pub mod credentials;
pub mod error;
pub mod instagram;
pub mod store;
pub mod token;

pub use credentials::ClientCredentials;
pub use error::AuthError;
pub use instagram::{AuthStep, InstagramAuth, RefreshOutcome};
pub use store::{AuthStore, FileAuthStore};
pub use token::Token;
