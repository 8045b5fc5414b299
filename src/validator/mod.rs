//! Cookie set validation and subscription tier classification.
//!
//! A cookie set is reduced to a name→value lookup, sent as the `Cookie`
//! header of one GET to the account page, and the page body is scanned as
//! plain text:
//!
//! - no `"Manage your subscription"` marker → [`Outcome::Invalid`]
//! - otherwise the most specific plan name found → [`Outcome::Live`]
//! - transport failure or non-success status → [`Outcome::Unreachable`]

mod classify;
mod client;
mod constants;
mod error;

pub use classify::{AUTHENTICATED_MARKER, Outcome, PLAN_MARKERS, Tier, classify};
pub use client::Validator;
pub use constants::{BROWSER_USER_AGENT, DEFAULT_ACCOUNT_URL, DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
pub use error::{TransportError, ValidatorError};
