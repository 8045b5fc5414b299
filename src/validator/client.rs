//! HTTP validation of cookie sets against the account page.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{COOKIE, HeaderValue, USER_AGENT};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::classify::{Outcome, classify};
use super::constants::{BROWSER_USER_AGENT, DEFAULT_ACCOUNT_URL, DEFAULT_TIMEOUT_SECS};
use super::error::{TransportError, ValidatorError};
use crate::cookies::{CookieLookup, CookieRecord};

/// Validates cookie sets by fetching the account page with them attached.
///
/// The client is built once and shared; it is cheap to clone. Each
/// [`validate`](Self::validate) call issues exactly one request and never
/// retries.
///
/// # Example
///
/// ```no_run
/// use cookie_checker_core::cookies::CookieRecord;
/// use cookie_checker_core::validator::Validator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let validator = Validator::new()?;
/// let outcome = validator.validate(&[CookieRecord::new("sp_dc", "...")]).await;
/// println!("{outcome}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    client: Client,
    account_url: Url,
    timeout: Duration,
}

impl Validator {
    /// Creates a validator for the default account URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Client`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ValidatorError> {
        Self::with_endpoint(
            DEFAULT_ACCOUNT_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Creates a validator for an explicit account URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidUrl`] for malformed or non-http(s)
    /// URLs, [`ValidatorError::InvalidTimeout`] for a zero timeout, and
    /// [`ValidatorError::Client`] if the HTTP client cannot be built.
    pub fn with_endpoint(account_url: &str, timeout: Duration) -> Result<Self, ValidatorError> {
        let account_url = parse_account_url(account_url)?;
        if timeout.is_zero() {
            return Err(ValidatorError::InvalidTimeout);
        }

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(ValidatorError::Client)?;

        Ok(Self {
            client,
            account_url,
            timeout,
        })
    }

    /// The account URL requests are sent to.
    #[must_use]
    pub fn account_url(&self) -> &Url {
        &self.account_url
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validates a cookie set and classifies the session.
    ///
    /// Transport failures are logged and reported as
    /// [`Outcome::Unreachable`]; they are an expected result, not an error.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn validate(&self, records: &[CookieRecord]) -> Outcome {
        let lookup = CookieLookup::from_records(records);
        match self.fetch_account_page(&lookup).await {
            Ok(body) => {
                let outcome = classify(&body);
                info!(cookies = lookup.len(), outcome = %outcome, "cookie set classified");
                outcome
            }
            Err(error) => {
                warn!(error = %error, "account page request failed");
                Outcome::Unreachable
            }
        }
    }

    /// Fetches the account page body with `lookup` attached as the `Cookie`
    /// header.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure, timeout, non-success
    /// status, or a cookie set that is not a valid header value.
    pub async fn fetch_account_page(&self, lookup: &CookieLookup) -> Result<String, TransportError> {
        let url = self.account_url.as_str();
        let mut request = self
            .client
            .get(self.account_url.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT);

        if !lookup.is_empty() {
            let header = HeaderValue::from_bytes(lookup.to_header_value().as_bytes())
                .map_err(|_| TransportError::InvalidCookieHeader)?;
            request = request.header(COOKIE, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "account page responded");
        if !status.is_success() {
            return Err(TransportError::http_status(url, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))
    }
}

fn parse_account_url(raw: &str) -> Result<Url, ValidatorError> {
    let url = Url::parse(raw).map_err(|e| ValidatorError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ValidatorError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
        }),
    }
}
