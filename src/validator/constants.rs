//! Constants for the validator (endpoint, timeouts, headers).

/// Account-management page whose content reveals the session's plan.
pub const DEFAULT_ACCOUNT_URL: &str = "https://www.spotify.com/us/account";

/// Default total request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for configured timeouts (5 minutes).
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Browser User-Agent sent with every account page request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
