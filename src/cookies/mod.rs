//! Cookie file detection and normalization.
//!
//! Browser extensions export cookies either as a JSON list of records or in
//! the Netscape HTTP Cookie File format (7 TAB-separated columns per line).
//! This module detects which encoding a file uses and converts both into the
//! canonical [`CookieRecord`] sequence used by the store and the validator.

mod error;
mod format;
mod lookup;
mod normalize;
mod record;

pub use error::FormatError;
pub use format::{CookieFormat, detect, detect_file};
pub use lookup::CookieLookup;
pub use normalize::{load_cookie_file, normalize};
pub use record::{CookieRecord, Expiration};
