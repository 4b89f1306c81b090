//! Registration input checks.

use regex::Regex;

use crate::password::MAX_PASSWORD_BYTES;

/// Minimum password length in characters. Length is the whole policy.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$";

/// Lowercase-only address with a 2 to 4 letter TLD.
pub fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).is_ok_and(|re| re.is_match(email))
}

pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Longer passwords cannot be hashed without losing bytes.
pub fn password_within_limit(password: &str) -> bool {
    password.len() <= MAX_PASSWORD_BYTES
}
