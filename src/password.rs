//! Password hashing with bcrypt.

/// Default bcrypt work factor.
pub const DEFAULT_COST: u32 = 14;

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted, adaptive one-way password hashing.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    /// Fails for passwords over [`MAX_PASSWORD_BYTES`] instead of truncating them.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::non_truncating_hash(password, self.cost).map_err(PasswordError)
    }

    /// Check a password against a stored hash.
    /// Malformed hashes and passwords over [`MAX_PASSWORD_BYTES`] never match.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::non_truncating_verify(password, hash).unwrap_or(false)
    }
}

/// Password hashing failure.
#[derive(Debug)]
pub struct PasswordError(bcrypt::BcryptError);

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to hash password: {}", self.0)
    }
}

impl std::error::Error for PasswordError {}
