//! Password hashing.
//!
//! bcrypt with a configurable cost. Hashing and verification are CPU-bound
//! (tens to hundreds of milliseconds at production cost), so both run on the
//! blocking pool and never on an async worker thread.
//!
//! bcrypt only reads the first 72 bytes of its input. Longer passwords are
//! refused at hashing time and never match at verification time, so two
//! passwords sharing a 72-byte prefix are not interchangeable.
use thiserror::Error;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt cost {0} outside {min}..={max}", min = MIN_COST, max = MAX_COST)]
    InvalidCost(u32),
    #[error("password is {0} bytes, bcrypt accepts at most {max}", max = MAX_PASSWORD_BYTES)]
    TooLong(usize),
    #[error("stored password hash is not valid utf-8")]
    MalformedHash,
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted one-way hash of `password`, returned as the bcrypt string bytes.
    pub async fn hash(&self, password: &str) -> Result<Vec<u8>, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong(password.len()));
        }
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed.into_bytes())
    }

    /// Check `password` against a stored hash.
    ///
    /// `Ok(false)` is a mismatch. Errors mean the stored hash itself is
    /// unusable, which is distinct from a wrong password. A password longer
    /// than [`MAX_PASSWORD_BYTES`] never matches.
    pub async fn verify(&self, password: &str, hash: &[u8]) -> Result<bool, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        let hash = std::str::from_utf8(hash)
            .map_err(|_| PasswordError::MalformedHash)?
            .to_owned();
        let password = password.to_owned();
        Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
        }
    }
}
