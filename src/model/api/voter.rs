use std::{ops::Deref, str::FromStr};

use hmac::Mac;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::Config, model::db::voter::HmacSha256};

pub const AADHAAR_LENGTH: usize = 12;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 50;

/// A voter's 12-digit Aadhaar number.
///
/// Raw numbers are PII: they only ever appear in request/response bodies.
/// Storage and lookup go via [`Aadhaar::into_hmac`]. There is deliberately no
/// `Display` impl so a raw number cannot end up in a log line by accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Aadhaar {
    inner: String,
}

impl Aadhaar {
    /// Keyed digest of this number, as stored in the voter collection.
    pub fn into_hmac(self, config: &Config) -> Vec<u8> {
        let mut hmac = HmacSha256::new_from_slice(config.hmac_secret())
            .expect("HMAC can take key of any size");
        hmac.update(self.inner.as_bytes());
        hmac.finalize().into_bytes().to_vec()
    }
}

impl Deref for Aadhaar {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromStr for Aadhaar {
    type Err = AadhaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != AADHAAR_LENGTH {
            return Err(AadhaarError::InvalidLength(length));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(AadhaarError::InvalidChar(c));
        }
        Ok(Self {
            inner: s.to_string(),
        })
    }
}

impl TryFrom<String> for Aadhaar {
    type Error = AadhaarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Aadhaar> for String {
    fn from(aadhaar: Aadhaar) -> Self {
        aadhaar.inner
    }
}

#[derive(Debug, Error)]
pub enum AadhaarError {
    #[error("Expected {AADHAAR_LENGTH} digits, got {0} characters")]
    InvalidLength(usize),
    #[error("Invalid character {0:?}")]
    InvalidChar(char),
}

/// A voter's name as printed on their Aadhaar card.
///
/// Between 2 and 50 characters; everything outside surrounding whitespace
/// must be a letter, a space, or one of `. - '`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterName {
    inner: String,
}

impl Deref for VoterName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromStr for VoterName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
            return Err(NameError::InvalidLength(length));
        }
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NameError::Blank);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_alphabetic() || c.is_whitespace() || ".-'".contains(*c)))
        {
            return Err(NameError::InvalidChar(c));
        }
        Ok(Self {
            inner: s.to_string(),
        })
    }
}

impl TryFrom<String> for VoterName {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VoterName> for String {
    fn from(name: VoterName) -> Self {
        name.inner
    }
}

#[derive(Debug, Error)]
pub enum NameError {
    #[error("Expected {MIN_NAME_LENGTH}-{MAX_NAME_LENGTH} characters, got {0}")]
    InvalidLength(usize),
    #[error("Name is blank")]
    Blank,
    #[error("Invalid character {0:?}")]
    InvalidChar(char),
}

/// Body of `POST /login`.
///
/// Fields are raw optional strings so the handler can reproduce the portal's
/// staged validation messages instead of failing wholesale at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub aadhaar: Option<String>,
    pub name: Option<String>,
}

/// The credential pair echoed back on a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterDetails {
    pub aadhaar: Aadhaar,
    pub name: VoterName,
}

/// Successful response to `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: VoterDetails,
}

impl LoginResponse {
    pub fn new(user: VoterDetails) -> Self {
        Self {
            success: true,
            message: "Login successful".to_string(),
            user,
        }
    }
}
