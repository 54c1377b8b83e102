use argon2::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::db::admin::NewAdmin;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw admin credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for NewAdmin {
    type Error = ();

    /// Convert [`AdminCredentials`] to a new [`Admin`] by hashing the password.
    /// This enforces that the username is non-empty, and the password meets minimum length.
    fn try_from(cred: AdminCredentials) -> Result<Self, Self::Error> {
        // Check credentials are acceptable.
        if cred.username.is_empty() || cred.password.len() < MIN_PASSWORD_LENGTH {
            return Err(());
        }

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        // Also useful:
        //  https://www.twelve21.io/how-to-choose-the-right-parameters-for-argon2/
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default()).unwrap(); // Safe because the default `Config` is valid.
        Ok(Self {
            username: cred.username,
            password_hash,
        })
    }
}

/// Successful response to `POST /admin/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

impl AdminLoginResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            message: "Admin login successful".to_string(),
            token,
        }
    }
}

/// Body of `POST /admin/toggle-result`.
///
/// The flag is optional so the handler can produce the portal's own
/// "parameter is required" message instead of failing wholesale at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    #[serde(rename = "isResultPublic")]
    pub is_result_public: Option<bool>,
}

/// The result-visibility flag in its wire shape: the `data` echoed back from
/// `POST /admin/toggle-result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultVisibility {
    #[serde(rename = "isResultPublic")]
    pub is_result_public: bool,
}

/// Successful response to `POST /admin/toggle-result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResultResponse {
    pub success: bool,
    pub message: String,
    pub data: ResultVisibility,
}

impl ToggleResultResponse {
    pub fn new(visibility: ResultVisibility) -> Self {
        let verb = if visibility.is_result_public {
            "published"
        } else {
            "hidden"
        };
        Self {
            success: true,
            message: format!("Results {verb} successfully"),
            data: visibility,
        }
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example1() -> Self {
            Self {
                username: "returning-officer".into(),
                password: "ballotsecrecy".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}
