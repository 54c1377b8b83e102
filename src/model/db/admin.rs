use std::ops::{Deref, DerefMut};

use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{api::admin::AdminCredentials, mongodb::Coll, mongodb::Id};

/// Core admin user data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub username: String,
    pub password_hash: String,
}

impl AdminCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create an AdminCore is via
        // TryFrom<AdminCredentials>, so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

/// Ensure there is at least one admin account, seeding the configured default
/// one into an empty collection.
///
/// This operation is idempotent.
pub async fn ensure_admin_exists(admins: &Coll<NewAdmin>, config: &Config) -> Result<()> {
    let count = admins.count_documents(None, None).await?;
    if count > 0 {
        return Ok(());
    }

    let credentials = AdminCredentials {
        username: config.default_admin_username().to_string(),
        password: config.default_admin_password().to_string(),
    };
    let admin = NewAdmin::try_from(credentials).map_err(|_| {
        Error::Status(
            Status::InternalServerError,
            "Configured default admin credentials are invalid".to_string(),
        )
    })?;
    admins.insert_one(&admin, None).await?;
    info!("Created default admin account '{}'", admin.username);
    Ok(())
}
