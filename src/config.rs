use chrono::Duration;
use mongodb::{Client as MongoClient, Database};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    db::{
        admin::ensure_admin_exists, result_state::ensure_result_state_exists,
        tally::ensure_tallies_exist,
    },
    mongodb::{ensure_indexes_exist, Coll},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    default_admin_username: String,
    // secrets
    jwt_secret: String,
    hmac_secret: String,
    default_admin_password: String,
}

impl Config {
    /// Valid lifetime of admin auth tokens in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to encrypt JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret key used to sign Aadhaar HMACs.
    pub fn hmac_secret(&self) -> &[u8] {
        self.hmac_secret.as_bytes()
    }

    /// Username of the admin account provisioned on first launch.
    pub fn default_admin_username(&self) -> &str {
        &self.default_admin_username
    }

    /// Password of the admin account provisioned on first launch.
    /// Override this in any real deployment.
    pub fn default_admin_password(&self) -> &str {
        &self.default_admin_password
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that loads the MongoDB config, connects to the database,
/// performs any setup necessary, and places both a `Client` and a `Database`
/// into managed state.
///
/// Must be attached after [`ConfigFairing`]; provisioning the default admin
/// needs the application config.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&get_database_name());

        let app_config = match rocket.state::<Config>() {
            Some(config) => config,
            None => {
                error!("Application config is not managed; attach ConfigFairing first");
                return Err(rocket);
            }
        };
        if let Err(e) = provision_database(&db, app_config).await {
            error!("Failed to provision database: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Provision everything the app expects in its database: the unique indexes,
/// the default admin, the result visibility flag, and a zeroed tally per
/// registered party. Safe to run against an already-provisioned database.
pub(crate) async fn provision_database(db: &Database, config: &Config) -> crate::error::Result<()> {
    ensure_indexes_exist(db).await?;

    let admins = Coll::from_db(db);
    let states = Coll::from_db(db);
    let tallies = Coll::from_db(db);
    ensure_admin_exists(&admins, config).await?;
    ensure_result_state_exists(&states).await?;
    ensure_tallies_exist(&tallies).await?;
    Ok(())
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
pub(crate) fn get_database_name() -> String {
    "eci_vote".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
pub(crate) fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                auth_ttl: 3600,
                default_admin_username: "admin".to_string(),
                jwt_secret: "jwt signing example secret".to_string(),
                hmac_secret: "hmac signing example secret".to_string(),
                default_admin_password: "admin123".to_string(),
            }
        }

        pub fn example_with_hmac_secret(hmac_secret: &str) -> Self {
            Self {
                hmac_secret: hmac_secret.to_string(),
                ..Self::example()
            }
        }

        pub fn example_with_jwt_secret(jwt_secret: &str) -> Self {
            Self {
                jwt_secret: jwt_secret.to_string(),
                ..Self::example()
            }
        }
    }
}
