#[macro_use]
extern crate log;

#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Construct the rocket: all routes and catchers mounted at the root, with
/// fairings for config, database, and logging. Configuration is loaded and the
/// database connected at ignition; a failure in either aborts the launch.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
}

/// Get a raw database client for use in tests.
#[cfg(test)]
pub(crate) async fn db_client() -> mongodb::Client {
    let db_uri = rocket::build()
        .figment()
        .extract_inner::<String>("db_uri")
        .expect("`db_uri` not set");
    mongodb::Client::with_uri_str(&db_uri).await.expect(&format!(
        "Could not connect to database with `db_uri` \"{}\"",
        db_uri
    ))
}

/// Get the name of the database under test.
#[cfg(test)]
pub(crate) fn database() -> String {
    config::get_database_name()
}

/// Construct a rocket that runs against the given database instead of the
/// configured one, so tests control which database gets provisioned and
/// dropped. [`DatabaseFairing`] is replaced by an ad-hoc fairing that
/// provisions the injected database.
#[cfg(test)]
pub(crate) fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    let db = client.database(db_name);
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(rocket::fairing::AdHoc::try_on_ignite(
            "Test MongoDB",
            move |rocket| async move {
                let app_config = rocket
                    .state::<Config>()
                    .expect("ConfigFairing must be attached first");
                if let Err(e) = config::provision_database(&db, app_config).await {
                    error!("Failed to provision test database: {e}");
                    return Err(rocket);
                }
                Ok(rocket.manage(client).manage(db))
            },
        ))
        .attach(LoggerFairing)
}
