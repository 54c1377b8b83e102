use rocket::{Catcher, Route};

mod admin;
mod auth;
mod catchers;
mod public;
mod voting;

/// All the API routes.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(voting::routes());
    routes.extend(public::routes());
    routes.extend(admin::routes());
    routes
}

/// Catchers that keep error responses in the JSON envelope the UI expects.
pub fn catchers() -> Vec<Catcher> {
    catchers::catchers()
}
