use rocket::{http::Status, serde::json::Json, Catcher, Request};

use crate::error::ErrorBody;

/// Catchers for errors that never reach a handler, such as unparseable
/// request bodies and unknown paths. The portal UI reads `message` out of
/// every failure response, so these stay in the same envelope as [`Error`].
///
/// [`Error`]: crate::error::Error
pub fn catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        not_found,
        unprocessable_entity,
        internal_server_error,
        fallback,
    ]
}

/// The message the portal shows when a route's body is missing or mangled.
fn malformed_body_message(req: &Request) -> &'static str {
    match req.uri().path().as_str() {
        "/login" => "Aadhaar and name required",
        "/vote" => "Missing aadhaar or party_id",
        "/admin/login" => "Invalid credentials",
        "/admin/toggle-result" => "isResultPublic parameter is required",
        _ => "Malformed request body",
    }
}

#[catch(400)]
fn bad_request(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(malformed_body_message(req)))
}

#[catch(401)]
fn unauthorized() -> Json<ErrorBody> {
    Json(ErrorBody::new("Unauthorized"))
}

#[catch(404)]
fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new("Not found"))
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(malformed_body_message(req)))
}

#[catch(500)]
fn internal_server_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("Server error"))
}

#[catch(default)]
fn fallback(status: Status, _req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(status.reason_lossy()))
}
