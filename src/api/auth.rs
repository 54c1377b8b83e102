use mongodb::bson::doc;
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::{AdminCredentials, AdminLoginResponse},
            auth::AdminToken,
            voter::{Aadhaar, LoginRequest, LoginResponse, VoterDetails, VoterName},
        },
        db::{admin::Admin, voter, voter::Voter},
        mongodb::Coll,
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![login, admin_login]
}

/// Voter login: validate the credential pair and check it has not voted yet.
///
/// Nothing is stored at this point; a voter document only appears once the
/// vote itself is cast.
#[post("/login", data = "<request>", format = "json")]
pub async fn login(
    request: Json<LoginRequest>,
    voters: Coll<Voter>,
    config: &State<Config>,
) -> Result<Json<LoginResponse>> {
    let (aadhaar, name) = validate_credentials(request.into_inner())?;

    let aadhaar_hmac = aadhaar.clone().into_hmac(config);
    if voter::has_voted(&voters, &aadhaar_hmac).await? {
        return Err(Error::forbidden("User has already voted"));
    }

    Ok(Json(LoginResponse::new(VoterDetails { aadhaar, name })))
}

/// Admin login, issuing a signed bearer token for the `Authorization` header.
#[post("/admin/login", data = "<credentials>", format = "json")]
pub async fn admin_login(
    credentials: Json<AdminCredentials>,
    admins: Coll<Admin>,
    config: &State<Config>,
) -> Result<Json<AdminLoginResponse>> {
    let with_username = doc! {
        "username": &credentials.username
    };

    let admin = admins
        .find_one(with_username, None)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| Error::Status(Status::Unauthorized, "Invalid credentials".to_string()))?;

    info!("Admin '{}' logged in", admin.username);

    let token = AdminToken::new(&admin).into_bearer(config);
    Ok(Json(AdminLoginResponse::new(token)))
}

/// Apply the portal's credential checks in order, with its exact messages.
///
/// A missing field and an empty field are the same thing to the portal.
fn validate_credentials(request: LoginRequest) -> Result<(Aadhaar, VoterName)> {
    let (aadhaar, name) = match (request.aadhaar, request.name) {
        (Some(aadhaar), Some(name)) if !aadhaar.is_empty() && !name.is_empty() => (aadhaar, name),
        _ => return Err(Error::bad_request("Aadhaar and name required")),
    };

    let aadhaar = aadhaar
        .parse::<Aadhaar>()
        .map_err(|_| Error::bad_request("Invalid Aadhaar number format. Must be 12 digits."))?;

    let name = name.parse::<VoterName>().map_err(|_| {
        Error::bad_request(
            "Invalid name format. Must be 2-50 characters and contain only letters, \
             spaces, and basic punctuation.",
        )
    })?;

    Ok((aadhaar, name))
}

/// Log in as the configured default admin and produce the resulting
/// `Authorization` header, for tests of admin-only routes.
#[cfg(all(test, feature = "live-db-tests"))]
pub async fn admin_bearer(
    client: &rocket::local::asynchronous::Client,
) -> rocket::http::Header<'static> {
    use rocket::http::{ContentType, Header};
    use rocket::serde::json::serde_json::{self, json};

    use crate::model::api::auth::AUTH_TOKEN_HEADER;

    let config = client.rocket().state::<Config>().unwrap();
    let response = client
        .post(uri!(admin_login))
        .header(ContentType::JSON)
        .body(
            json!({
                "username": config.default_admin_username(),
                "password": config.default_admin_password(),
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(Status::Ok, response.status());

    let login: AdminLoginResponse =
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
    Header::new(AUTH_TOKEN_HEADER, format!("Bearer {}", login.token))
}

#[cfg(all(test, feature = "live-db-tests"))]
mod tests {
    use rocket::{
        http::ContentType,
        local::asynchronous::Client,
        serde::json::serde_json::{self, json, Value},
    };

    use crate::model::db::voter::{NewVoter, VoterCore};

    use super::*;

    #[backend_test]
    async fn voter_login_valid(client: Client) {
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(LoginRequest::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());

        let login: LoginResponse =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(login.success);
        assert_eq!("Login successful", login.message);
        assert_eq!(Aadhaar::example(), login.user.aadhaar);
        assert_eq!(VoterName::example(), login.user.name);
    }

    #[backend_test]
    async fn voter_login_missing_fields(client: Client) {
        for body in [
            json!({}),
            json!({ "aadhaar": "123456789012" }),
            json!({ "name": "Ravi Kumar" }),
            json!({ "aadhaar": "", "name": "Ravi Kumar" }),
            json!({ "aadhaar": "123456789012", "name": "" }),
        ] {
            let response = client
                .post(uri!(login))
                .header(ContentType::JSON)
                .body(body.to_string())
                .dispatch()
                .await;

            assert_eq!(Status::BadRequest, response.status());

            let error: Value =
                serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
            assert_eq!(
                json!({ "success": false, "message": "Aadhaar and name required" }),
                error
            );
        }
    }

    #[backend_test]
    async fn voter_login_invalid_formats(client: Client) {
        // Malformed Aadhaar number.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "aadhaar": "1234", "name": "Ravi Kumar" }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({
                "success": false,
                "message": "Invalid Aadhaar number format. Must be 12 digits.",
            }),
            error
        );

        // Malformed name.
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!({ "aadhaar": "123456789012", "name": "R2-D2" }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({
                "success": false,
                "message": "Invalid name format. Must be 2-50 characters and contain \
                            only letters, spaces, and basic punctuation.",
            }),
            error
        );
    }

    #[backend_test]
    async fn voter_login_after_voting(client: Client, new_voters: Coll<NewVoter>) {
        let config = client.rocket().state::<Config>().unwrap();
        new_voters
            .insert_one(VoterCore::example(config), None)
            .await
            .unwrap();

        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body(json!(LoginRequest::example()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Forbidden, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({ "success": false, "message": "User has already voted" }),
            error
        );
    }

    #[backend_test]
    async fn voter_login_unparseable_body(client: Client) {
        let response = client
            .post(uri!(login))
            .header(ContentType::JSON)
            .body("not json")
            .dispatch()
            .await;

        // The catcher keeps even parse failures in the portal's envelope.
        assert_eq!(Status::BadRequest, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({ "success": false, "message": "Aadhaar and name required" }),
            error
        );
    }

    #[backend_test]
    async fn admin_login_valid(client: Client) {
        let config = client.rocket().state::<Config>().unwrap();
        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(
                json!({
                    "username": config.default_admin_username(),
                    "password": config.default_admin_password(),
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());

        let login: AdminLoginResponse =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert!(login.success);
        assert_eq!("Admin login successful", login.message);

        let token = AdminToken::from_header_value(&format!("Bearer {}", login.token), config);
        assert!(token.is_ok());
    }

    #[backend_test]
    async fn admin_login_invalid(client: Client) {
        let config = client.rocket().state::<Config>().unwrap();

        // Wrong password.
        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(
                json!({
                    "username": config.default_admin_username(),
                    "password": "wrong password",
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({ "success": false, "message": "Invalid credentials" }),
            error
        );

        // Unknown username.
        let response = client
            .post(uri!(admin_login))
            .header(ContentType::JSON)
            .body(json!(AdminCredentials::example1()).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({ "success": false, "message": "Invalid credentials" }),
            error
        );
    }
}
