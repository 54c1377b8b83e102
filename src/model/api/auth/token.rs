use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::Status,
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{
    db::admin::Admin,
    mongodb::{Coll, Id},
};

/// The header carrying the admin token.
pub const AUTH_TOKEN_HEADER: &str = "Authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// An authentication token asserting admin rights.
///
/// Issued as a signed JWT by `POST /admin/login`. The portal UI keeps it in
/// local storage and sends it back as `Authorization: Bearer <token>`, hence
/// a header rather than the usual cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminToken {
    pub id: Id,
}

impl AdminToken {
    /// Create a new [`AdminToken`] for the given admin.
    pub fn new(admin: &Admin) -> Self {
        Self { id: admin.id }
    }

    #[allow(clippy::missing_panics_doc)]
    /// Sign this token into its bearer string.
    pub fn into_bearer(self, config: &Config) -> String {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings")
    }

    /// Verify and deserialize a token from an `Authorization` header value.
    pub fn from_header_value(header: &str, config: &Config) -> Result<Self, Error> {
        let bearer = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
            Error::Status(
                Status::Unauthorized,
                "Expected a bearer token".to_string(),
            )
        })?;
        let token = jsonwebtoken::decode(
            bearer.trim(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Token claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AdminToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = Error;

    /// Get an [`AdminToken`] from the `Authorization` header and verify that
    /// the admin it names still exists, so deleting an admin revokes their
    /// outstanding tokens.
    ///
    /// Missing or invalid tokens forward rather than fail, letting a
    /// lower-ranked route serve the unauthenticated variant.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        // Forward to any routes that do not require an authentication token.
        let header = try_outcome!(req.headers().get_one(AUTH_TOKEN_HEADER).or_forward(()));

        // Decode the token.
        let token: Self = try_outcome!(Self::from_header_value(header, config).or_forward(()));

        // Check the admin actually exists.
        let db = req.guard::<&State<mongodb::Database>>().await.unwrap();
        let admin = Coll::<Admin>::from_db(db)
            .find_one(token.id.as_doc(), None)
            .await;
        match admin {
            Ok(Some(_)) => Outcome::Success(token),
            Ok(None) => Outcome::Forward(()),
            Err(e) => Outcome::Failure((Status::InternalServerError, e.into())),
        }
    }
}
