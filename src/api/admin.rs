use rocket::{serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            admin::{ResultVisibility, ToggleRequest, ToggleResultResponse},
            auth::AdminToken,
        },
        db::result_state::ResultState,
        mongodb::Coll,
    },
};

pub fn routes() -> Vec<Route> {
    routes![toggle_result, toggle_result_unauthorized]
}

/// Set whether results are publicly visible.
#[post(
    "/admin/toggle-result",
    data = "<request>",
    format = "json",
    rank = 1
)]
pub async fn toggle_result(
    _token: AdminToken,
    request: Json<ToggleRequest>,
    states: Coll<ResultState>,
) -> Result<Json<ToggleResultResponse>> {
    let visibility = match request.into_inner().is_result_public {
        Some(is_result_public) => ResultVisibility { is_result_public },
        None => return Err(Error::bad_request("isResultPublic parameter is required")),
    };

    if let Err(err) = ResultState::set_public(&states, visibility.is_result_public).await {
        error!("Failed to persist result visibility: {}", err);
        return Err(Error::internal("Error saving result state"));
    }

    info!(
        "Results are now {}",
        if visibility.is_result_public {
            "public"
        } else {
            "hidden"
        }
    );
    Ok(Json(ToggleResultResponse::new(visibility)))
}

/// Reject visibility changes that lack a valid admin token.
#[post("/admin/toggle-result", rank = 2)]
pub fn toggle_result_unauthorized() -> Result<Json<ToggleResultResponse>> {
    Err(Error::unauthorized("Unauthorized"))
}

#[cfg(all(test, feature = "live-db-tests"))]
mod tests {
    use mongodb::bson::doc;
    use rocket::{
        http::{ContentType, Header, Status},
        local::asynchronous::Client,
        serde::json::serde_json::{self, json, Value},
    };

    use crate::model::{
        api::auth::AUTH_TOKEN_HEADER,
        db::{admin::Admin, result_state},
    };

    use super::super::auth::admin_bearer;
    use super::*;

    #[backend_test]
    async fn toggle_as_admin(client: Client, states: Coll<ResultState>) {
        let bearer = admin_bearer(&client).await;

        // Publish.
        let response = client
            .post(uri!(toggle_result))
            .header(bearer.clone())
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": true }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({
                "success": true,
                "message": "Results published successfully",
                "data": { "isResultPublic": true },
            }),
            body
        );
        assert!(ResultState::is_public(&states).await.unwrap());

        // Hide again.
        let response = client
            .post(uri!(toggle_result))
            .header(bearer)
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": false }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Ok, response.status());
        let body: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({
                "success": true,
                "message": "Results hidden successfully",
                "data": { "isResultPublic": false },
            }),
            body
        );
        assert!(!ResultState::is_public(&states).await.unwrap());
    }

    #[backend_test]
    async fn toggle_without_token(client: Client, states: Coll<ResultState>) {
        let response = client
            .post(uri!(toggle_result))
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": true }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(json!({ "success": false, "message": "Unauthorized" }), error);

        // The flag must be untouched.
        assert!(!ResultState::is_public(&states).await.unwrap());
    }

    #[backend_test]
    async fn toggle_with_garbage_token(client: Client) {
        let response = client
            .post(uri!(toggle_result))
            .header(Header::new(AUTH_TOKEN_HEADER, "Bearer not-a-real-token"))
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": true }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(json!({ "success": false, "message": "Unauthorized" }), error);
    }

    #[backend_test]
    async fn toggle_with_revoked_admin(client: Client, admins: Coll<Admin>) {
        let bearer = admin_bearer(&client).await;

        // Deleting the admin invalidates their outstanding token.
        admins.delete_many(doc! {}, None).await.unwrap();

        let response = client
            .post(uri!(toggle_result))
            .header(bearer)
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": true }).to_string())
            .dispatch()
            .await;

        assert_eq!(Status::Unauthorized, response.status());
    }

    #[backend_test]
    async fn toggle_missing_parameter(client: Client, states: Coll<ResultState>) {
        let bearer = admin_bearer(&client).await;

        let response = client
            .post(uri!(toggle_result))
            .header(bearer)
            .header(ContentType::JSON)
            .body("{}")
            .dispatch()
            .await;

        assert_eq!(Status::BadRequest, response.status());
        let error: Value = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(
            json!({
                "success": false,
                "message": "isResultPublic parameter is required",
            }),
            error
        );

        assert!(!ResultState::is_public(&states).await.unwrap());
    }

    #[backend_test]
    async fn visibility_survives_reads(client: Client, states: Coll<ResultState>) {
        let bearer = admin_bearer(&client).await;

        let response = client
            .post(uri!(toggle_result))
            .header(bearer)
            .header(ContentType::JSON)
            .body(json!({ "isResultPublic": true }).to_string())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        // Reading results must not flip the stored flag.
        let response = client
            .get(uri!(super::super::public::results_non_admin))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let state = states
            .find_one(doc! { "_id": result_state::RESULT_STATE_ID }, None)
            .await
            .unwrap()
            .unwrap();
        assert!(state.is_result_public);
    }
}
