use mongodb::{bson::doc, options::UpdateOptions};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

/// Well-known ID of the singleton visibility document.
pub const RESULT_STATE_ID: &str = "result_state";

/// Singleton document recording whether results are publicly visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultState {
    #[serde(rename = "_id")]
    pub id: String,
    pub is_result_public: bool,
}

impl ResultState {
    /// Read the current visibility flag.
    pub async fn is_public(states: &Coll<ResultState>) -> Result<bool> {
        let state = states
            .find_one(doc! { "_id": RESULT_STATE_ID }, None)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    "Result state document is missing".to_string(),
                )
            })?;
        Ok(state.is_result_public)
    }

    /// Persist a new visibility flag.
    pub async fn set_public(states: &Coll<ResultState>, is_public: bool) -> Result<()> {
        let update = doc! {
            "$set": { "is_result_public": is_public }
        };
        let result = states
            .update_one(doc! { "_id": RESULT_STATE_ID }, update, None)
            .await?;
        if result.matched_count != 1 {
            return Err(Error::Status(
                Status::InternalServerError,
                "Result state document is missing".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ensure the visibility document exists, seeding it hidden if missing.
/// An existing flag is left untouched.
///
/// This operation is idempotent.
pub async fn ensure_result_state_exists(states: &Coll<ResultState>) -> Result<()> {
    let update = doc! {
        "$setOnInsert": { "is_result_public": false }
    };
    let options = UpdateOptions::builder().upsert(true).build();
    states
        .update_one(doc! { "_id": RESULT_STATE_ID }, update, options)
        .await?;
    Ok(())
}
