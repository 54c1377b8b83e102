use rocket::{serde::json::Json, Route};

use crate::error::Result;
use crate::model::{
    api::{
        auth::AdminToken,
        results::{PartiesResponse, ResultsBreakdown, ResultsResponse},
    },
    db::{result_state::ResultState, tally::PartyTally},
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![results_admin, results_non_admin, parties]
}

/// Admins always see the full breakdown, published or not.
#[get("/results", rank = 1)]
pub async fn results_admin(
    _token: AdminToken,
    tallies: Coll<PartyTally>,
    states: Coll<ResultState>,
) -> Result<Json<ResultsResponse>> {
    let is_public = ResultState::is_public(&states).await?;
    full_breakdown(&tallies, is_public).await
}

/// Everyone else only sees the breakdown once results are published.
#[get("/results", rank = 2)]
pub async fn results_non_admin(
    tallies: Coll<PartyTally>,
    states: Coll<ResultState>,
) -> Result<Json<ResultsResponse>> {
    let is_public = ResultState::is_public(&states).await?;
    if !is_public {
        return Ok(Json(ResultsResponse::withheld()));
    }
    full_breakdown(&tallies, is_public).await
}

/// The party register shown on the voting screen.
#[get("/parties")]
pub async fn parties() -> Json<PartiesResponse> {
    Json(PartiesResponse::new())
}

async fn full_breakdown(
    tallies: &Coll<PartyTally>,
    is_public: bool,
) -> Result<Json<ResultsResponse>> {
    let votes = PartyTally::votes_by_party(tallies).await?;
    Ok(Json(ResultsResponse::breakdown(ResultsBreakdown::new(
        votes, is_public,
    ))))
}
