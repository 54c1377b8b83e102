use mongodb::Client;
use rocket::{serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            ballot::{VoteReceipt, VoteRequest},
            voter::Aadhaar,
        },
        common::party,
        db::{
            tally::PartyTally,
            voter::{self, NewVoter, Voter},
        },
        mongodb::{errors::is_duplicate_key_error, Coll},
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![vote]
}

/// Cast a vote: record that the credential has voted and bump the chosen
/// party's tally, in a single transaction.
///
/// The up-front `has_voted` check gives repeat voters a clean rejection; the
/// unique index on the credential HMAC settles any race between concurrent
/// votes, surfacing as a duplicate key error on the insert.
#[post("/vote", data = "<request>", format = "json")]
pub async fn vote(
    request: Json<VoteRequest>,
    voters: Coll<Voter>,
    new_voters: Coll<NewVoter>,
    tallies: Coll<PartyTally>,
    db_client: &State<Client>,
    config: &State<Config>,
) -> Result<Json<VoteReceipt>> {
    let request = request.into_inner();

    let (aadhaar, party_id) = match (request.aadhaar, request.party) {
        (Some(aadhaar), Some(party_id)) if !aadhaar.is_empty() && !party_id.is_empty() => {
            (aadhaar, party_id)
        }
        _ => return Err(Error::bad_request("Missing aadhaar or party_id")),
    };

    let aadhaar = aadhaar
        .parse::<Aadhaar>()
        .map_err(|_| Error::bad_request("Invalid Aadhaar number format. Must be 12 digits."))?;

    let new_voter = NewVoter::new(aadhaar, config);
    if voter::has_voted(&voters, &new_voter.aadhaar_hmac).await? {
        return Err(Error::forbidden("Already voted"));
    }

    if party::find(&party_id).is_none() {
        return Err(Error::bad_request(format!("Invalid party ID: {}", party_id)));
    }

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;

    let insertion = new_voters
        .insert_one_with_session(&new_voter, None, &mut session)
        .await;
    if is_duplicate_key_error(insertion.as_ref()) {
        // Lost the race against a concurrent vote with the same credential.
        return Err(Error::forbidden("Already voted"));
    }
    if let Err(err) = insertion {
        error!("Failed to record voter: {}", err);
        return Err(Error::internal("Error saving vote data"));
    }

    if let Err(err) = PartyTally::increment(&tallies, &mut session, &party_id).await {
        error!("Failed to increment tally: {}", err);
        return Err(Error::internal("Error saving vote data"));
    }

    if let Err(err) = session.commit_transaction().await {
        error!("Failed to commit vote: {}", err);
        return Err(Error::internal("Error saving vote data"));
    }

    info!("Vote recorded for party '{}'", party_id);
    Ok(Json(VoteReceipt::recorded()))
}
