use std::collections::HashMap;

use mongodb::{bson::doc, options::UpdateOptions, ClientSession};
use rocket::futures::TryStreamExt;
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::party::{self, PartyId},
    mongodb::Coll,
};

/// Running vote count for a single party, keyed by the party's ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyTally {
    #[serde(rename = "_id")]
    pub party_id: PartyId,
    pub votes: u64,
}

impl PartyTally {
    /// Atomically add one vote to the given party's tally, inside the caller's
    /// transaction.
    pub async fn increment(
        tallies: &Coll<PartyTally>,
        session: &mut ClientSession,
        party_id: &str,
    ) -> Result<()> {
        let update = doc! {
            "$inc": { "votes": 1 }
        };
        let result = tallies
            .update_one_with_session(doc! { "_id": party_id }, update, None, session)
            .await?;
        if result.matched_count != 1 {
            return Err(Error::Status(
                Status::InternalServerError,
                format!("Failed to find tally for party {}", party_id),
            ));
        }
        Ok(())
    }

    /// Read every party's count into the wire-format map.
    pub async fn votes_by_party(tallies: &Coll<PartyTally>) -> Result<HashMap<PartyId, u64>> {
        let votes = tallies
            .find(None, None)
            .await?
            .map_ok(|tally| (tally.party_id, tally.votes))
            .try_collect::<HashMap<_, _>>()
            .await?;
        Ok(votes)
    }
}

/// Ensure every registered party has a tally document, seeding zeroes for any
/// that are missing. Existing counts are left untouched.
///
/// This operation is idempotent.
pub async fn ensure_tallies_exist(tallies: &Coll<PartyTally>) -> Result<()> {
    for party in party::all() {
        let update = doc! {
            "$setOnInsert": { "votes": 0_i64 }
        };
        let options = UpdateOptions::builder().upsert(true).build();
        tallies
            .update_one(doc! { "_id": &party.id }, update, options)
            .await?;
    }
    Ok(())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl PartyTally {
        pub fn example() -> Self {
            Self {
                party_id: "inc".to_string(),
                votes: 3,
            }
        }
    }
}
