use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use hmac::Hmac;
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime, to_bson};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::Config,
    error::Result,
    model::{
        api::voter::Aadhaar,
        mongodb::{Coll, Id},
    },
};

pub type HmacSha256 = Hmac<Sha256>;

/// Core voter data, as stored in the database.
///
/// A document only exists once its credential has cast a vote; there is
/// deliberately no record of which party was chosen.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterCore {
    /// Voter unique ID: the HMAC of their Aadhaar number.
    pub aadhaar_hmac: Vec<u8>,
    /// When the vote was cast.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub voted_at: DateTime<Utc>,
}

impl VoterCore {
    /// Create a new Voter.
    pub fn new(aadhaar: Aadhaar, config: &Config) -> Self {
        Self {
            // Do not directly store the sensitive raw Aadhaar number.
            aadhaar_hmac: aadhaar.into_hmac(config),
            voted_at: Utc::now(),
        }
    }
}

/// A voter without an ID.
pub type NewVoter = VoterCore;

/// A voter from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Voter {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub voter: VoterCore,
}

impl Deref for Voter {
    type Target = VoterCore;

    fn deref(&self) -> &Self::Target {
        &self.voter
    }
}

impl DerefMut for Voter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.voter
    }
}

/// Check whether the credential behind the given HMAC has already voted.
pub async fn has_voted(voters: &Coll<Voter>, aadhaar_hmac: &[u8]) -> Result<bool> {
    let filter = doc! {
        "aadhaar_hmac": to_bson(aadhaar_hmac).expect("HMAC serialization does not fail"),
    };
    Ok(voters.find_one(filter, None).await?.is_some())
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoterCore {
        pub fn example(config: &Config) -> Self {
            Self::new(Aadhaar::example(), config)
        }
    }
}
