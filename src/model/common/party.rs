use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// A party identifier, as used in vote requests and tally keys.
pub type PartyId = String;

/// A political party registered for this election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    /// Headline work/promises shown to voters.
    pub work: String,
}

lazy_static! {
    /// The fixed party register for this deployment.
    static ref REGISTER: Vec<Party> = vec![
        Party {
            id: "bjp".to_string(),
            name: "Bharatiya Janata Party".to_string(),
            work: "Digital India, Make in India".to_string(),
        },
        Party {
            id: "inc".to_string(),
            name: "Indian National Congress".to_string(),
            work: "RTI, MNREGA".to_string(),
        },
        Party {
            id: "aap".to_string(),
            name: "Aam Aadmi Party".to_string(),
            work: "Free electricity, Education reform".to_string(),
        },
        Party {
            id: "sp".to_string(),
            name: "Bahujan Samaj Party".to_string(),
            work: "Rural development, Infrastructure".to_string(),
        },
    ];
}

/// All registered parties, in registration order.
pub fn all() -> &'static [Party] {
    &REGISTER
}

/// Look up a registered party by ID.
pub fn find(id: &str) -> Option<&'static Party> {
    REGISTER.iter().find(|party| party.id == id)
}
