use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::common::party::{self, Party, PartyId};

/// Full tally breakdown, only exposed once published (or to an admin).
///
/// The mixed naming (`total_votes` next to `isResultPublic`) is the portal's
/// historical wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsBreakdown {
    pub votes: HashMap<PartyId, u64>,
    pub total_votes: u64,
    pub parties: Vec<Party>,
    #[serde(rename = "isResultPublic")]
    pub is_result_public: bool,
}

impl ResultsBreakdown {
    /// Assemble the breakdown from the tally map, deriving the total and
    /// attaching the party register.
    pub fn new(votes: HashMap<PartyId, u64>, is_result_public: bool) -> Self {
        let total_votes = votes.values().sum();
        Self {
            votes,
            total_votes,
            parties: party::all().to_vec(),
            is_result_public,
        }
    }
}

/// Placeholder served to the public while results are withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsWithheld {
    #[serde(rename = "isResultPublic")]
    pub is_result_public: bool,
    pub message: String,
}

impl ResultsWithheld {
    pub fn new() -> Self {
        Self {
            is_result_public: false,
            message: "Results have not been published yet".to_string(),
        }
    }
}

impl Default for ResultsWithheld {
    fn default() -> Self {
        Self::new()
    }
}

/// Either shape of the `data` field of `GET /results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultsData {
    Breakdown(ResultsBreakdown),
    Withheld(ResultsWithheld),
}

/// Response to `GET /results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub success: bool,
    pub data: ResultsData,
}

impl ResultsResponse {
    pub fn breakdown(breakdown: ResultsBreakdown) -> Self {
        Self {
            success: true,
            data: ResultsData::Breakdown(breakdown),
        }
    }

    pub fn withheld() -> Self {
        Self {
            success: true,
            data: ResultsData::Withheld(ResultsWithheld::new()),
        }
    }
}

/// Response to `GET /parties`: the full party register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartiesResponse {
    pub success: bool,
    pub data: Vec<Party>,
}

impl PartiesResponse {
    pub fn new() -> Self {
        Self {
            success: true,
            data: party::all().to_vec(),
        }
    }
}

impl Default for PartiesResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::{json, Value};

    use super::*;

    #[test]
    fn total_is_sum_of_votes() {
        let votes = HashMap::from([
            ("bjp".to_string(), 3),
            ("inc".to_string(), 2),
            ("aap".to_string(), 0),
            ("sp".to_string(), 1),
        ]);
        let breakdown = ResultsBreakdown::new(votes, true);
        assert_eq!(breakdown.total_votes, 6);
        assert_eq!(breakdown.parties.len(), 4);
    }

    #[test]
    fn breakdown_wire_shape() {
        let votes = HashMap::from([("inc".to_string(), 2)]);
        let response = ResultsResponse::breakdown(ResultsBreakdown {
            votes,
            total_votes: 2,
            parties: vec![party::find("inc").unwrap().clone()],
            is_result_public: true,
        });

        let value: Value =
            rocket::serde::json::from_str(&rocket::serde::json::to_string(&response).unwrap())
                .unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {
                    "votes": { "inc": 2 },
                    "total_votes": 2,
                    "parties": [{
                        "id": "inc",
                        "name": "Indian National Congress",
                        "work": "RTI, MNREGA",
                    }],
                    "isResultPublic": true,
                },
            })
        );
    }

    #[test]
    fn withheld_wire_shape() {
        let value: Value = rocket::serde::json::from_str(
            &rocket::serde::json::to_string(&ResultsResponse::withheld()).unwrap(),
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {
                    "isResultPublic": false,
                    "message": "Results have not been published yet",
                },
            })
        );
    }

    #[test]
    fn parties_wire_shape() {
        let value: Value = rocket::serde::json::from_str(
            &rocket::serde::json::to_string(&PartiesResponse::new()).unwrap(),
        )
        .unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"].as_array().unwrap().len(), party::all().len());
        assert_eq!(value["data"][0]["id"], json!("bjp"));
    }

    #[test]
    fn data_deserialises_to_the_right_variant() {
        let withheld: ResultsData = rocket::serde::json::from_str(
            r#"{"isResultPublic":false,"message":"Results have not been published yet"}"#,
        )
        .unwrap();
        assert!(matches!(withheld, ResultsData::Withheld(_)));

        let breakdown: ResultsData = rocket::serde::json::from_str(
            r#"{"votes":{},"total_votes":0,"parties":[],"isResultPublic":true}"#,
        )
        .unwrap();
        assert!(matches!(breakdown, ResultsData::Breakdown(_)));
    }
}
