use serde::{Deserialize, Serialize};

/// Body of `POST /vote`: a vote that the voter wishes to cast for a specific
/// registered party.
///
/// Fields are raw optional strings so the handler can reproduce the portal's
/// staged validation messages instead of failing wholesale at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub aadhaar: Option<String>,
    pub party: Option<String>,
}

/// Successful response to `POST /vote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub success: bool,
    pub message: String,
}

impl VoteReceipt {
    pub fn recorded() -> Self {
        Self {
            success: true,
            message: "Vote recorded successfully".to_string(),
        }
    }
}
