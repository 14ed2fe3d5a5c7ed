use serde::{Deserialize, Serialize};

/// json payload for every failed relay request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
