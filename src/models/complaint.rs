use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body for POST /complaints.
/// Images are attached afterwards with the id the server assigns.
#[derive(Debug, Clone, Serialize)]
pub struct CreateComplaint {
    pub location: String,
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub location: String,
    pub detail: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}
