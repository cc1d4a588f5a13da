use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub id: String,
    pub email: String,
    pub scenario_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
