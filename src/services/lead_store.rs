use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::lead::Lead;
use crate::services::data_source::{LeadStore, StoreError};

/// Keeps leads for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads
            .lock()
            .map(|leads| leads.clone())
            .unwrap_or_default()
    }
}

impl LeadStore for InMemoryLeadStore {
    fn save(&self, email: &str, scenario_id: Option<&str>) -> Result<String, StoreError> {
        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            scenario_id: scenario_id.map(str::to_string),
            created_at: Utc::now(),
        };
        let id = lead.id.clone();
        self.leads
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(lead);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_returns_distinct_ids() {
        let store = InMemoryLeadStore::new();
        let first = store.save("a@example.com", None).unwrap();
        let second = store.save("b@example.com", Some("4")).unwrap();

        assert_ne!(first, second);
        let leads = store.leads();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[1].email, "b@example.com");
        assert_eq!(leads[1].scenario_id.as_deref(), Some("4"));
    }
}
