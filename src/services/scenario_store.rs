use std::sync::RwLock;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::domain::scenario::Scenario;
use crate::services::data_source::{ScenarioStore, StoreError};

struct ScenarioTable {
    next_id: u64,
    scenarios: Vec<Scenario>,
}

/// Scenario table held in memory. Ids count up from 1 like an autoincrement key.
pub struct InMemoryScenarioStore {
    table: RwLock<ScenarioTable>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ScenarioTable {
                next_id: 1,
                scenarios: Vec::new(),
            }),
        }
    }

    /// Builds a store holding `scenarios`. New ids continue after the largest numeric seed id.
    pub fn with_scenarios(scenarios: Vec<Scenario>) -> Result<Self, StoreError> {
        let mut table = ScenarioTable {
            next_id: 1,
            scenarios: Vec::with_capacity(scenarios.len()),
        };
        for scenario in scenarios {
            if table.scenarios.iter().any(|known| known.id == scenario.id) {
                return Err(StoreError::InvalidRecord(format!(
                    "duplicate scenario id {}",
                    scenario.id
                )));
            }
            if let Ok(numeric) = scenario.id.parse::<u64>() {
                let after = numeric.checked_add(1).ok_or_else(|| {
                    StoreError::InvalidRecord(format!(
                        "scenario id {numeric} leaves no room for new ids"
                    ))
                })?;
                table.next_id = table.next_id.max(after);
            }
            table.scenarios.push(scenario);
        }
        Ok(Self {
            table: RwLock::new(table),
        })
    }
}

impl Default for InMemoryScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioStore for InMemoryScenarioStore {
    fn get(&self, id: &str) -> Result<Option<Scenario>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table
            .scenarios
            .iter()
            .find(|scenario| scenario.id == id)
            .cloned())
    }

    fn save(&self, scenario_name: &str, inputs: Map<String, Value>) -> Result<String, StoreError> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        let next_id = table
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidRecord("scenario ids exhausted".to_string()))?;
        let id = table.next_id.to_string();
        table.next_id = next_id;
        table.scenarios.push(Scenario {
            id: id.clone(),
            scenario_name: scenario_name.to_string(),
            inputs,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn list(&self) -> Result<Vec<Scenario>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        let mut scenarios = table.scenarios.clone();
        scenarios.sort_by(|a, b| id_order_key(&a.id).cmp(&id_order_key(&b.id)));
        Ok(scenarios)
    }
}

/// Numeric ids sort by value and come first; other ids follow in lexical order.
fn id_order_key(id: &str) -> (bool, u64, &str) {
    match id.parse::<u64>() {
        Ok(numeric) => (false, numeric, id),
        Err(_) => (true, 0, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::example_payload;

    fn seeded(id: &str, name: &str) -> Scenario {
        Scenario {
            id: id.to_string(),
            scenario_name: name.to_string(),
            inputs: example_payload(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn save_assigns_sequential_ids() {
        let store = InMemoryScenarioStore::new();
        assert_eq!(store.save("first", Map::new()).unwrap(), "1");
        assert_eq!(store.save("second", example_payload()).unwrap(), "2");

        let second = store.get("2").unwrap().unwrap();
        assert_eq!(second.scenario_name, "second");
        assert_eq!(second.inputs, example_payload());
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let store = InMemoryScenarioStore::new();
        assert!(store.get("42").unwrap().is_none());
    }

    #[test]
    fn with_scenarios_continues_after_largest_seed_id() {
        let store = InMemoryScenarioStore::with_scenarios(vec![
            seeded("7", "seven"),
            seeded("baseline", "named"),
        ])
        .unwrap();

        assert_eq!(store.save("next", Map::new()).unwrap(), "8");
        let names: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|scenario| scenario.scenario_name)
            .collect();
        assert_eq!(names, vec!["seven", "next", "named"]);
    }

    #[test]
    fn list_is_in_id_order() {
        let store = InMemoryScenarioStore::with_scenarios(vec![
            seeded("10", "ten"),
            seeded("beta", "b"),
            seeded("3", "three"),
            seeded("alpha", "a"),
            seeded("1", "one"),
        ])
        .unwrap();

        let ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|scenario| scenario.id)
            .collect();
        assert_eq!(ids, vec!["1", "3", "10", "alpha", "beta"]);
    }

    #[test]
    fn with_scenarios_rejects_seed_id_at_the_top_of_the_range() {
        let result = InMemoryScenarioStore::with_scenarios(vec![seeded(&u64::MAX.to_string(), "max")]);
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }

    #[test]
    fn save_reports_exhausted_ids_without_poisoning_the_store() {
        let store =
            InMemoryScenarioStore::with_scenarios(vec![seeded(&(u64::MAX - 1).to_string(), "last")])
                .unwrap();

        let err = store.save("overflow", Map::new()).unwrap_err();

        assert!(matches!(err, StoreError::InvalidRecord(_)));
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(store.get(&(u64::MAX - 1).to_string()).unwrap().is_some());
    }

    #[test]
    fn with_scenarios_rejects_duplicate_ids() {
        let result =
            InMemoryScenarioStore::with_scenarios(vec![seeded("1", "a"), seeded("1", "b")]);
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }
}
