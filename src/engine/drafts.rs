use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::models::draft::Draft;

/// One draft per agent id. Merges extend the existing draft; there is never
/// more than one in-progress draft for a given agent.
pub struct DraftStore {
    drafts: DashMap<String, Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    pub fn get(&self, agent: &str) -> Option<Draft> {
        self.drafts.get(agent).map(|entry| entry.value().clone())
    }

    /// Shallow merge; no validation happens here. Any shape of partial is
    /// accepted and completeness is only checked at commit.
    pub fn merge(&self, agent: &str, patch: Draft) -> Draft {
        let mut entry = self.drafts.entry(agent.to_string()).or_default();
        entry.apply(patch);
        entry.clone()
    }

    /// Idempotent: clearing an absent draft is a no-op.
    pub fn clear(&self, agent: &str) {
        self.drafts.remove(agent);
    }

    /// Runs `f` against the agent's draft while holding its entry lock and
    /// removes the draft only when `f` succeeds. Concurrent callers for the
    /// same agent serialize here: the loser runs against an empty draft.
    pub fn take_on_success<T, E>(
        &self,
        agent: &str,
        f: impl FnOnce(&Draft) -> Result<T, E>,
    ) -> Result<T, E> {
        match self.drafts.entry(agent.to_string()) {
            Entry::Occupied(entry) => {
                let value = f(entry.get())?;
                entry.remove();
                Ok(value)
            }
            Entry::Vacant(_) => f(&Draft::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::DraftStore;
    use crate::models::draft::{Draft, ServiceType};

    #[test]
    fn merge_accumulates_fields_across_steps() {
        let store = DraftStore::new();

        store.merge(
            "agent-1",
            Draft {
                service_type: Some(ServiceType::Ride),
                ..Draft::default()
            },
        );
        let merged = store.merge(
            "agent-1",
            Draft {
                pickup: Some("Main St".to_string()),
                ..Draft::default()
            },
        );

        assert_eq!(merged.service_type, Some(ServiceType::Ride));
        assert_eq!(merged.pickup.as_deref(), Some("Main St"));
        assert_eq!(store.get("agent-1"), Some(merged));
    }

    #[test]
    fn drafts_are_isolated_per_agent() {
        let store = DraftStore::new();
        store.merge(
            "agent-1",
            Draft {
                pickup: Some("A".to_string()),
                ..Draft::default()
            },
        );

        assert!(store.get("agent-2").is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let store = DraftStore::new();
        store.merge("agent-1", Draft::default());

        store.clear("agent-1");
        store.clear("agent-1");

        assert!(store.get("agent-1").is_none());
    }
}
