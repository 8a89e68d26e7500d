//! Priority-ordered model pool.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tracing::info;

use crate::model::ModelState;

/// Priority-ordered pool of backend models with per-model cooldowns.
///
/// The id set is fixed at construction; only the ranking changes. `order`
/// is always a permutation of the map's keys, including after a `reorder`
/// with unknown ids, duplicates, or a partial list.
#[derive(Debug)]
pub struct ModelPool {
    order: Vec<String>,
    models: HashMap<String, ModelState>,
}

/// Point-in-time view of one pool entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    pub id: String,
    pub available: bool,
    pub cooldown_remaining: Option<Duration>,
}

impl ModelPool {
    /// Build a pool from a priority-ordered id list (first = most
    /// preferred). Duplicate ids collapse to their first occurrence.
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut order = Vec::new();
        let mut models = HashMap::new();
        for id in ids {
            let id: String = id.into();
            if models.contains_key(&id) {
                continue;
            }
            models.insert(id.clone(), ModelState::new(id.clone()));
            order.push(id);
        }
        Self { order, models }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` is a known pool member.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// Current priority order, most preferred first.
    #[must_use]
    pub fn priority_order(&self) -> &[String] {
        &self.order
    }

    /// Most preferred model regardless of availability.
    #[must_use]
    pub fn best_model(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Ids usable right now, in priority order.
    pub fn available_models(&mut self) -> Vec<String> {
        self.available_models_at(Instant::now())
    }

    /// Availability-filtered order at an explicit point in time.
    pub fn available_models_at(&mut self, now: Instant) -> Vec<String> {
        let mut available = Vec::with_capacity(self.order.len());
        for id in &self.order {
            if let Some(state) = self.models.get_mut(id)
                && state.is_available_at(now)
            {
                available.push(id.clone());
            }
        }
        available
    }

    /// Most preferred model that is usable right now.
    pub fn best_available_model(&mut self) -> Option<String> {
        self.best_available_model_at(Instant::now())
    }

    pub fn best_available_model_at(&mut self, now: Instant) -> Option<String> {
        for id in &self.order {
            if let Some(state) = self.models.get_mut(id)
                && state.is_available_at(now)
            {
                return Some(id.clone());
            }
        }
        None
    }

    /// Whether `id` is known and usable right now.
    pub fn is_available(&mut self, id: &str) -> bool {
        self.is_available_at(id, Instant::now())
    }

    pub fn is_available_at(&mut self, id: &str, now: Instant) -> bool {
        self.models
            .get_mut(id)
            .is_some_and(|state| state.is_available_at(now))
    }

    /// Put a known model into cooldown. Returns `false` for unknown ids.
    pub fn disable(&mut self, id: &str, retry_after_secs: u64) -> bool {
        self.disable_at(id, Instant::now(), retry_after_secs)
    }

    pub fn disable_at(&mut self, id: &str, now: Instant, retry_after_secs: u64) -> bool {
        match self.models.get_mut(id) {
            Some(state) => {
                state.disable_at(now, retry_after_secs);
                true
            },
            None => false,
        }
    }

    /// Replace the priority order.
    ///
    /// Unknown ids are silently dropped (never added), duplicates keep
    /// their first occurrence, and known ids missing from `new_order` are
    /// appended afterward in their previous relative order. Never fails;
    /// cooldown state is untouched.
    pub fn reorder(&mut self, new_order: &[String]) {
        let mut next: Vec<String> = Vec::with_capacity(self.order.len());
        for id in new_order {
            if self.models.contains_key(id) && !next.contains(id) {
                next.push(id.clone());
            }
        }
        for id in &self.order {
            if !next.contains(id) {
                next.push(id.clone());
            }
        }
        self.order = next;
        info!(order = ?self.order, "model priority reordered");
    }

    /// Per-model snapshot in priority order, applying lazy expiry exactly
    /// like `available_models`.
    pub fn status(&mut self) -> Vec<ModelStatus> {
        self.status_at(Instant::now())
    }

    pub fn status_at(&mut self, now: Instant) -> Vec<ModelStatus> {
        let mut statuses = Vec::with_capacity(self.order.len());
        for id in &self.order {
            if let Some(state) = self.models.get_mut(id) {
                let available = state.is_available_at(now);
                statuses.push(ModelStatus {
                    id: id.clone(),
                    available,
                    cooldown_remaining: state.cooldown_remaining_at(now),
                });
            }
        }
        statuses
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pool: &ModelPool) -> Vec<&str> {
        pool.priority_order().iter().map(String::as_str).collect()
    }

    fn pool_abc() -> ModelPool {
        ModelPool::new(["a", "b", "c"])
    }

    #[test]
    fn construction_preserves_order_and_drops_duplicates() {
        let pool = ModelPool::new(["a", "b", "a", "c"]);
        assert_eq!(ids(&pool), ["a", "b", "c"]);
        assert_eq!(pool.len(), 3);
        assert!(pool.contains("b"));
        assert!(!pool.contains("d"));
    }

    #[test]
    fn best_model_ignores_availability() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("a", now, 60);
        assert_eq!(pool.best_model(), Some("a"));
        assert_eq!(pool.best_available_model_at(now), Some("b".to_string()));
    }

    #[test]
    fn available_models_filters_and_preserves_order() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("b", now, 30);
        assert_eq!(pool.available_models_at(now), ["a", "c"]);
    }

    #[test]
    fn available_models_is_stable_without_mutation() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("b", now, 30);
        let first = pool.available_models_at(now);
        let second = pool.available_models_at(now);
        assert_eq!(first, second);
    }

    #[test]
    fn disable_unknown_id_is_a_noop() {
        let mut pool = pool_abc();
        assert!(!pool.disable("nope", 5));
        assert_eq!(pool.available_models().len(), 3);
    }

    #[test]
    fn reorder_full_permutation() {
        let mut pool = pool_abc();
        pool.reorder(&["c".into(), "a".into(), "b".into()]);
        assert_eq!(ids(&pool), ["c", "a", "b"]);
    }

    #[test]
    fn reorder_drops_unknown_ids() {
        let mut pool = pool_abc();
        pool.reorder(&["ghost".into(), "b".into()]);
        assert_eq!(ids(&pool), ["b", "a", "c"]);
    }

    #[test]
    fn reorder_subset_appends_rest_in_previous_relative_order() {
        let mut pool = ModelPool::new(["a", "b", "c", "d"]);
        pool.reorder(&["c".into()]);
        assert_eq!(ids(&pool), ["c", "a", "b", "d"]);
    }

    #[test]
    fn reorder_ignores_duplicates() {
        let mut pool = pool_abc();
        pool.reorder(&["b".into(), "b".into(), "a".into()]);
        assert_eq!(ids(&pool), ["b", "a", "c"]);
    }

    #[test]
    fn reorder_empty_input_keeps_everything() {
        let mut pool = pool_abc();
        pool.reorder(&[]);
        assert_eq!(ids(&pool), ["a", "b", "c"]);
    }

    #[test]
    fn reorder_never_grows_the_pool() {
        let mut pool = pool_abc();
        pool.reorder(&["x".into(), "y".into(), "a".into(), "z".into()]);
        assert_eq!(pool.len(), 3);
        assert!(!pool.contains("x"));
    }

    #[test]
    fn reorder_preserves_cooldowns() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("a", now, 60);
        pool.reorder(&["b".into(), "a".into(), "c".into()]);
        assert_eq!(pool.available_models_at(now), ["b", "c"]);
    }

    #[test]
    fn status_reports_cooldowns_in_priority_order() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("b", now, 30);

        let statuses = pool.status_at(now);
        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].available);
        assert_eq!(statuses[0].cooldown_remaining, None);
        assert_eq!(statuses[1].id, "b");
        assert!(!statuses[1].available);
        assert_eq!(
            statuses[1].cooldown_remaining,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn status_applies_lazy_expiry() {
        let now = Instant::now();
        let mut pool = pool_abc();
        pool.disable_at("a", now, 5);

        let statuses = pool.status_at(now + Duration::from_secs(5));
        assert!(statuses[0].available);
        assert_eq!(statuses[0].cooldown_remaining, None);
    }

    #[test]
    fn all_disabled_leaves_no_available_models() {
        let now = Instant::now();
        let mut pool = pool_abc();
        for id in ["a", "b", "c"] {
            pool.disable_at(id, now, 10);
        }
        assert!(pool.available_models_at(now).is_empty());
        assert_eq!(pool.best_available_model_at(now), None);
    }
}
