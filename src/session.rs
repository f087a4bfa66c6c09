use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SessionEntry<T> {
    payload: T,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<T> SessionEntry<T> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

/// In-process session storage with lazy expiry.
///
/// Expired entries are dropped on lookup and swept on every `create` and
/// `count`; there is no background timer. A lookup never returns an entry
/// past its deadline, whether or not a sweep has run since.
pub struct SessionStore<T> {
    entries: Mutex<HashMap<String, SessionEntry<T>>>,
    ttl: chrono::Duration,
}

impl<T: Clone> SessionStore<T> {
    pub fn new(ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(30));
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn create(&self, payload: T) -> String {
        self.create_at(payload, Utc::now())
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.get_at(id, Utc::now())
    }

    pub fn delete(&self, id: &str) -> bool {
        self.entries.lock().remove(id).is_some()
    }

    /// Live session count, for diagnostics.
    pub fn count(&self) -> usize {
        self.count_at(Utc::now())
    }

    fn create_at(&self, payload: T, now: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            payload,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut entries = self.entries.lock();
        entries.insert(id.clone(), entry);
        let swept = sweep_expired(&mut entries, now);
        if swept > 0 {
            debug!("Swept {swept} expired session(s); {} live", entries.len());
        }
        id
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<T> {
        let mut entries = self.entries.lock();
        match entries.get(id) {
            None => None,
            Some(entry) if entry.is_live(now) => Some(entry.payload.clone()),
            Some(entry) => {
                debug!(
                    "Session {id} created at {} expired; removed on lookup",
                    entry.created_at.to_rfc3339()
                );
                entries.remove(id);
                None
            }
        }
    }

    fn count_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        sweep_expired(&mut entries, now);
        entries.len()
    }
}

fn sweep_expired<T>(entries: &mut HashMap<String, SessionEntry<T>>, now: DateTime<Utc>) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn store() -> SessionStore<Value> {
        SessionStore::new(Duration::from_secs(30 * 60))
    }

    #[test]
    fn get_returns_exactly_what_was_stored() {
        let store = store();
        let payload = json!({
            "product": "bag",
            "ideas": [{ "id": "I1", "title": "Marble", "shot_keywords": ["flatlay"] }],
            "include_model": false
        });
        let id = store.create(payload.clone());
        assert_eq!(store.get(&id), Some(payload));
    }

    #[test]
    fn unknown_and_expired_ids_look_the_same() {
        let store = store();
        let now = Utc::now();
        let id = store.create_at(json!({ "product": "bag" }), now);

        assert_eq!(store.get_at("never-issued", now), None);

        let later = now + chrono::Duration::minutes(31);
        assert_eq!(store.get_at(&id, later), None);
        assert_eq!(store.get_at(&id, later), None);
        assert_eq!(store.get_at(&id, now), None, "expired entry must be gone");
    }

    #[test]
    fn session_is_live_at_its_deadline() {
        let store = store();
        let now = Utc::now();
        let id = store.create_at(json!(1), now);
        assert_eq!(store.get_at(&id, now + chrono::Duration::minutes(30)), Some(json!(1)));
    }

    #[test]
    fn create_sweeps_expired_entries() {
        let store = store();
        let now = Utc::now();
        store.create_at(json!("old"), now);
        store.create_at(json!("old"), now);

        let later = now + chrono::Duration::hours(1);
        let fresh = store.create_at(json!("new"), later);
        assert_eq!(store.entries.lock().len(), 1);
        assert!(store.entries.lock().contains_key(&fresh));
    }

    #[test]
    fn count_ignores_expired_entries() {
        let store = store();
        let now = Utc::now();
        store.create_at(json!("a"), now - chrono::Duration::hours(1));
        store.create_at(json!("b"), now);
        assert_eq!(store.count_at(now), 1);
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let store = store();
        let id = store.create(json!({}));
        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn huge_ttl_saturates_instead_of_overflowing() {
        let store: SessionStore<Value> = SessionStore::new(Duration::from_secs(9_000_000_000_000));
        let id = store.create(json!({"product": "lamp"}));
        assert_eq!(store.get(&id), Some(json!({"product": "lamp"})));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn concurrent_creates_never_share_ids() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .map(|n| store.create(json!({ "worker": worker, "n": n })))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(store.count(), 800);
    }
}
