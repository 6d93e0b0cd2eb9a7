//! Collision-free object identifiers

use crate::context::SceneContext;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Hands out `{kind}_{n}` ids, one counter per kind
///
/// Counters only ever grow, so an id is never handed out twice by the same
/// allocator even if the object it named was discarded. Ids already present
/// in the supplied context are skipped.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: Mutex<HashMap<String, u64>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free id for `kind`
    pub fn allocate(&self, kind: &str, context: Option<&SceneContext>) -> String {
        // A panic elsewhere cannot leave a counter half-updated.
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let counter = counters.entry(kind.to_string()).or_insert(0);

        loop {
            *counter += 1;
            let candidate = format!("{}_{}", kind, counter);
            if context.map_or(true, |ctx| !ctx.contains_id(&candidate)) {
                debug!(id = %candidate, "Allocated object id");
                return candidate;
            }
        }
    }

    /// Current counter value for `kind` (0 if never used)
    pub fn current(&self, kind: &str) -> u64 {
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(kind)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SceneObject;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids_are_distinct() {
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate("box", None), "box_1");
        assert_eq!(ids.allocate("box", None), "box_2");
        assert_eq!(ids.allocate("sphere", None), "sphere_1");
    }

    #[test]
    fn test_skips_ids_in_context() {
        let ids = IdAllocator::new();
        let ctx = SceneContext::new(vec![
            SceneObject::new("box_1", "box"),
            SceneObject::new("box_2", "box"),
            SceneObject::new("box_4", "box"),
        ]);
        assert_eq!(ids.allocate("box", Some(&ctx)), "box_3");
        assert_eq!(ids.allocate("box", Some(&ctx)), "box_5");
        assert_eq!(ids.current("box"), 5);
    }

    #[test]
    fn test_counter_never_reused() {
        let ids = IdAllocator::new();
        let _discarded = ids.allocate("conveyor", None);
        // the discarded id is not in any context, but is still not handed out again
        assert_eq!(ids.allocate("conveyor", Some(&SceneContext::default())), "conveyor_2");
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..50).map(|_| ids.allocate("box", None)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id");
            }
        }
        assert_eq!(seen.len(), 400);
        assert_eq!(ids.current("box"), 400);
    }
}
