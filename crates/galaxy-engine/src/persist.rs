//! Player position persistence.
//!
//! The position is stored as `{"x": n, "y": n}` under a single key. The
//! backing store is a trait so the map runs the same against browser
//! `localStorage` and an in-memory store in tests.

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::world::{wrap, WorldState};
use crate::error::{MapError, MapResult};

pub const STORAGE_KEY: &str = "xenopets-player-position";

/// Durable key/value slot holding the serialized position.
pub trait PositionStore {
    fn load(&self) -> MapResult<Option<String>>;
    fn save(&mut self, value: &str) -> MapResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct StoredPosition {
    x: f32,
    y: f32,
}

pub fn encode(position: Vec2) -> MapResult<String> {
    serde_json::to_string(&StoredPosition {
        x: position.x,
        y: position.y,
    })
    .map_err(|e| MapError::Storage(e.to_string()))
}

/// Parse a stored position. Only a `{"x", "y"}` object is accepted;
/// anything else, including non-finite numbers, yields `None`.
/// Out-of-range coordinates are wrapped into the world.
pub fn decode(raw: &str, width: f32, height: f32) -> Option<Vec2> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if !value.is_object() {
        return None;
    }
    let stored: StoredPosition = serde_json::from_value(value).ok()?;
    if !stored.x.is_finite() || !stored.y.is_finite() {
        return None;
    }
    Some(Vec2::new(wrap(stored.x, 0.0, width), wrap(stored.y, 0.0, height)))
}

/// Read the start position, falling back to the world center.
pub fn restore(store: &dyn PositionStore, width: f32, height: f32) -> Vec2 {
    let center = WorldState::center(width, height);
    match store.load() {
        Ok(Some(raw)) => decode(&raw, width, height).unwrap_or_else(|| {
            warn!("Ignoring malformed stored position: {}", raw);
            center
        }),
        Ok(None) => center,
        Err(e) => {
            warn!("{}", e);
            center
        }
    }
}

/// A store plus the last position written to it.
pub struct Persistence {
    store: Box<dyn PositionStore>,
    last_saved: Option<Vec2>,
}

impl Persistence {
    pub fn new(store: Box<dyn PositionStore>) -> Self {
        Self {
            store,
            last_saved: None,
        }
    }

    pub fn restore(&self, width: f32, height: f32) -> Vec2 {
        restore(self.store.as_ref(), width, height)
    }

    /// Write unconditionally. Failures are logged and swallowed.
    pub fn save(&mut self, position: Vec2) -> bool {
        let result = encode(position).and_then(|json| self.store.save(&json));
        match result {
            Ok(()) => {
                debug!("Saved position ({:.2}, {:.2})", position.x, position.y);
                self.last_saved = Some(position);
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Write only if the position moved since the last successful save.
    pub fn save_if_changed(&mut self, position: Vec2) -> bool {
        if self.last_saved == Some(position) {
            return false;
        }
        self.save(position)
    }

    /// Mark `position` as already stored (e.g. right after restoring it).
    pub fn mark_saved(&mut self, position: Vec2) {
        self.last_saved = Some(position);
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<String>,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_owned()),
            ..Self::default()
        }
    }
}

impl PositionStore for MemoryStore {
    fn load(&self) -> MapResult<Option<String>> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> MapResult<()> {
        if self.fail_writes {
            return Err(MapError::Storage("quota exceeded".into()));
        }
        self.value = Some(value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// Shares one `MemoryStore` between a map and the test that inspects it.
#[cfg(test)]
pub(crate) mod shared {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

    impl PositionStore for SharedStore {
        fn load(&self) -> MapResult<Option<String>> {
            self.0.borrow().load()
        }

        fn save(&mut self, value: &str) -> MapResult<()> {
            self.0.borrow_mut().save(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_xy_object() {
        let json = encode(Vec2::new(12.5, 80.0)).unwrap();
        assert_eq!(json, r#"{"x":12.5,"y":80.0}"#);
        assert_eq!(decode(&json, 200.0, 200.0), Some(Vec2::new(12.5, 80.0)));
    }

    #[test]
    fn malformed_falls_back_to_center() {
        for raw in ["", "null", "{\"x\":1}", "[1,2]", "{\"x\":\"a\",\"y\":2}", "garbage"] {
            let store = MemoryStore::with_value(raw);
            assert_eq!(restore(&store, 200.0, 200.0), Vec2::new(100.0, 100.0), "input {:?}", raw);
        }
    }

    #[test]
    fn only_xy_objects_decode() {
        assert_eq!(decode("[1,2]", 200.0, 200.0), None);
        assert_eq!(decode("[1.0,2.0,3.0]", 200.0, 200.0), None);
        assert_eq!(decode("42", 200.0, 200.0), None);
        assert_eq!(decode(r#"{"y":2,"x":1,"extra":true}"#, 200.0, 200.0), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn missing_value_is_center() {
        assert_eq!(restore(&MemoryStore::new(), 300.0, 100.0), Vec2::new(150.0, 50.0));
    }

    #[test]
    fn out_of_range_is_wrapped() {
        assert_eq!(decode(r#"{"x":-10,"y":250}"#, 200.0, 200.0), Some(Vec2::new(190.0, 50.0)));
    }

    #[test]
    fn save_if_changed_skips_repeats() {
        let shared = shared::SharedStore::default();
        let mut p = Persistence::new(Box::new(shared.clone()));
        assert!(p.save_if_changed(Vec2::new(1.0, 2.0)));
        assert!(!p.save_if_changed(Vec2::new(1.0, 2.0)));
        assert!(p.save_if_changed(Vec2::new(1.5, 2.0)));
        assert_eq!(shared.0.borrow().writes, 2);
    }

    #[test]
    fn write_failure_is_swallowed() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let mut p = Persistence::new(Box::new(store));
        assert!(!p.save(Vec2::new(5.0, 5.0)));
        // Not recorded, so the next throttled save retries
        assert!(!p.save_if_changed(Vec2::new(5.0, 5.0)));
    }
}
