use std::path::Path;

use tracing::debug;

use blaster_core::error::BlasterError;
use blaster_core::event::LogEntry;

use crate::ledger::Ledger;
use crate::world::WorldState;

const WORLD_KEY: &[u8] = b"world";

/// Persistent state database backed by sled (pure-Rust, no C dependencies).
///
/// Named trees:
///   world:  "world"         → bincode(WorldState), the last committed state
///   events: seq (u64 BE)    → bincode(LogEntry), the full audit log
///   meta:   utf8 key bytes  → raw bytes
///
/// The world blob carries no events; the log is only ever appended to.
pub struct StateDb {
    _db: sled::Db,
    world: sled::Tree,
    events: sled::Tree,
    meta: sled::Tree,
}

impl StateDb {
    /// Open or create the state database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BlasterError> {
        let db = sled::open(path).map_err(|e| BlasterError::Storage(e.to_string()))?;
        let world  = db.open_tree("world").map_err(|e| BlasterError::Storage(e.to_string()))?;
        let events = db.open_tree("events").map_err(|e| BlasterError::Storage(e.to_string()))?;
        let meta   = db.open_tree("meta").map_err(|e| BlasterError::Storage(e.to_string()))?;
        Ok(Self { _db: db, world, events, meta })
    }

    // ── World ────────────────────────────────────────────────────────────────

    /// Persist the ledger's committed state. Refuses while an operation is in
    /// flight, since the live world may still be rolled back.
    pub fn save(&self, ledger: &Ledger) -> Result<(), BlasterError> {
        if ledger.in_transaction() {
            return Err(BlasterError::Storage("cannot persist with an open transaction".into()));
        }
        let bytes = bincode::serialize(ledger.world())
            .map_err(|e| BlasterError::Serialization(e.to_string()))?;
        self.world
            .insert(WORLD_KEY, bytes)
            .map_err(|e| BlasterError::Storage(e.to_string()))?;

        for entry in ledger.events_since(self.next_event_seq()) {
            self.put_event(entry)?;
        }
        debug!(events = ledger.next_event_seq(), now = ledger.now(), "state saved");
        Ok(())
    }

    /// The last saved ledger, or `None` on a fresh database.
    pub fn load(&self) -> Result<Option<Ledger>, BlasterError> {
        match self.world.get(WORLD_KEY).map_err(|e| BlasterError::Storage(e.to_string()))? {
            Some(bytes) => {
                let world: WorldState = bincode::deserialize(&bytes)
                    .map_err(|e| BlasterError::Serialization(e.to_string()))?;
                Ok(Some(Ledger::resume(world, self.next_event_seq())))
            }
            None => Ok(None),
        }
    }

    // ── Events ───────────────────────────────────────────────────────────────

    /// Sequence number the next stored entry will carry.
    pub fn next_event_seq(&self) -> u64 {
        self.events.len() as u64
    }

    fn put_event(&self, entry: &LogEntry) -> Result<(), BlasterError> {
        let bytes = bincode::serialize(entry)
            .map_err(|e| BlasterError::Serialization(e.to_string()))?;
        self.events
            .insert(entry.seq.to_be_bytes(), bytes)
            .map_err(|e| BlasterError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Up to `limit` entries starting at sequence number `from`.
    pub fn events_from(&self, from: u64, limit: usize) -> Result<Vec<LogEntry>, BlasterError> {
        let mut out = Vec::new();
        for item in self.events.range(from.to_be_bytes()..).take(limit) {
            let (_, bytes) = item.map_err(|e| BlasterError::Storage(e.to_string()))?;
            let entry = bincode::deserialize(&bytes)
                .map_err(|e| BlasterError::Serialization(e.to_string()))?;
            out.push(entry);
        }
        Ok(out)
    }

    // ── Meta ─────────────────────────────────────────────────────────────────

    pub fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), BlasterError> {
        self.meta
            .insert(key.as_bytes(), value)
            .map_err(|e| BlasterError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, BlasterError> {
        self.meta
            .get(key.as_bytes())
            .map(|v| v.map(|iv| iv.to_vec()))
            .map_err(|e| BlasterError::Storage(e.to_string()))
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), BlasterError> {
        self._db.flush().map_err(|e| BlasterError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blaster_core::types::Address;

    fn temp_db(name: &str) -> StateDb {
        let dir = std::env::temp_dir().join(format!("blaster_db_test_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        StateDb::open(&dir).unwrap()
    }

    #[test]
    fn fresh_db_has_no_world() {
        let db = temp_db("fresh");
        assert!(db.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_restores_state_and_events() {
        let db = temp_db("roundtrip");
        let mut ledger = Ledger::default();
        let alice = Address::from_label("alice");
        ledger.set_time(42).unwrap();
        ledger.fund_native(&alice, 7).unwrap();
        ledger
            .deploy_mintable(Address::from_label("asset"), "Asset", "AST", alice)
            .unwrap();
        ledger.mint(&Address::from_label("asset"), &alice, &alice, 5).unwrap();
        db.save(&ledger).unwrap();

        let loaded = db.load().unwrap().unwrap();
        assert_eq!(loaded.world(), ledger.world());
        assert_eq!(loaded.native_balance(&alice), 7);
        assert_eq!(loaded.next_event_seq(), 1);
        assert!(loaded.events().is_empty());

        let events = db.events_from(0, 10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 42);
    }

    #[test]
    fn save_is_incremental_for_events() {
        let db = temp_db("incremental");
        let mut ledger = Ledger::default();
        let alice = Address::from_label("alice");
        let asset = Address::from_label("asset");
        ledger.deploy_mintable(asset, "Asset", "AST", alice).unwrap();
        ledger.mint(&asset, &alice, &alice, 1).unwrap();
        db.save(&ledger).unwrap();
        ledger.mint(&asset, &alice, &alice, 2).unwrap();
        db.save(&ledger).unwrap();
        assert_eq!(db.events_from(0, 10).unwrap().len(), 2);
        assert_eq!(db.events_from(1, 10).unwrap()[0].seq, 1);

        // A reloaded ledger appends after the stored history.
        let mut reloaded = db.load().unwrap().unwrap();
        reloaded.mint(&asset, &alice, &alice, 3).unwrap();
        db.save(&reloaded).unwrap();
        let events = db.events_from(0, 10).unwrap();
        assert_eq!(events.iter().map(|e| e.seq).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(reloaded.total_supply(&asset).unwrap(), 6);
    }

    #[test]
    fn save_refuses_open_transaction() {
        let db = temp_db("open_tx");
        let mut ledger = Ledger::default();
        ledger.begin();
        assert!(matches!(db.save(&ledger), Err(BlasterError::Storage(_))));
    }

    #[test]
    fn meta_roundtrip() {
        let db = temp_db("meta");
        db.put_meta("router", b"abc").unwrap();
        assert_eq!(db.get_meta("router").unwrap(), Some(b"abc".to_vec()));
        assert_eq!(db.get_meta("missing").unwrap(), None);
    }
}
