//! State access for the auction module.
//!
//! The module keeps no state of its own. Every handler receives the store
//! for the current call and reads and writes full record snapshots through
//! the registry functions below.

use asset_auction_types::{decode_record, encode_record, Asset, AssetId, Auction, AuctionId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::genesis::ModuleParams;
use crate::keys::{asset_key, auction_key, LAST_AUCTION_ID_KEY, PARAMS_KEY};

/// Key-value store provided by the host.
pub trait StateStore {
    /// Read the value under `key`, `None` when absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Apply a call's buffered writes. Either every write lands or none do.
    fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError>;
}

/// In-memory store.
///
/// Backs the mock chain and the tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys starting with `prefix`, in order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .range(prefix.to_string()..)
            .map(|(k, _)| k.as_str())
            .take_while(move |k| k.starts_with(prefix))
    }
}

impl StateStore for InMemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError> {
        self.entries.extend(writes.writes);
        Ok(())
    }
}

/// Writes buffered by a [`Transaction`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSet {
    writes: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }

    /// Buffered writes in key order.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Vec<u8>)> {
        self.writes.into_iter()
    }
}

/// Call-scoped overlay over a base store.
///
/// Reads see the call's own writes first. Nothing reaches the base store
/// until the write set is applied, so a failed call leaves it untouched.
pub struct Transaction<'a, S: StateStore + ?Sized> {
    base: &'a S,
    writes: WriteSet,
}

impl<'a, S: StateStore + ?Sized> Transaction<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            writes: WriteSet::default(),
        }
    }

    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }
}

impl<S: StateStore + ?Sized> StateStore for Transaction<'_, S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.writes.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.base.get_state(key),
        }
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError> {
        self.writes.writes.extend(writes.writes);
        Ok(())
    }
}

/// Run `call` as one unit against `store`: all of its writes are applied
/// if it succeeds, none if it fails. The write set reaches the store in a
/// single [`StateStore::commit`].
pub fn atomically<S, T, E>(
    store: &mut S,
    call: impl FnOnce(&mut Transaction<'_, S>) -> Result<T, E>,
) -> Result<T, E>
where
    S: StateStore,
    E: From<StoreError>,
{
    let (value, writes) = {
        let mut tx = Transaction::new(&*store);
        let value = call(&mut tx)?;
        (value, tx.into_write_set())
    };
    store.commit(writes)?;
    Ok(value)
}

// =========================
// RECORD ACCESS
// =========================

fn read_record<T: DeserializeOwned>(
    store: &(impl StateStore + ?Sized),
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get_state(key)? {
        Some(bytes) => decode_record(&bytes).map(Some).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(None),
    }
}

fn write_record<T: Serialize>(
    store: &mut (impl StateStore + ?Sized),
    key: &str,
    record: &T,
) -> Result<(), StoreError> {
    let bytes = encode_record(record).map_err(|e| StoreError::Write {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.put_state(key, bytes)
}

// =========================
// ASSET REGISTRY
// =========================

/// Get asset by ID.
pub fn get_asset(
    store: &(impl StateStore + ?Sized),
    asset_id: &AssetId,
) -> Result<Option<Asset>, StoreError> {
    read_record(store, &asset_key(asset_id))
}

/// Persist an asset snapshot under its ID.
pub fn put_asset(store: &mut (impl StateStore + ?Sized), asset: &Asset) -> Result<(), StoreError> {
    write_record(store, &asset_key(&asset.id), asset)
}

// =========================
// AUCTION REGISTRY
// =========================

/// Get auction by ID.
pub fn get_auction(
    store: &(impl StateStore + ?Sized),
    auction_id: AuctionId,
) -> Result<Option<Auction>, StoreError> {
    read_record(store, &auction_key(auction_id))
}

/// Persist an auction snapshot under its ID.
pub fn put_auction(
    store: &mut (impl StateStore + ?Sized),
    auction: &Auction,
) -> Result<(), StoreError> {
    write_record(store, &auction_key(auction.id), auction)
}

/// Last assigned auction ID, 0 before the first auction.
pub fn get_last_auction_id(store: &(impl StateStore + ?Sized)) -> Result<AuctionId, StoreError> {
    Ok(read_record(store, LAST_AUCTION_ID_KEY)?.unwrap_or(0))
}

pub fn set_last_auction_id(
    store: &mut (impl StateStore + ?Sized),
    auction_id: AuctionId,
) -> Result<(), StoreError> {
    write_record(store, LAST_AUCTION_ID_KEY, &auction_id)
}

// =========================
// MODULE PARAMETERS
// =========================

/// Parameters written at genesis, defaults when none were written.
pub fn get_params(store: &(impl StateStore + ?Sized)) -> Result<ModuleParams, StoreError> {
    Ok(read_record(store, PARAMS_KEY)?.unwrap_or_default())
}

pub fn set_params(
    store: &mut (impl StateStore + ?Sized),
    params: &ModuleParams,
) -> Result<(), StoreError> {
    write_record(store, PARAMS_KEY, params)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    /// Store that fails every access to keys under the configured prefixes.
    #[derive(Default)]
    pub(crate) struct FailingStore {
        pub inner: InMemoryStore,
        pub fail_reads: Option<&'static str>,
        pub fail_writes: Option<&'static str>,
    }

    impl FailingStore {
        pub fn new(inner: InMemoryStore) -> Self {
            Self {
                inner,
                ..Default::default()
            }
        }

        fn write_error(key: &str) -> StoreError {
            StoreError::Write {
                key: key.to_string(),
                reason: "disk full".into(),
            }
        }
    }

    impl StateStore for FailingStore {
        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            if self.fail_reads.is_some_and(|prefix| key.starts_with(prefix)) {
                return Err(StoreError::Read {
                    key: key.to_string(),
                    reason: "io error".into(),
                });
            }
            self.inner.get_state(key)
        }

        fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
            if self.fail_writes.is_some_and(|prefix| key.starts_with(prefix)) {
                return Err(Self::write_error(key));
            }
            self.inner.put_state(key, value)
        }

        fn commit(&mut self, writes: WriteSet) -> Result<(), StoreError> {
            if let Some(prefix) = self.fail_writes {
                if let Some(key) = writes.keys().find(|k| k.starts_with(prefix)) {
                    return Err(Self::write_error(key));
                }
            }
            self.inner.commit(writes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::FailingStore;
    use super::*;
    use crate::error::AuctionError;

    fn asset_id(raw: &str) -> AssetId {
        AssetId::parse(raw).unwrap()
    }

    #[test]
    fn test_asset_registry() {
        let mut store = InMemoryStore::new();
        assert_eq!(get_asset(&store, &asset_id("A1")).unwrap(), None);

        let asset = Asset::new(asset_id("A1"), "alice");
        put_asset(&mut store, &asset).unwrap();
        assert_eq!(get_asset(&store, &asset_id("A1")).unwrap(), Some(asset));
        assert!(store.get_state("assets_A1").unwrap().is_some());
    }

    #[test]
    fn test_last_auction_id_defaults_to_zero() {
        let mut store = InMemoryStore::new();
        assert_eq!(get_last_auction_id(&store).unwrap(), 0);

        set_last_auction_id(&mut store, 3).unwrap();
        assert_eq!(get_last_auction_id(&store).unwrap(), 3);
    }

    #[test]
    fn test_corrupt_record() {
        let mut store = InMemoryStore::new();
        store.put_state("auctions_1", b"not json".to_vec()).unwrap();
        assert!(matches!(
            get_auction(&store, 1),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_transaction_reads_own_writes() {
        let mut store = InMemoryStore::new();
        put_asset(&mut store, &Asset::new(asset_id("A1"), "alice")).unwrap();

        let mut tx = Transaction::new(&store);
        let mut asset = get_asset(&tx, &asset_id("A1")).unwrap().unwrap();
        asset.owner = "bob".into();
        put_asset(&mut tx, &asset).unwrap();

        assert_eq!(get_asset(&tx, &asset_id("A1")).unwrap().unwrap().owner, "bob");
        let writes = tx.into_write_set();
        assert_eq!(writes.keys().collect::<Vec<_>>(), vec!["assets_A1"]);

        // Base is untouched until the write set is applied.
        assert_eq!(get_asset(&store, &asset_id("A1")).unwrap().unwrap().owner, "alice");
        store.commit(writes).unwrap();
        assert_eq!(get_asset(&store, &asset_id("A1")).unwrap().unwrap().owner, "bob");
    }

    #[test]
    fn test_atomically_discards_failed_call() {
        let mut store = InMemoryStore::new();

        let result: Result<(), AuctionError> = atomically(&mut store, |tx| {
            put_asset(tx, &Asset::new(asset_id("A1"), "alice"))?;
            set_last_auction_id(tx, 9)?;
            Err(AuctionError::NoPlatforms)
        });

        assert!(matches!(result, Err(AuctionError::NoPlatforms)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_atomically_commits_successful_call() {
        let mut store = InMemoryStore::new();

        let id: Result<AuctionId, AuctionError> = atomically(&mut store, |tx| {
            set_last_auction_id(tx, 1)?;
            Ok(1)
        });

        assert_eq!(id.unwrap(), 1);
        assert_eq!(get_last_auction_id(&store).unwrap(), 1);
    }

    #[test]
    fn test_keys_with_prefix() {
        let mut store = InMemoryStore::new();
        put_asset(&mut store, &Asset::new(asset_id("A1"), "alice")).unwrap();
        put_asset(&mut store, &Asset::new(asset_id("A2"), "bob")).unwrap();
        set_last_auction_id(&mut store, 1).unwrap();

        let keys: Vec<_> = store.keys_with_prefix("assets_").collect();
        assert_eq!(keys, vec!["assets_A1", "assets_A2"]);
    }

    #[test]
    fn test_atomically_failed_commit_applies_nothing() {
        let mut store = FailingStore::new(InMemoryStore::new());
        store.fail_writes = Some("assets_");

        let result: Result<(), AuctionError> = atomically(&mut store, |tx| {
            set_last_auction_id(tx, 1)?;
            put_asset(tx, &Asset::new(asset_id("A1"), "alice"))?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(AuctionError::Store(StoreError::Write { ref key, .. })) if key == "assets_A1"
        ));
        // The counter write was rejected along with the asset.
        assert!(store.inner.is_empty());
    }
}
