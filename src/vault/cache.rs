use std::time::{Duration, Instant};

use crate::vault::VaultRecord;

/// Something that can produce a full set of vaults.
pub trait VaultSource {
    fn discover(&self) -> Vec<VaultRecord>;
}

/// Keeps the result of the last discovery for `ttl`.
///
/// Owned by whoever handles queries; `&mut self` on every read means only one
/// caller can trigger a rebuild at a time.
pub struct RegistryCache<S: VaultSource> {
    source: S,
    entries: Vec<VaultRecord>,
    last_scan: Option<Instant>,
    ttl: Duration,
}

impl<S: VaultSource> RegistryCache<S> {
    /// Creates an empty cache. The first read always scans.
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            entries: Vec::new(),
            last_scan: None,
            ttl,
        }
    }

    /// Returns the cached vaults, rescanning if they are older than the TTL.
    pub fn get_vaults(&mut self) -> &[VaultRecord] {
        self.get_vaults_at(Instant::now())
    }

    /// Same as [`RegistryCache::get_vaults`] with an explicit clock reading.
    pub fn get_vaults_at(&mut self, now: Instant) -> &[VaultRecord] {
        if !self.is_fresh_at(now) {
            self.entries = self.source.discover();
            self.last_scan = Some(now);
            tracing::debug!("vault cache rebuilt with {} vaults", self.entries.len());
        }
        &self.entries
    }

    /// Whether a read at `now` would be served without rescanning.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        match self.last_scan {
            Some(at) => now.saturating_duration_since(at) <= self.ttl,
            None => false,
        }
    }

    /// Forces the next read to rescan.
    pub fn invalidate(&mut self) {
        self.last_scan = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::path::Path;

    struct StubSource {
        vaults: RefCell<Vec<VaultRecord>>,
        calls: Cell<usize>,
    }

    impl StubSource {
        fn returning(names: &[&str]) -> Self {
            Self {
                vaults: RefCell::new(records(names)),
                calls: Cell::new(0),
            }
        }
    }

    impl VaultSource for StubSource {
        fn discover(&self) -> Vec<VaultRecord> {
            self.calls.set(self.calls.get() + 1);
            self.vaults.borrow().clone()
        }
    }

    fn records(names: &[&str]) -> Vec<VaultRecord> {
        names
            .iter()
            .map(|n| VaultRecord::new(&Path::new("/vaults").join(n), ".obsidian"))
            .collect()
    }

    fn names(vaults: &[VaultRecord]) -> Vec<String> {
        vaults.iter().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn memoizes_until_ttl_then_rescans() {
        let ttl = Duration::from_secs(300);
        let mut cache = RegistryCache::new(StubSource::returning(&["one"]), ttl);
        let start = Instant::now();

        assert_eq!(names(cache.get_vaults_at(start)), vec!["one"]);

        *cache.source().vaults.borrow_mut() = records(&["two"]);

        let before = start + Duration::from_secs(120);
        assert_eq!(names(cache.get_vaults_at(before)), vec!["one"]);
        assert_eq!(names(cache.get_vaults_at(start + ttl)), vec!["one"]);
        assert_eq!(cache.source().calls.get(), 1);

        let after = start + ttl + Duration::from_secs(1);
        assert_eq!(names(cache.get_vaults_at(after)), vec!["two"]);
        assert_eq!(cache.source().calls.get(), 2);
    }

    #[test]
    fn invalidate_forces_rescan() {
        let source = StubSource::returning(&["one"]);
        let mut cache = RegistryCache::new(source, Duration::from_secs(300));
        let now = Instant::now();

        cache.get_vaults_at(now);
        assert!(cache.is_fresh_at(now));

        cache.invalidate();
        assert!(!cache.is_fresh_at(now));

        cache.get_vaults_at(now);
        assert_eq!(cache.source().calls.get(), 2);
    }

    #[test]
    fn cold_cache_scans_even_when_empty() {
        let mut cache = RegistryCache::new(StubSource::returning(&[]), Duration::from_secs(300));
        assert!(cache.get_vaults().is_empty());
        assert_eq!(cache.source().calls.get(), 1);
    }
}
