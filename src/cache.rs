//! Caller-owned memoization of [`crate::loader::load`].
//!
//! Loading is a pure function of the source bytes and the config, so a
//! repeated refresh over an unchanged file can reuse the earlier result.
use crate::config::ReportConfig;
use crate::error::LoadError;
use crate::loader::{load, Dataset};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<String, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(bytes: &[u8], config: &ReportConfig) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher.update(config.fingerprint().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Return the cached dataset for identical content, loading it otherwise.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, bytes: &[u8], config: &ReportConfig) -> Result<Arc<Dataset>, LoadError> {
        let key = Self::key(bytes, config);
        if let Some(ds) = self.entries.get(&key) {
            log::debug!("Reusing cached dataset {}", &key[..12]);
            return Ok(Arc::clone(ds));
        }
        log::debug!("Cache miss for {}, loading", &key[..12]);
        let ds = Arc::new(load(bytes, config)?);
        self.entries.insert(key, Arc::clone(&ds));
        Ok(ds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &[u8] = b"Munic\xedpio;Bairro;Data Fato\nPOUSO ALEGRE;Centro;01/03/2023\n";

    #[test]
    fn identical_content_hits_the_cache() {
        let mut cache = DatasetCache::new();
        let config = ReportConfig::default();
        let a = cache.get_or_load(SRC, &config).unwrap();
        let b = cache.get_or_load(&SRC.to_vec(), &config).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_content_or_config_reloads() {
        let mut cache = DatasetCache::new();
        let config = ReportConfig::default();
        cache.get_or_load(SRC, &config).unwrap();
        let mut changed = SRC.to_vec();
        changed.extend_from_slice(b"POUSO ALEGRE;Foch;02/03/2023\n");
        let ds = cache.get_or_load(&changed, &config).unwrap();
        assert_eq!(ds.len(), 2);
        let other = ReportConfig { target_municipality: "VARGINHA".to_string(), ..config };
        assert!(cache.get_or_load(SRC, &other).unwrap().is_empty());
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(b"foo;bar\n1;2\n", &ReportConfig::default()).is_err());
        assert!(cache.is_empty());
    }
}
