use std::collections::HashMap;
use std::sync::Arc;

use crate::config::LandmassConfig;
use crate::landmass::Landmass;

/// Memoizes generated landmasses by seed.
///
/// Rendering asks for the background on every repaint, so generation runs
/// once per seed and later lookups share the same `Arc`. Entries are only
/// valid for one configuration; changing it drops them.
#[derive(Debug, Default)]
pub struct LandmassCache {
    config: LandmassConfig,
    entries: HashMap<String, Arc<Landmass>>,
}

impl LandmassCache {
    pub fn new(config: LandmassConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LandmassConfig {
        &self.config
    }

    /// Replaces the configuration. Cached entries are dropped if it changed.
    pub fn set_config(&mut self, config: LandmassConfig) {
        if config != self.config {
            self.entries.clear();
            self.config = config;
        }
    }

    /// Returns the landmass for `seed`, generating it on first use.
    pub fn get(&mut self, seed: &str) -> Arc<Landmass> {
        if let Some(hit) = self.entries.get(seed) {
            return Arc::clone(hit);
        }
        tracing::debug!(seed, "Landmass cache miss");
        let landmass = Arc::new(Landmass::generate(seed, &self.config));
        self.entries.insert(seed.to_string(), Arc::clone(&landmass));
        landmass
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
