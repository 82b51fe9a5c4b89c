use std::collections::HashMap;

use super::catalog::{Catalog, ImageReference};

/// Which matching strategy produced a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionTier {
    Exact,
    Substring,
    Generic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DestinationImage {
    pub key: String,
    pub reference: ImageReference,
    pub tier: ResolutionTier,
}

pub fn normalize_destination(destination: &str) -> String {
    destination.trim().to_lowercase()
}

/// Tiered destination → image lookup, memoized per normalized destination.
/// Entries are never evicted; the catalog does not change.
pub struct DestinationImageResolver {
    catalog: Catalog,
    cache: HashMap<String, DestinationImage>,
    catalog_scans: usize,
}

impl Default for DestinationImageResolver {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl DestinationImageResolver {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
            catalog_scans: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of lookups that had to consult the catalog (cache misses).
    pub fn catalog_scans(&self) -> usize {
        self.catalog_scans
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn resolve(&mut self, destination: &str) -> DestinationImage {
        if destination.trim().is_empty() {
            return DestinationImage {
                key: String::new(),
                reference: self.catalog.fallback().clone(),
                tier: ResolutionTier::Generic,
            };
        }

        let key = normalize_destination(destination);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Image cache hit for '{key}'");
            return hit.clone();
        }

        self.catalog_scans += 1;
        let (reference, tier) = self.lookup(&key);
        log::debug!("Resolved '{key}' as {tier:?}: {reference}");

        let resolved = DestinationImage {
            key: key.clone(),
            reference,
            tier,
        };
        self.cache.insert(key, resolved.clone());
        resolved
    }

    fn lookup(&self, key: &str) -> (ImageReference, ResolutionTier) {
        if let Some(reference) = self.catalog.get(key) {
            return (reference.clone(), ResolutionTier::Exact);
        }
        // Either direction counts: "kuala lumpur, malaysia" contains "kuala lumpur",
        // "york" is contained in "new york".
        for (entry_key, reference) in self.catalog.entries() {
            if key.contains(entry_key) || entry_key.contains(key) {
                return (reference.clone(), ResolutionTier::Substring);
            }
        }
        (self.catalog.fallback().clone(), ResolutionTier::Generic)
    }
}
