//! Ordered source chain.
//!
//! Evaluates each source once, highest priority first, then folds the
//! results from the lowest priority upwards with [`deep_merge`].

mod merge;


pub use merge::{deep_merge, merge_layers};

use crate::source::key_label;
use crate::{ConfigError, RawMap, ValueSource};
use log::{debug, info};

/// Sources ordered by priority, index 0 winning.
#[derive(Debug, Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ValueSource>>,
}

/// Metadata about one evaluated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayer {
    /// Short source identity (`init`, `file`, ...).
    pub name: String,
    /// Debug rendering of the source.
    pub description: String,
    /// Top-level keys the source contributed, in source order.
    pub keys: Vec<String>,
}

/// Merged values plus metadata for each evaluated source.
#[derive(Debug, Clone)]
pub struct ResolvedLayers {
    pub values: RawMap,
    /// One entry per source, highest priority first.
    pub layers: Vec<SourceLayer>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn ValueSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ValueSource> {
        self.sources.iter().map(|source| source.as_ref())
    }

    /// Debug rendering of every source, highest priority first.
    pub fn describe(&self) -> Vec<String> {
        self.iter().map(|source| source.to_string()).collect()
    }

    /// Evaluate every source and merge the results.
    pub fn resolve(&self) -> Result<RawMap, ConfigError> {
        Ok(self.resolve_layered()?.values)
    }

    /// Like [`SourceChain::resolve`], also reporting what each source contributed.
    pub fn resolve_layered(&self) -> Result<ResolvedLayers, ConfigError> {
        let mut loaded = Vec::with_capacity(self.sources.len());
        let mut layers = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let values = source.load()?;
            debug!(
                "evaluated source (name={}, keys={})",
                source.name(),
                values.len()
            );
            layers.push(SourceLayer {
                name: source.name().to_string(),
                description: source.to_string(),
                keys: values.keys().map(key_label).collect(),
            });
            loaded.push(values);
        }
        let values = merge_layers(loaded);
        info!(
            "source chain resolved (sources={}, keys={})",
            layers.len(),
            values.len()
        );
        Ok(ResolvedLayers { values, layers })
    }
}

impl FromIterator<Box<dyn ValueSource>> for SourceChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn ValueSource>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
