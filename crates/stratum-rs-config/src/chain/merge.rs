//! Deep merge helpers for source mappings.

use crate::RawMap;
use serde_yaml::Value;

/// Merge `overlay` into `base`, recursively merging nested mappings.
///
/// Any value that is not a mapping on both sides is replaced by the overlay,
/// sequences included.
pub fn deep_merge(base: &mut RawMap, overlay: RawMap) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            deep_merge(base_map, overlay_map);
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value;
        }
    }
}

/// Fold mappings ordered highest priority first into one mapping.
///
/// The last (lowest priority) mapping seeds the result and each earlier one
/// is merged on top of it.
pub fn merge_layers(layers: impl IntoIterator<Item = RawMap>) -> RawMap {
    let mut layers: Vec<RawMap> = layers.into_iter().collect();
    let Some(mut merged) = layers.pop() else {
        return RawMap::new();
    };
    for overlay in layers.into_iter().rev() {
        deep_merge(&mut merged, overlay);
    }
    merged
}
