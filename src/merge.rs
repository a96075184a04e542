//! Deep merging of configuration trees.
//!
//! Two flavors share the same rule: a key present in the patch overwrites
//! the target, recursing into nested objects, and a key absent from the
//! patch leaves the target untouched at every depth.
//!
//! - [`DeepMerge`] merges a typed patch (a struct of `Option`s and nested
//!   patches) into a settings struct. The set of keys is closed.
//! - [`merge_values`] merges untyped YAML trees, used to layer config
//!   files before they are deserialized into typed patches.

use serde_yaml_ng::Value;

/// A settings type that can absorb a partial override.
pub trait DeepMerge {
    /// Partial counterpart of `Self`: every leaf optional.
    type Patch;

    /// Overwrite the leaves present in `patch`, keep the rest.
    fn deep_merge(&mut self, patch: &Self::Patch);

    /// Consuming form of [`DeepMerge::deep_merge`].
    #[must_use]
    fn merged(mut self, patch: &Self::Patch) -> Self
    where
        Self: Sized,
    {
        self.deep_merge(patch);
        self
    }
}

/// Overwrite `slot` when the patch carries a value.
#[inline]
pub(crate) fn merge_leaf<T: Clone>(slot: &mut T, patch: Option<&T>) {
    if let Some(value) = patch {
        slot.clone_from(value);
    }
}

/// Recursively merge `patch` into `target`.
///
/// Mappings are merged key by key; any other patch value (scalar,
/// sequence, null) replaces the target value wholesale.
///
/// # Example
///
/// ```
/// use mathcanvas::merge::merge_values;
///
/// let mut base: serde_yaml_ng::Value = serde_yaml_ng::from_str("a: {a1: 0, a2: 0}").unwrap();
/// let patch = serde_yaml_ng::from_str("{a: {a1: 1}, b: {b1: 1}}").unwrap();
/// merge_values(&mut base, &patch);
///
/// let expected: serde_yaml_ng::Value =
///     serde_yaml_ng::from_str("{a: {a1: 1, a2: 0}, b: {b1: 1}}").unwrap();
/// assert_eq!(base, expected);
/// ```
pub fn merge_values(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Mapping(target), Value::Mapping(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml_ng::from_str(src).unwrap()
    }

    #[test]
    fn test_merge_keeps_absent_keys_at_every_depth() {
        let mut target = yaml("{a: {a1: 0, a2: 0}}");
        merge_values(&mut target, &yaml("{a: {a1: 1}, b: {b1: 1}}"));
        assert_eq!(target, yaml("{a: {a1: 1, a2: 0}, b: {b1: 1}}"));
    }

    #[test]
    fn test_merge_three_levels() {
        let mut target = yaml(
            "grid_lines: {vertical: {displayed: true, color: grey, line_width: 0.5}}",
        );
        merge_values(
            &mut target,
            &yaml("grid_lines: {vertical: {color: red}}"),
        );
        assert_eq!(
            target,
            yaml("grid_lines: {vertical: {displayed: true, color: red, line_width: 0.5}}")
        );
    }

    #[test]
    fn test_merge_scalar_replaces_mapping() {
        let mut target = yaml("{a: {a1: 0}}");
        merge_values(&mut target, &yaml("{a: 3}"));
        assert_eq!(target, yaml("{a: 3}"));
    }

    #[test]
    fn test_merge_sequence_replaced_not_concatenated() {
        let mut target = yaml("{plane: [0, 1, 0, 1]}");
        merge_values(&mut target, &yaml("{plane: [0, 10, -5, 5]}"));
        assert_eq!(target, yaml("{plane: [0, 10, -5, 5]}"));
    }

    #[test]
    fn test_merge_empty_patch_is_identity() {
        let mut target = yaml("{a: {a1: 0}}");
        merge_values(&mut target, &yaml("{}"));
        assert_eq!(target, yaml("{a: {a1: 0}}"));
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Leaf {
        shown: bool,
        width: f64,
    }

    #[derive(Default)]
    struct LeafPatch {
        shown: Option<bool>,
        width: Option<f64>,
    }

    impl DeepMerge for Leaf {
        type Patch = LeafPatch;

        fn deep_merge(&mut self, patch: &LeafPatch) {
            merge_leaf(&mut self.shown, patch.shown.as_ref());
            merge_leaf(&mut self.width, patch.width.as_ref());
        }
    }

    #[test]
    fn test_typed_merge_only_present_leaves() {
        let leaf = Leaf {
            shown: true,
            width: 0.5,
        }
        .merged(&LeafPatch {
            width: Some(2.0),
            ..LeafPatch::default()
        });
        assert_eq!(
            leaf,
            Leaf {
                shown: true,
                width: 2.0
            }
        );
    }
}
