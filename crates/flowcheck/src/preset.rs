//! Flow preset for the build pipeline configuration.
//!
//! The preset contributes the `flowtype` lint plugin and recommended rules,
//! the Babel plugin that turns Flow annotations into comments, and registers
//! the status checker as the `flow` build plugin.

use serde_json::{json, Value};

/// Lint config shared by Flow projects.
pub const LINT_EXTENDS: &str = "plugin:flowtype/recommended";
pub const LINT_PLUGIN: &str = "flowtype";

/// Babel plugin that strips Flow annotations into comments.
pub const BABEL_PLUGIN: &str = "babel-plugin-transform-flow-comments";

/// Configuration fragment contributed by the Flow preset.
pub fn flow_preset() -> Value {
    json!({
        "lint": {
            "baseConfig": { "extends": [LINT_EXTENDS] },
            "plugins": [LINT_PLUGIN],
        },
        "compile": {
            "babel": { "plugins": [BABEL_PLUGIN] },
        },
        "plugins": {
            "flow": "flowcheck",
        },
    })
}

/// Merge `overlay` into `base`.
///
/// Objects merge key by key, arrays concatenate (base first), and any other
/// overlay value replaces the base value.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
        }
        (base, overlay) => *base = overlay,
    }
}

/// The Flow preset with user overrides merged on top.
pub fn flow_preset_with(overrides: Value) -> Value {
    let mut preset = flow_preset();
    deep_merge(&mut preset, overrides);
    preset
}
