//! Legacy property names and their current paths.
//!
//! Old display files and scripts address properties by names that have
//! since been renamed or folded into arrays. Lookups fall back to these
//! aliases and log one deprecation warning per alias per process.

use std::collections::HashSet;
use std::sync::LazyLock;

use parking_lot::Mutex;

/// A legacy property name accepted by a widget type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAlias {
    /// `legacy` now lives at `current`.
    Rename {
        legacy: &'static str,
        current: &'static str,
    },
    /// `<prefix><field>_<n>` now lives at `<array>[n].<field>`.
    Indexed {
        prefix: &'static str,
        array: &'static str,
    },
}

impl PropertyAlias {
    /// Current path for `name`, if this alias covers it.
    pub fn translate(&self, name: &str) -> Option<String> {
        match *self {
            PropertyAlias::Rename { legacy, current } => (name == legacy).then(|| current.to_string()),
            PropertyAlias::Indexed { prefix, array } => {
                let rest = name.strip_prefix(prefix)?;
                let (field, index) = rest.rsplit_once('_')?;
                let valid_field = !field.is_empty()
                    && field.chars().all(|c| c.is_ascii_lowercase() || c == '_');
                if !valid_field || index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let index: usize = index.parse().ok()?;
                Some(format!("{array}[{index}].{field}"))
            }
        }
    }
}

/// Current path for `name` under the first matching alias.
pub fn translate(aliases: &[PropertyAlias], name: &str) -> Option<String> {
    aliases.iter().find_map(|alias| alias.translate(name))
}

static WARNED: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Log a deprecation warning for `legacy` on `type_id`, once per process.
/// Returns whether this call logged.
pub fn warn_deprecated(type_id: &str, legacy: &str, current: &str) -> bool {
    let key = format!("{type_id}.{legacy}");
    if !WARNED.lock().insert(key) {
        return false;
    }
    tracing::warn!(
        widget = type_id,
        legacy,
        current,
        "deprecated property name, use the current path instead"
    );
    true
}
