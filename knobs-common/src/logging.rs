//! Logging helpers
//!
//! Formatting wrappers for use inside `tracing` macros.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// ```ignore
/// use knobs_common::Pretty;
/// use tracing::debug;
///
/// debug!("Loaded settings: {}", Pretty(&settings));
/// ```
///
/// Outputs YAML with a leading newline. Debug is used as a fallback if YAML
/// serialization fails. Never wrap a value store that may hold sensitive
/// values; log the masked view instead.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_pretty_renders_yaml_with_leading_newline() {
        let mut map = BTreeMap::new();
        map.insert("region", "eu-west");

        let rendered = Pretty(&map).to_string();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("region: eu-west"));
    }
}
