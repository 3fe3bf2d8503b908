//! Built-in plugin modules compiled into the binary
//!
//! Built-ins resolve to virtual paths beneath [`BUILTIN_ROOT`]. Those paths
//! have no filesystem entry, so they classify as `Module` and are served by
//! the module host straight from the embedded text.

use std::path::{Path, PathBuf};

/// Virtual directory holding built-in modules
pub const BUILTIN_ROOT: &str = "/@plugload/builtin";

const BUILTIN_NOOP: &str = include_str!("../../builtin/noop.json");
const BUILTIN_DEFAULTS: &str = include_str!("../../builtin/defaults.json");

/// Names of all built-in modules
pub fn builtin_names() -> &'static [&'static str] {
    &["defaults", "noop"]
}

/// Embedded module source for a built-in name
pub fn builtin_source(name: &str) -> Option<&'static str> {
    match name {
        "noop" => Some(BUILTIN_NOOP),
        "defaults" => Some(BUILTIN_DEFAULTS),
        _ => None,
    }
}

/// Virtual path for a built-in module
pub fn builtin_path(name: &str) -> PathBuf {
    Path::new(BUILTIN_ROOT).join(name)
}

/// Built-in name for a virtual path, if it is one
pub fn builtin_name(path: &Path) -> Option<&str> {
    let name = path.strip_prefix(BUILTIN_ROOT).ok()?.to_str()?;
    builtin_source(name).map(|_| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_has_valid_source() {
        for name in builtin_names() {
            let source = builtin_source(name).unwrap();
            let module: serde_json::Value = serde_json::from_str(source).unwrap();
            assert_eq!(module["name"], *name);
        }
    }

    #[test]
    fn path_round_trip() {
        let path = builtin_path("noop");
        assert!(path.is_absolute());
        assert_eq!(builtin_name(&path), Some("noop"));
    }

    #[test]
    fn unknown_names() {
        assert!(builtin_source("python").is_none());
        assert!(builtin_name(&builtin_path("python")).is_none());
        assert!(builtin_name(Path::new("/tmp/noop")).is_none());
    }
}
