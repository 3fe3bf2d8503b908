//! Filesystem-backed identifier resolution
//!
//! Path identifiers (`./x`, `../x`, `/abs/x`) resolve against the base
//! directory. Package names are searched in order:
//! 1. Workspace: `{workspace_root}/{search_dir}/{name}` for each search dir
//! 2. User-global: `{data_dir}/plugload/plugins/{name}`
//! 3. Built-in: compiled into the binary
//!
//! Each candidate is tried as-is, then with every configured extension.

use crate::config::schema::ResolveConfig;
use crate::config::ConfigManager;
use crate::error::{PluginError, PluginResult};
use crate::resolve::builtin::{builtin_names, builtin_path, builtin_source};
use crate::resolve::ModuleResolver;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves identifiers against the workspace and the local filesystem
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
    search_dirs: Vec<PathBuf>,
    extensions: Vec<String>,
    global_dir: Option<PathBuf>,
}

impl FsResolver {
    pub fn new(workspace_root: &Path, base_dir: &Path, config: &ResolveConfig) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            search_dirs: config
                .search_dirs
                .iter()
                .map(|dir| workspace_root.join(dir))
                .collect(),
            extensions: config.extensions.clone(),
            global_dir: if config.global_plugins {
                ConfigManager::global_plugins_dir()
            } else {
                None
            },
        }
    }

    /// Try `candidate`, then `candidate.{ext}` for each extension
    async fn probe(&self, candidate: &Path) -> PluginResult<Option<PathBuf>> {
        if exists(candidate).await? {
            return canonical(candidate).await.map(Some);
        }

        for ext in &self.extensions {
            let mut with_ext = OsString::from(candidate.as_os_str());
            with_ext.push(".");
            with_ext.push(ext);
            let with_ext = PathBuf::from(with_ext);

            if exists(&with_ext).await? {
                return canonical(&with_ext).await.map(Some);
            }
        }

        Ok(None)
    }

    async fn resolve_path(&self, identifier: &str) -> PluginResult<PathBuf> {
        let candidate = self.base_dir.join(identifier);

        self.probe(&candidate).await?.ok_or_else(|| {
            PluginError::not_found(identifier, format!("nothing at {}", candidate.display()))
        })
    }

    async fn resolve_package(&self, name: &str) -> PluginResult<PathBuf> {
        validate_package_name(name).map_err(|reason| PluginError::not_found(name, reason))?;

        let mut searched = Vec::new();
        let roots = self.search_dirs.iter().chain(self.global_dir.iter());

        for root in roots {
            let candidate = root.join(name);
            if let Some(found) = self.probe(&candidate).await? {
                return Ok(found);
            }
            searched.push(candidate.display().to_string());
        }

        if builtin_source(name).is_some() {
            return Ok(builtin_path(name));
        }
        searched.push(format!("built-in plugins ({})", builtin_names().join(", ")));

        Err(PluginError::not_found(
            name,
            format!("searched {}", searched.join(", ")),
        ))
    }
}

#[async_trait]
impl ModuleResolver for FsResolver {
    async fn resolve(&self, identifier: &str) -> PluginResult<PathBuf> {
        let resolved = if is_path_like(identifier) {
            self.resolve_path(identifier).await?
        } else {
            self.resolve_package(identifier).await?
        };

        debug!("Resolved '{}' to {}", identifier, resolved.display());
        Ok(resolved)
    }
}

/// Whether an identifier names a filesystem path rather than a package
fn is_path_like(identifier: &str) -> bool {
    matches!(identifier, "." | "..")
        || identifier.starts_with("./")
        || identifier.starts_with("../")
        || Path::new(identifier).is_absolute()
}

/// Validate that a package name is safe (no traversal, at most one scope).
fn validate_package_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("package name cannot be empty".to_string());
    }
    if name.contains("..") || name.contains('\\') || name.contains('\0') {
        return Err(format!(
            "invalid package name '{}': must not contain '..' or backslashes",
            name
        ));
    }

    let segments: Vec<&str> = name.split('/').collect();
    let valid_shape = match segments.as_slice() {
        [single] => !single.starts_with('@'),
        [scope, pkg] => scope.len() > 1 && scope.starts_with('@') && !pkg.is_empty(),
        _ => false,
    };
    if !valid_shape {
        return Err(format!(
            "invalid package name '{}': expected 'name' or '@scope/name'",
            name
        ));
    }

    Ok(())
}

async fn exists(path: &Path) -> PluginResult<bool> {
    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(PluginError::PermissionDenied {
            path: path.to_path_buf(),
            source: e,
        }),
        Err(_) => Ok(false),
    }
}

async fn canonical(path: &Path) -> PluginResult<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|e| PluginError::io(format!("resolving {}", path.display()), e))
}
