//! Persistent compile cache for file plugins
//!
//! Compiled artifacts live in a single directory beneath the workspace root,
//! one file per source path, named by a digest of that path.
//!
//! # Cache Layout
//!
//! | File | Lifetime | Description |
//! |------|----------|-------------|
//! | `{key}` | until cleared | Compiled output of one source file |
//! | `{key}.local.{ext}` | one compile | Staged link of the source |
//! | `{key}.{uuid}.tmp` | one write | Artifact being written |
//!
//! There is no manifest: an artifact is cached iff `{key}` exists. Keys come
//! from the source path, not its contents, so editing a plugin in place keeps
//! its key.

pub mod compile;
pub mod key;
pub mod locks;
pub mod root;

pub use compile::{CompileCache, CompileOptions};
pub use key::CacheKey;
pub use locks::KeyedLocks;
pub use root::{ArtifactInfo, CacheRoot};
