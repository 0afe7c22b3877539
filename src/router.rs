//! Path routing: the caller-supplied hook that renames or excludes entries
//! as they move between the filesystem and an archive.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Signature of a routing function.
///
/// Receives the forward-slash relative path (directories carry a trailing
/// `/`), the working root (build direction) or destination root (extract
/// direction), and whether the entry is a file. Returning `None` excludes
/// the entry entirely; the original path is never used as a fallback.
pub type RouteFn = dyn Fn(&str, &Path, bool) -> Option<String> + Send + Sync;

/// A cloneable routing function. The default router is the identity.
///
/// A router must be deterministic for a fixed entry set: it is consulted
/// once per entry and its verdict is final.
#[derive(Clone)]
pub struct Router(Arc<RouteFn>);

impl Router {
    /// Wraps an arbitrary routing closure.
    pub fn new<F>(route: F) -> Self
    where
        F: Fn(&str, &Path, bool) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(route))
    }

    /// The identity router: every entry keeps its relative path.
    pub fn identity() -> Self {
        Self::new(|relative, _root, _is_file| Some(relative.to_owned()))
    }

    /// Maps `relative` to its routed path, or `None` to exclude the entry.
    pub fn route(&self, relative: &str, context: &Path, is_file: bool) -> Option<String> {
        (self.0)(relative, context, is_file)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Router(..)")
    }
}

/// The relative/routed/absolute triple computed for one entry. Derived per
/// entry, never persisted.
#[derive(Debug, Clone)]
pub struct RouteDecision {
    /// Forward-slash path relative to the working or destination root.
    pub relative: String,
    /// Where the router sent the entry; `None` means excluded.
    pub routed: Option<String>,
    /// Source path to read from (build) or target path to materialize at
    /// (extract).
    pub absolute: Option<PathBuf>,
}

impl RouteDecision {
    /// Decision for a tree entry about to be packed. `absolute` is the
    /// path under `cwd` the entry's bytes come from, so it is present even
    /// when the router excludes the entry.
    pub fn for_tree_entry(router: &Router, cwd: &Path, relative: &Path, is_file: bool) -> Self {
        let key = crate::enumerate::to_archive_key(relative, !is_file);
        let routed = router.route(&key, cwd, is_file);
        Self {
            absolute: Some(cwd.join(relative)),
            relative: key,
            routed,
        }
    }

    /// Decision for an entry read back out of an archive. `absolute` is
    /// where the entry will be materialized under `dest`, absent when the
    /// entry is excluded. A stored directory key is not trusted to carry
    /// its trailing `/`, so the marker is restored before routing.
    pub fn for_archive_entry(router: &Router, dest: &Path, key: &str, is_file: bool) -> Self {
        let relative = if !is_file && !key.ends_with('/') {
            format!("{key}/")
        } else {
            key.to_owned()
        };
        let routed = router.route(&relative, dest, is_file);
        let absolute = routed.as_ref().map(|routed| dest.join(routed));
        Self {
            relative,
            routed,
            absolute,
        }
    }
}
