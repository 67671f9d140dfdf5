use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Resolves the path under which the invoking crate can see another
/// treeline crate.
///
/// Generated code must name `tl_reflect` (or another `tl_` crate) from
/// the crate that expanded the macro, and that crate may depend on it
/// directly or only through the `treeline` facade.
///
/// # Example
///
/// ```rust
/// # use tl_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("tl_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. A direct dependency named `name` resolves to `::name`.
/// 2. A `tl_` crate reached through the `treeline` facade resolves to
///    `::treeline::short_name` (e.g. `tl_reflect` -> `::treeline::reflect`).
/// 3. Steps 1-2 are repeated for `dev-dependencies`.
/// 4. Otherwise the absolute path `::name` is used.
///
/// Crates that expand their own derives declare `extern crate self as name;`
/// so that rule 4 also holds inside the defining crate.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "treeline";
const CRATE_PREFIX: &str = "tl_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be defined by cargo.");
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(text)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn parse_path(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::parse_path(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Return a [`syn::Path`] for the crate named `name` as seen from the
    /// caller's Cargo.toml.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(table)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }
        Self::parse_path(&format!("::{name}"))
    }

    /// Runs `func` against the caller's manifest, parsing it at most once
    /// per modification of the file.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .expect("The Cargo.toml should have a modified time.");

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read_manifest(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::time::SystemTime;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: toml_edit::Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn render(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\ntl_reflect = \"0.1\"\ntreeline = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("tl_reflect")), "tl_reflect");
    }

    #[test]
    fn facade_dependency_is_used() {
        let m = manifest("[dev-dependencies]\ntreeline = \"0.1\"\n");
        assert_eq!(render(&m.get_crate_path("tl_reflect")), "treeline::reflect");
    }

    #[test]
    fn unknown_crate_falls_back_to_absolute() {
        let m = manifest("[dependencies]\nserde = \"1\"\n");
        assert_eq!(render(&m.get_crate_path("tl_map")), "tl_map");
    }
}
