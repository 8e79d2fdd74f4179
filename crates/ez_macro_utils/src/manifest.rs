use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`, used to find how an `ez_*` crate is
/// reachable from the code a derive macro expands into.
///
/// # Resolution rules
///
/// For a requested crate such as `ez_reflect`, the `dependencies` table and
/// then the `dev-dependencies` table are searched:
///
/// 1. `ez_reflect` itself is a dependency: `::ez_reflect`.
/// 2. the facade `ez_core` is a dependency: `::ez_core::reflect`.
/// 3. a dependency renamed to `ez` exists: `::ez::reflect`.
///
/// Without a match the absolute path `::ez_reflect` is returned. A crate
/// that derives on its own types resolves this with
/// `extern crate self as ez_reflect;`.
///
/// # Example
///
/// ```rust
/// # use ez_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("ez_reflect"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "ez_core";
const SHORT_NAME: &str = "ez";
const CRATE_PREFIX: &str = "ez_";

const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

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
    fn modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(text)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let text = format!("::{}", segments.join("::"));
        syn::parse_str(&text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn search(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        [FACADE_NAME, SHORT_NAME]
            .into_iter()
            .find(|facade| deps.contains_key(facade))
            .map(|facade| Self::absolute(&[facade, module]))
    }

    /// Returns the [`syn::Path`] through which `name` is reachable from the
    /// crate being compiled. See the type-level docs for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::search(deps, name))
            .unwrap_or_else(|| Self::absolute(&[name]))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Manifests are parsed once per path and re-read only when the file's
    /// modification time changes. Call this once per macro invocation and
    /// keep the resulting paths.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("The Cargo.toml should have a modified time.");

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read(&path),
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
    use quote_free::path_string;
    use toml_edit::Document;

    use super::Manifest;

    mod quote_free {
        pub fn path_string(path: &syn::Path) -> String {
            let mut out = String::new();
            if path.leading_colon.is_some() {
                out.push_str("::");
            }
            let segments = path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect::<Vec<_>>();
            out.push_str(&segments.join("::"));
            out
        }
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\nez_reflect = \"0.0.1\"\nez_core = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("ez_reflect")), "::ez_reflect");
    }

    #[test]
    fn facade_dependency_is_used() {
        let m = manifest("[dependencies]\nez_core = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("ez_reflect")), "::ez_core::reflect");
    }

    #[test]
    fn dev_dependencies_are_searched() {
        let m = manifest("[dev-dependencies]\nez = { package = \"ez_core\", version = \"0.0.1\" }\n");
        assert_eq!(path_string(&m.get_crate_path("ez_serial")), "::ez::serial");
    }

    #[test]
    fn falls_back_to_absolute_name() {
        let m = manifest("[package]\nname = \"ez_reflect\"\n");
        assert_eq!(path_string(&m.get_crate_path("ez_reflect")), "::ez_reflect");
    }
}
