//! Import resolution: maps import specifiers to files discovered in the
//! project. A specifier that resolves to nothing local is either external
//! (package/stdlib) or genuinely broken; the scanners make that call.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

const JS_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Append an extension rather than replacing one, so `./utils.config`
/// probes `utils.config.ts` and not `utils.ts`.
fn append_ext(base: &Path, ext: &str) -> PathBuf {
    let mut os = base.as_os_str().to_os_string();
    os.push(format!(".{ext}"));
    PathBuf::from(os)
}

/// Lexically normalize `.` and `..` components without touching the
/// filesystem, so candidate paths compare equal to discovered paths.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a JS/TS import specifier to a project file.
///
/// Handles relative paths, extension omission, the TypeScript convention of
/// writing `.js` in specifiers for `.ts` sources, and `index.*` files.
/// Bare specifiers (npm packages, node builtins) resolve to `None`.
pub fn resolve_js_import(
    specifier: &str,
    from_file: &Path,
    all_files: &HashSet<PathBuf>,
) -> Option<PathBuf> {
    if !specifier.starts_with('.') && !specifier.starts_with('/') {
        return None;
    }

    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    let base = normalize(&dir.join(specifier));

    if all_files.contains(&base) {
        return Some(base);
    }

    for ext in JS_EXTENSIONS {
        let with_ext = append_ext(&base, ext);
        if all_files.contains(&with_ext) {
            return Some(with_ext);
        }
    }

    // TypeScript convention: specifier says .js but the source is .ts/.tsx
    if base.extension().map_or(false, |e| e == "js") {
        for ext in ["ts", "tsx"] {
            let rewritten = base.with_extension(ext);
            if all_files.contains(&rewritten) {
                return Some(rewritten);
            }
        }
    }

    for ext in JS_EXTENSIONS {
        let index_file = base.join(format!("index.{ext}"));
        if all_files.contains(&index_file) {
            return Some(index_file);
        }
    }

    None
}

/// Resolve a Python dotted module path to a project file.
/// `app.models.user` becomes `root/app/models/user.py`, falling back to the
/// package form `root/app/models/user/__init__.py`.
pub fn resolve_python_import(
    module_path: &str,
    root: &Path,
    all_files: &HashSet<PathBuf>,
) -> Option<PathBuf> {
    let mut file = root.to_path_buf();
    for part in module_path.split('.') {
        file.push(part);
    }

    let as_module = file.with_extension("py");
    if all_files.contains(&as_module) {
        return Some(as_module);
    }

    let as_package = file.join("__init__.py");
    if all_files.contains(&as_package) {
        return Some(as_package);
    }

    None
}

/// Resolve a relative link target against the file containing it.
/// Used for markdown link validation, so this one does hit the filesystem.
pub fn resolve_relative_link(link: &str, from_file: &Path) -> Option<PathBuf> {
    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize(&dir.join(link));
    resolved.exists().then_some(resolved)
}
