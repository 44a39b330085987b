//! qmake manifest fragments
//!
//! Modules declare their type and dependencies in small `.pri` files made of
//! `KEY = VALUE` lines, optionally written as `KEY += VALUE`. Parsing is
//! lenient: unreadable files and malformed lines are skipped.

use crate::cache::{extract_prefix, DependencyGraph};
use crate::error::{ForgeError, ForgeResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Dependency declarations of a module
pub const DEPENDENCIES_FILE: &str = "dependencies.pri";
/// Build variables of a module (`TEMPLATE = app|lib|subdirs`)
pub const VARS_FILE: &str = "vars.pri";
/// Sub-projects of an application
pub const SUBMODULES_FILE: &str = "submodules.pri";

/// Parse `KEY = VALUE` pairs.
///
/// All whitespace and `+` characters are removed before splitting on `=`;
/// lines that do not yield exactly two non-empty parts are ignored.
pub fn parse_pri(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let cleaned: String = line
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '+')
                .collect();
            let parts: Vec<&str> = cleaned.split('=').filter(|p| !p.is_empty()).collect();
            match parts.as_slice() {
                [key, value] => Some((key.to_string(), value.to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Read and parse a fragment; a missing or unreadable file yields no pairs
pub fn read_pri(path: &Path) -> Vec<(String, String)> {
    match fs::read_to_string(path) {
        Ok(content) => parse_pri(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No {} found", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Values of every `key` line in a fragment
fn values_for(pairs: Vec<(String, String)>, key: &str) -> impl Iterator<Item = String> + '_ {
    pairs
        .into_iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v)
}

/// `DEPENDENCIES` declared in a module directory's `dependencies.pri`
pub fn read_dependencies(module_dir: &Path) -> BTreeSet<String> {
    values_for(read_pri(&module_dir.join(DEPENDENCIES_FILE)), "DEPENDENCIES").collect()
}

/// `TEMPLATE` declared in a module directory's `vars.pri` (last one wins)
pub fn read_template_kind(module_dir: &Path) -> Option<String> {
    values_for(read_pri(&module_dir.join(VARS_FILE)), "TEMPLATE").last()
}

/// `SUBDIRS` entries of an existing `submodules.pri`
pub fn parse_submodules(path: &Path) -> ForgeResult<BTreeSet<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| ForgeError::io(format!("reading {}", path.display()), e))?;
    Ok(values_for(parse_pri(&content), "SUBDIRS").collect())
}

/// Render `submodules.pri`.
///
/// Dependencies are emitted in cache order with a blank line between prefix
/// groups, followed by the module's own entry when `module_name` is non-empty.
pub fn generate_submodules(
    graph: &DependencyGraph<'_>,
    module_name: &str,
    all_dependencies: &BTreeSet<String>,
) -> String {
    let mut out = String::new();
    let mut previous_prefix: Option<String> = None;

    for name in graph.sort_dependencies(all_dependencies) {
        let prefix = extract_prefix(&name).to_string();
        if previous_prefix.as_deref().is_some_and(|p| !p.is_empty() && p != prefix) {
            out.push('\n');
        }
        out.push_str(&format!("SUBDIRS += {}\n", name));
        previous_prefix = Some(prefix);
    }

    out.push('\n');

    if !module_name.is_empty() {
        out.push_str(&format!("SUBDIRS += {}\n\n", module_name));
    }

    out
}

/// Render `dependencies.pri` for a new module
pub fn generate_dependencies(
    graph: &DependencyGraph<'_>,
    module_name: &str,
    selected_libraries: &BTreeSet<String>,
) -> String {
    let mut out = String::new();
    for name in graph.sort_dependencies(selected_libraries) {
        out.push_str(&format!("DEPENDENCIES += {}\n", name));
    }
    out.push_str(&format!("\nINCLUDEPATHS += {}/inc\n", module_name));
    out
}

/// Re-sort an existing `submodules.pri` in place.
///
/// Returns the number of entries written; a file without entries is left alone.
pub fn sort_submodules_file(graph: &DependencyGraph<'_>, path: &Path) -> ForgeResult<usize> {
    let subdirs = parse_submodules(path)?;
    if subdirs.is_empty() {
        return Ok(0);
    }

    let content = generate_submodules(graph, "", &subdirs);
    fs::write(path, content)
        .map_err(|e| ForgeError::io(format!("writing {}", path.display()), e))?;
    Ok(subdirs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Module, KIND_APP, KIND_LIB};
    use tempfile::TempDir;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn modules() -> Vec<Module> {
        vec![
            Module::new("fw_core", KIND_LIB),
            Module::new("fw_widgets", KIND_LIB).with_dependencies(["fw_core"]),
            Module::new("tp_utils", KIND_LIB),
            Module::new("app_template", KIND_APP).with_dependencies(["fw_widgets"]),
        ]
    }

    #[test]
    fn parse_strips_whitespace_and_plus() {
        let pairs = parse_pri("DEPENDENCIES += fw_core\n  DEPENDENCIES =fw_math \nTEMPLATE=lib\n");
        assert_eq!(
            pairs,
            vec![
                ("DEPENDENCIES".to_string(), "fw_core".to_string()),
                ("DEPENDENCIES".to_string(), "fw_math".to_string()),
                ("TEMPLATE".to_string(), "lib".to_string()),
            ]
        );
    }

    #[test]
    fn parse_skips_malformed_lines() {
        let pairs = parse_pri("# comment\nNOVALUE =\n= orphan\nA = b = c\n\nINCLUDEPATHS += x/inc\n");
        assert_eq!(pairs, vec![("INCLUDEPATHS".to_string(), "x/inc".to_string())]);
    }

    #[test]
    fn missing_fragments_are_empty() {
        let temp = TempDir::new().unwrap();
        assert!(read_dependencies(temp.path()).is_empty());
        assert!(read_template_kind(temp.path()).is_none());
    }

    #[test]
    fn reads_module_fragments() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(DEPENDENCIES_FILE),
            "DEPENDENCIES += fw_core\nDEPENDENCIES += fw_math\nINCLUDEPATHS += fw_plot/inc\n",
        )
        .unwrap();
        std::fs::write(temp.path().join(VARS_FILE), "TEMPLATE = lib\nTARGET = fw_plot\n").unwrap();

        assert_eq!(read_dependencies(temp.path()), set(&["fw_core", "fw_math"]));
        assert_eq!(read_template_kind(temp.path()).as_deref(), Some("lib"));
    }

    #[test]
    fn submodules_grouped_by_prefix() {
        let modules = modules();
        let graph = DependencyGraph::new(&modules);
        let text = generate_submodules(&graph, "myco_tool", &set(&["fw_widgets", "fw_core"]));
        assert_eq!(
            text,
            "SUBDIRS += fw_core\nSUBDIRS += fw_widgets\n\nSUBDIRS += myco_tool\n\n"
        );
    }

    #[test]
    fn submodules_blank_line_between_prefixes() {
        let modules = modules();
        let graph = DependencyGraph::new(&modules);
        let text = generate_submodules(&graph, "", &set(&["tp_utils", "fw_core", "ext_zlib"]));
        assert_eq!(
            text,
            "SUBDIRS += fw_core\n\nSUBDIRS += tp_utils\n\nSUBDIRS += ext_zlib\n\n"
        );
    }

    #[test]
    fn dependencies_fragment() {
        let modules = modules();
        let graph = DependencyGraph::new(&modules);
        let text = generate_dependencies(&graph, "myco_tool", &set(&["fw_widgets"]));
        assert_eq!(
            text,
            "DEPENDENCIES += fw_widgets\n\nINCLUDEPATHS += myco_tool/inc\n"
        );
    }

    #[test]
    fn sort_existing_submodules_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SUBMODULES_FILE);
        std::fs::write(&path, "SUBDIRS += tp_utils\nSUBDIRS += fw_widgets\nSUBDIRS += fw_core\n")
            .unwrap();

        let modules = modules();
        let graph = DependencyGraph::new(&modules);
        assert_eq!(sort_submodules_file(&graph, &path).unwrap(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "SUBDIRS += fw_core\nSUBDIRS += fw_widgets\n\nSUBDIRS += tp_utils\n\n"
        );
    }

    #[test]
    fn sort_empty_submodules_file_is_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SUBMODULES_FILE);
        std::fs::write(&path, "# nothing here\n").unwrap();

        let modules = modules();
        let graph = DependencyGraph::new(&modules);
        assert_eq!(sort_submodules_file(&graph, &path).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# nothing here\n");
    }
}
