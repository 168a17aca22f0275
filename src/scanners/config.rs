//! Config scanner: cross-checks infrastructure files against the project.
//! docker-compose build contexts must contain files, `.env.example` keys must
//! be referenced somewhere, and Cargo.toml dependency tables are compared
//! against `use`/path references in Rust sources.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::SweepConfig;
use crate::report::{Action, Issue, IssueCategory, Severity};
use crate::resolver::normalize;
use crate::scanners::{ScanResult, Scanner};

pub struct ConfigScanner;

impl Scanner for ConfigScanner {
    fn name(&self) -> &'static str {
        "config"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".yml", ".yaml", ".json", ".toml"]
    }

    fn scan(
        &self,
        files: &[PathBuf],
        all_files: &[PathBuf],
        config: &SweepConfig,
    ) -> Result<ScanResult> {
        let mut result = ScanResult {
            files: files.to_vec(),
            ..Default::default()
        };

        for file in files {
            let Some(name) = file.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            match name.as_str() {
                "docker-compose.yml" | "docker-compose.yaml" => {
                    scan_docker_compose(file, all_files, &mut result.issues);
                }
                "Cargo.toml" => {
                    scan_cargo_toml(file, all_files, &mut result.issues);
                }
                _ => {}
            }
        }

        // Discovery never yields dotfiles, so look for the file at the root
        let env_example = config.root_dir.join(".env.example");
        if env_example.exists() {
            scan_env_example(&env_example, all_files, &mut result.issues);
        }

        Ok(result)
    }
}

/// Each compose service's build context must contain at least one file.
fn scan_docker_compose(file: &Path, all_files: &[PathBuf], issues: &mut Vec<Issue>) {
    let Ok(content) = std::fs::read_to_string(file) else {
        return;
    };
    let Ok(doc) = serde_yaml::from_str::<serde_yaml::Value>(&content) else {
        // Malformed YAML is skipped, not reported
        return;
    };
    let Some(services) = doc.get("services").and_then(|s| s.as_mapping()) else {
        return;
    };

    for (service_name, service) in services {
        let name = service_name.as_str().unwrap_or("<unnamed>");
        let build_ctx = match service.get("build") {
            Some(serde_yaml::Value::String(ctx)) => Some(ctx.clone()),
            Some(other) => other
                .get("context")
                .and_then(|c| c.as_str())
                .map(str::to_string),
            None => None,
        };
        let Some(ctx) = build_ctx else {
            continue;
        };

        let dir = file.parent().unwrap_or_else(|| Path::new(""));
        let build_dir = normalize(&dir.join(&ctx));
        let has_files = all_files.iter().any(|f| f.starts_with(&build_dir));
        if !has_files {
            issues.push(Issue::new(
                IssueCategory::StaleReference,
                Severity::Warning,
                file,
                format!("Service '{name}' references build context '{ctx}' but directory has no files"),
                Action::Skip,
            ));
        }
    }
}

/// `.env.example` keys should appear in at least one config-like file.
fn scan_env_example(file: &Path, all_files: &[PathBuf], issues: &mut Vec<Issue>) {
    let Ok(content) = std::fs::read_to_string(file) else {
        return;
    };
    let keys: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split('=').next())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();
    if keys.is_empty() {
        return;
    }

    let config_like = |f: &PathBuf| {
        let s = f.to_string_lossy();
        s.ends_with("config.py")
            || s.ends_with("config.ts")
            || s.ends_with("config.js")
            || s.contains("settings")
    };
    let mut haystack = String::new();
    for f in all_files.iter().filter(|f| config_like(f)) {
        if let Ok(text) = std::fs::read_to_string(f) {
            haystack.push_str(&text);
            haystack.push('\n');
        }
    }
    // The real .env is a dotfile too, so discovery never lists it
    if let Some(dir) = file.parent() {
        if let Ok(text) = std::fs::read_to_string(dir.join(".env")) {
            haystack.push_str(&text);
            haystack.push('\n');
        }
    }

    for key in keys {
        if !haystack.contains(key) {
            issues.push(Issue::new(
                IssueCategory::StaleReference,
                Severity::Info,
                file,
                format!("Environment variable '{key}' in .env.example is not referenced in any config file"),
                Action::Skip,
            ));
        }
    }
}

/// Cargo.toml dependencies should be referenced from some Rust source.
fn scan_cargo_toml(file: &Path, all_files: &[PathBuf], issues: &mut Vec<Issue>) {
    let Ok(content) = std::fs::read_to_string(file) else {
        return;
    };
    let Ok(doc) = content.parse::<toml::Table>() else {
        return;
    };

    let mut deps: Vec<String> = Vec::new();
    for section in ["dependencies", "dev-dependencies"] {
        if let Some(table) = doc.get(section).and_then(|v| v.as_table()) {
            deps.extend(table.keys().cloned());
        }
    }
    if deps.is_empty() {
        return;
    }

    let mut referenced: HashSet<String> = HashSet::new();
    for rs in all_files
        .iter()
        .filter(|f| f.extension().map_or(false, |e| e == "rs"))
    {
        let Ok(text) = std::fs::read_to_string(rs) else {
            continue;
        };
        for dep in &deps {
            // Crate names use underscores in source
            let ident = dep.replace('-', "_");
            if text.contains(&format!("use {ident}"))
                || text.contains(&format!("{ident}::"))
                || text.contains(&format!("extern crate {ident}"))
            {
                referenced.insert(dep.clone());
            }
        }
    }

    for dep in deps {
        if !referenced.contains(&dep) {
            issues.push(Issue::new(
                IssueCategory::UnusedDependency,
                Severity::Warning,
                file,
                format!("Crate '{dep}' in Cargo.toml is not referenced in any Rust file"),
                Action::Skip,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_service_with_empty_build_context_is_stale() {
        let td = tempfile::tempdir().unwrap();
        let compose = td.path().join("docker-compose.yml");
        std::fs::write(
            &compose,
            "services:\n  api:\n    build: ./api\n  web:\n    build:\n      context: ./web\n",
        )
        .unwrap();
        std::fs::create_dir_all(td.path().join("api")).unwrap();
        let api_src = td.path().join("api/main.py");
        std::fs::write(&api_src, "print('x')\n").unwrap();

        let all = vec![compose.clone(), api_src];
        let config = SweepConfig::default();
        let result = ConfigScanner.scan(&[compose], &all, &config).unwrap();

        let stale: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::StaleReference)
            .collect();
        assert_eq!(stale.len(), 1);
        assert!(stale[0].message.contains("web"));
    }

    #[test]
    fn unreferenced_env_example_key_is_flagged() {
        let td = tempfile::tempdir().unwrap();
        let env_example = td.path().join(".env.example");
        std::fs::write(&env_example, "DATABASE_URL=postgres://localhost\nGHOST_KEY=1\n").unwrap();
        let settings = td.path().join("settings.py");
        std::fs::write(&settings, "import os\nurl = os.environ['DATABASE_URL']\n").unwrap();

        // Dotfiles never appear in the discovered list; root probing must
        // still pick the file up
        let all = vec![settings];
        let mut config = SweepConfig::default();
        config.root_dir = td.path().to_path_buf();
        let result = ConfigScanner.scan(&[], &all, &config).unwrap();

        let stale: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.message.contains("GHOST_KEY"))
            .collect();
        assert_eq!(stale.len(), 1);
        assert!(!result.issues.iter().any(|i| i.message.contains("DATABASE_URL")));
    }

    #[test]
    fn env_example_key_referenced_only_in_dotenv_passes() {
        let td = tempfile::tempdir().unwrap();
        std::fs::write(td.path().join(".env.example"), "API_TOKEN=\n").unwrap();
        std::fs::write(td.path().join(".env"), "API_TOKEN=secret\n").unwrap();

        let mut config = SweepConfig::default();
        config.root_dir = td.path().to_path_buf();
        let result = ConfigScanner.scan(&[], &[], &config).unwrap();

        assert!(!result.issues.iter().any(|i| i.message.contains("API_TOKEN")));
    }

    #[test]
    fn unreferenced_cargo_dependency_is_flagged() {
        let td = tempfile::tempdir().unwrap();
        let manifest = td.path().join("Cargo.toml");
        std::fs::write(
            &manifest,
            "[package]\nname = \"demo\"\n\n[dependencies]\nserde_json = \"1.0\"\nunused-crate = \"0.1\"\n",
        )
        .unwrap();
        let src = td.path().join("main.rs");
        std::fs::write(&src, "fn main() { let _ = serde_json::json!({}); }\n").unwrap();

        let all = vec![manifest.clone(), src];
        let config = SweepConfig::default();
        let result = ConfigScanner.scan(&[manifest], &all, &config).unwrap();

        let unused: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::UnusedDependency)
            .collect();
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains("unused-crate"));
    }
}
