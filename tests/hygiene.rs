//! Hygiene checks over production sources.
//!
//! Scans production sources under `src/` for patterns the crate does not
//! allow. Each pattern has a budget (ideally zero). If you must add one, fix an
//! existing one first. Budgets only go down.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics: the frame loop must never crash the host.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or log instead" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or log instead" },
    Budget { pattern: "panic!(", max: 0, why: "return an error" },
    Budget { pattern: "unreachable!(", max: 0, why: "model the state explicitly" },
    Budget { pattern: "todo!(", max: 0, why: "finish the stub" },
    Budget { pattern: "unimplemented!(", max: 0, why: "finish the stub" },
    // Silent loss.
    Budget { pattern: "let _ =", max: 0, why: "inspect the result" },
    Budget { pattern: ".ok()", max: 0, why: "match on the error and log it" },
    // Style / structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
    Budget { pattern: "println!(", max: 0, why: "log through tracing or write to a locked handle" },
    Budget { pattern: "eprintln!(", max: 0, why: "log through tracing" },
];

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.rs"))
}

fn all_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            all_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

fn production_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    all_rs_files(&src_dir(), &mut files);
    files.retain(|f| !is_test_file(&f.path));
    files
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.display().to_string(), count))
        })
        .collect()
}

#[test]
fn pattern_budgets() {
    let files = production_files();
    assert!(!files.is_empty(), "no sources found under {}", src_dir().display());

    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let where_ = found
                .iter()
                .map(|(path, c)| format!("    {path}: {c}"))
                .collect::<Vec<_>>()
                .join("\n");
            failures.push(format!("`{}` found {count}, max {} ({}):\n{where_}", budget.pattern, budget.max, budget.why));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn env_reads_live_in_config() {
    let offenders: Vec<String> = production_files()
        .iter()
        .filter(|f| f.content.contains("std::env::var"))
        .filter(|f| f.path.file_name().is_some_and(|n| n != "config.rs"))
        .map(|f| f.path.display().to_string())
        .collect();
    assert!(offenders.is_empty(), "environment read outside config.rs:\n{}", offenders.join("\n"));
}

#[test]
fn every_test_file_is_wired_into_its_module() {
    let mut files = Vec::new();
    all_rs_files(&src_dir(), &mut files);
    let production = production_files();

    for test_file in files.iter().filter(|f| is_test_file(&f.path)) {
        let Some(name) = test_file.path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let attr = format!("#[path = \"{name}\"]");
        assert!(
            production.iter().any(|f| f.content.contains(&attr)),
            "{name} is not referenced by any #[path] attribute; its tests never run"
        );
    }
}
