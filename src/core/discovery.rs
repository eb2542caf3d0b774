//! Repository discovery across one or more root directories

use dashmap::DashMap;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::{
    ESTIMATED_REPO_COUNT, MAX_SCAN_DEPTH, SKIP_DIRECTORIES, UNKNOWN_REPO_NAME,
};

/// Check if a .git file (for submodules/worktrees) contains a gitdir reference
/// Only reads the first 5 lines for efficiency
fn is_git_file(path: &Path) -> bool {
    match fs::File::open(path) {
        Ok(file) => {
            let reader = BufReader::new(file);
            reader
                .lines()
                .take(5)
                .filter_map(Result::ok)
                .any(|line| line.trim_start().starts_with("gitdir:"))
        }
        Err(_) => false,
    }
}

/// Returns true if `folder` carries a version-control marker as a direct
/// child: a `.git` directory, or a `.git` file pointing at a gitdir
/// (submodules and worktrees).
fn has_git_marker(folder: &Path) -> bool {
    let marker = folder.join(".git");
    match fs::metadata(&marker) {
        Ok(meta) if meta.is_dir() => true,
        Ok(meta) if meta.is_file() => is_git_file(&marker),
        _ => false,
    }
}

/// Derives the display name for a discovered repository, suffixing
/// duplicates with `-N`.
fn register_name(path: &Path, name_counts: &DashMap<String, u32>) -> String {
    let base_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(UNKNOWN_REPO_NAME)
        .to_string();

    let mut entry = name_counts.entry(base_name.clone()).or_insert(0);
    *entry += 1;
    let count = *entry;
    if count > 1 {
        format!("{base_name}-{count}")
    } else {
        base_name
    }
}

/// Recursively searches for git repositories under the given roots.
/// Returns a vector of (`repository_name`, path) tuples with deduplication.
///
/// A directory identified as a repository root is not descended into, so a
/// repository nested inside another repository is never reported. Unreadable
/// subtrees are skipped rather than failing the whole scan.
///
/// Uses a parallel directory walker with `DashMap` for lock-free collection.
pub fn find_repos(roots: &[PathBuf]) -> Vec<(String, PathBuf)> {
    let repos_map: Arc<DashMap<PathBuf, String>> =
        Arc::new(DashMap::with_capacity(ESTIMATED_REPO_COUNT));
    let name_counts: Arc<DashMap<String, u32>> =
        Arc::new(DashMap::with_capacity(ESTIMATED_REPO_COUNT));

    for root in roots {
        // A root that is itself a repository is reported as-is; nothing
        // underneath it is scanned.
        if has_git_marker(root) {
            let canonical = root.canonicalize().unwrap_or_else(|_| root.clone());
            if !repos_map.contains_key(&canonical) {
                let name = register_name(&canonical, &name_counts);
                repos_map.insert(canonical, name);
            }
            continue;
        }

        let repos_map_clone = Arc::clone(&repos_map);
        let name_counts_clone = Arc::clone(&name_counts);

        let walker = WalkBuilder::new(root)
            .follow_links(true) // Follow symlinks to find symlinked repos
            .max_depth(Some(MAX_SCAN_DEPTH))
            .threads(num_cpus::get().min(8))
            .hidden(false)
            .filter_entry(move |entry| {
                if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }

                let file_name = entry.file_name().to_str().unwrap_or("");

                // Skip common build/dependency directories
                if SKIP_DIRECTORIES.contains(&file_name) {
                    return false;
                }

                // Skip hidden directories (.config, .cache, .git itself, ...)
                if entry.depth() > 0 && file_name.starts_with('.') {
                    return false;
                }

                let path = entry.path();
                if has_git_marker(path) {
                    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
                    if !repos_map_clone.contains_key(&canonical) {
                        let name = register_name(path, &name_counts_clone);
                        repos_map_clone.insert(canonical, name);
                    }
                    // Repository root found: do not descend, nested repos
                    // are not reported
                    return false;
                }

                true
            })
            .build_parallel();

        // Unreadable entries surface as walk errors; skip them and continue
        walker.run(|| Box::new(|_| ignore::WalkState::Continue));
    }

    let mut repos: Vec<(String, PathBuf)> = Arc::try_unwrap(repos_map)
        .map(|map| map.into_iter().map(|(p, n)| (n, p)).collect())
        .unwrap_or_else(|arc| {
            arc.iter()
                .map(|r| (r.value().clone(), r.key().clone()))
                .collect()
        });

    // Sort repositories alphabetically by name (case-insensitive)
    repos.par_sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    repos
}
