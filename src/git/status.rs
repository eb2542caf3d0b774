//! Working-tree state model and porcelain status parsing

/// Literal no-op message emitted by `git pull`, matched verbatim to detect
/// that nothing was fetched. Brittle coupling to git's message format.
pub const UP_TO_DATE_SENTINEL: &str = "Already up to date.";

/// Snapshot of one repository's working-tree and remote-tracking state.
///
/// Recomputed at every inspection point; an add/commit/pull invalidates any
/// previously captured snapshot.
#[derive(Clone, Debug)]
pub struct RepoStatus {
    /// `git diff` produced output (unstaged modifications)
    pub has_diff: bool,
    /// Raw `git status --porcelain` text (untracked or staged entries)
    pub status: String,
    /// Branch header reports local commits not on the remote tracking branch
    pub is_ahead: bool,
}

impl RepoStatus {
    pub fn has_pending(&self) -> bool {
        !self.status.is_empty()
    }

    /// Nothing to commit, nothing staged, nothing waiting to be pushed.
    pub fn is_clean(&self) -> bool {
        !self.has_diff && !self.has_pending() && !self.is_ahead
    }

    /// A previous run committed but the push never landed: no local edits of
    /// any kind, yet the tracking branch reports unpushed commits.
    pub fn is_ahead_only(&self) -> bool {
        !self.has_diff && !self.has_pending() && self.is_ahead
    }
}

/// Parses the `## branch...upstream [ahead N]` header line of
/// `git status --porcelain -b` output.
pub fn branch_header_is_ahead(header: &str) -> bool {
    header
        .lines()
        .find(|line| line.starts_with("##"))
        .is_some_and(|line| line.contains("ahead"))
}

/// Maps a porcelain change letter to its compact display symbol.
fn change_symbol(letter: char) -> &'static str {
    match letter {
        'M' | 'R' | 'C' => "*",
        'D' => "-",
        'A' => "+",
        _ => "",
    }
}

/// Compacts `git status --porcelain` output for display: each line's leading
/// change letter is replaced by a single symbol (`M→*`, `D→-`, `A→+`,
/// `R→*`, `C→*`); unrecognized letters are dropped, the rest of the line is
/// kept as-is.
pub fn compact_status(porcelain: &str) -> String {
    porcelain
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut chars = line.chars();
            let first = chars.next().unwrap_or(' ');
            format!("{}{}", change_symbol(first), chars.as_str())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_requires_all_three() {
        let clean = RepoStatus {
            has_diff: false,
            status: String::new(),
            is_ahead: false,
        };
        assert!(clean.is_clean());
        assert!(!clean.is_ahead_only());

        let ahead = RepoStatus {
            is_ahead: true,
            ..clean.clone()
        };
        assert!(!ahead.is_clean());
        assert!(ahead.is_ahead_only());

        let dirty = RepoStatus {
            has_diff: true,
            status: String::new(),
            is_ahead: true,
        };
        // Dirty and ahead is not the ahead-only recovery case
        assert!(!dirty.is_ahead_only());
    }

    #[test]
    fn test_branch_header_ahead_detection() {
        assert!(branch_header_is_ahead("## main...origin/main [ahead 2]"));
        assert!(branch_header_is_ahead(
            "## main...origin/main [ahead 1, behind 3]"
        ));
        assert!(!branch_header_is_ahead("## main...origin/main"));
        assert!(!branch_header_is_ahead("## main...origin/main [behind 3]"));
        // Only the ## header counts, not file lines
        assert!(!branch_header_is_ahead(" M ahead.txt"));
    }

    #[test]
    fn test_compact_status_maps_change_letters() {
        let porcelain = "M  src/lib.rs\nM  src/main.rs\nA  notes.txt";
        let compact = compact_status(porcelain);
        let lines: Vec<_> = compact.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('*'));
        assert!(lines[1].starts_with('*'));
        assert!(lines[2].starts_with('+'));
        // The raw letter code is gone
        assert!(!lines[0].starts_with("M"));
    }

    #[test]
    fn test_compact_status_deleted_and_renamed() {
        assert_eq!(compact_status("D  gone.rs"), "-  gone.rs");
        assert_eq!(compact_status("R  a -> b"), "*  a -> b");
        assert_eq!(compact_status("C  a -> b"), "*  a -> b");
    }

    #[test]
    fn test_compact_status_unknown_letter_is_unprefixed() {
        // Untracked entries keep their remaining columns but lose no data
        assert_eq!(compact_status("?? stray.txt"), "? stray.txt");
    }

    #[test]
    fn test_compact_status_skips_blank_lines() {
        assert_eq!(compact_status("M  a.rs\n\nM  b.rs\n"), "*  a.rs\n*  b.rs");
    }
}
