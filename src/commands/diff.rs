//! # Diff command
//!
//! Show unstaged changes (index vs. worktree) by default, or staged changes (HEAD vs. index)
//! with `--staged`.
//!
//! ## Usage
//!
//! ```bash
//! bit diff
//! bit diff --staged
//! ```

use anyhow::Result;

use crate::diff::{FileDiff, FileStatus, LineTag};
use crate::Repository;

pub fn run(staged: bool) -> Result<()> {
    let repo = Repository::find()?;
    let diffs = if staged { repo.diff_staged()? } else { repo.diff_unstaged()? };

    for file_diff in &diffs {
        print_file_diff(file_diff);
    }
    Ok(())
}

fn print_file_diff(file_diff: &FileDiff) {
    let status_label = match file_diff.status {
        FileStatus::Added => "added",
        FileStatus::Modified => "modified",
        FileStatus::Deleted => "deleted",
    };
    println!("diff --bit a/{path} b/{path} ({status_label})", path = file_diff.path);

    for hunk in &file_diff.hunks {
        println!("{}", hunk.header());
        for line in &hunk.lines {
            let prefix = match line.tag {
                LineTag::Context => ' ',
                LineTag::Addition => '+',
                LineTag::Deletion => '-',
            };
            print!("{prefix}{}", line.text);
            if !line.text.ends_with('\n') {
                println!();
            }
        }
    }
}
