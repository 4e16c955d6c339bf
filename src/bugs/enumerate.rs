//! Discovery of bugs under a projects root and of snapshot trees under an
//! output root.

use std::io;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use super::{BugRef, BUGS_DIR};

/// Lazily yields every bug with a directory at `<root>/<project>/bugs/<bug-id>/`.
///
/// Order follows directory listing order. Entries that cannot be read are
/// logged and skipped.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
pub fn discover_bugs(root: &Path) -> io::Result<impl Iterator<Item = BugRef>> {
    ensure_dir(root)?;
    // No min_depth: walkdir hides shallower entries from filter_entry, and
    // the project and bugs levels must be pruned there.
    let walker = WalkDir::new(root)
        .max_depth(3)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match entry.depth() {
            1 => entry.file_type().is_dir(),
            2 => entry.file_type().is_dir() && entry.file_name() == BUGS_DIR,
            _ => true,
        });
    Ok(dirs_only(walker)
        .filter(|entry| entry.depth() == 3)
        .filter_map(|entry| bug_from(&entry, 2)))
}

/// Lazily yields every `<root>/<project>/<bug-id>/` directory in an output tree.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
pub fn discover_snapshots(root: &Path) -> io::Result<impl Iterator<Item = BugRef>> {
    ensure_dir(root)?;
    let walker = WalkDir::new(root)
        .max_depth(2)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() != 1 || entry.file_type().is_dir());
    Ok(dirs_only(walker)
        .filter(|entry| entry.depth() == 2)
        .filter_map(|entry| bug_from(&entry, 1)))
}

fn ensure_dir(root: &Path) -> io::Result<()> {
    // Surfaces permission errors up front instead of as a silent empty walk.
    std::fs::read_dir(root).map(drop)
}

fn dirs_only(
    walker: impl Iterator<Item = walkdir::Result<DirEntry>>,
) -> impl Iterator<Item = DirEntry> {
    walker.filter_map(|result| match result {
        Ok(entry) if entry.file_type().is_dir() => Some(entry),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!("skipping unreadable entry: {err}");
            None
        }
    })
}

/// Builds a `BugRef` from a bug directory whose project directory sits
/// `levels_up` parents above it.
fn bug_from(entry: &DirEntry, levels_up: usize) -> Option<BugRef> {
    let bug_id = entry.file_name().to_str();
    let project = entry
        .path()
        .ancestors()
        .nth(levels_up)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str());
    match (project, bug_id) {
        (Some(project), Some(bug_id)) => Some(BugRef::new(project, bug_id)),
        _ => {
            tracing::warn!("skipping non UTF-8 bug path {}", entry.path().display());
            None
        }
    }
}
