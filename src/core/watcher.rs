//! Debounced repository watching for live re-rendering.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};

use super::RepoRoot;

/// Events emitted by the repo watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// Files changed, the diff should be recollected.
    Changed,
}

/// Watches a repository for file changes.
///
/// A burst of filesystem events collapses into a single trailing
/// [`WatchEvent::Changed`]; callers never see more than one pending event
/// per debounce window.
pub struct RepoWatcher {
    /// Receiver for watch events.
    rx: Receiver<WatchEvent>,
    /// Keep watcher alive. Dropping this stops watching.
    _watcher: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl RepoWatcher {
    /// Create a new watcher for the given repository root.
    ///
    /// Watches recursively, excluding `.git/`. Events are debounced with a
    /// 200ms window and coalesced into `WatchEvent::Changed`.
    pub fn new(root: &RepoRoot) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let repo_path = root.path().to_path_buf();

        let mut debouncer = new_debouncer(
            Duration::from_millis(200),
            move |res: DebounceEventResult| {
                if let Ok(events) = res {
                    let relevant = events.iter().any(|e| !is_ignored_path(&e.path, &repo_path));

                    if relevant {
                        let _ = tx.send(WatchEvent::Changed);
                    }
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(root.path(), RecursiveMode::Recursive)?;

        Ok(Self {
            rx,
            _watcher: debouncer,
        })
    }

    /// Poll for watch events without blocking.
    ///
    /// Returns `Some(WatchEvent)` if files changed, `None` if no events pending.
    pub fn poll(&self) -> Option<WatchEvent> {
        match self.rx.try_recv() {
            Ok(event) => {
                // Drain any additional pending events (debouncer may send multiple)
                while self.rx.try_recv().is_ok() {}
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Check if a path should be ignored for watching.
fn is_ignored_path(path: &Path, repo_root: &Path) -> bool {
    let rel = match path.strip_prefix(repo_root) {
        Ok(r) => r,
        Err(_) => return false,
    };

    rel.components().any(|component| {
        matches!(component, std::path::Component::Normal(name) if name == ".git")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn git_internals_are_ignored() {
        let root = PathBuf::from("/repo");

        assert!(is_ignored_path(Path::new("/repo/.git/objects/abc"), &root));
        assert!(is_ignored_path(Path::new("/repo/.git/HEAD"), &root));

        assert!(!is_ignored_path(Path::new("/repo/src/main.rs"), &root));
        assert!(!is_ignored_path(Path::new("/repo/file.txt"), &root));
        assert!(!is_ignored_path(Path::new("/repo/some/.gitignore"), &root));
        // Paths outside the root are kept
        assert!(!is_ignored_path(Path::new("/elsewhere/.git/HEAD"), &root));
    }
}
