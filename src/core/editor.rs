//! Launching an external editor on a file from the diff.

use std::env;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

use super::{RelPath, RepoRoot};

/// Errors from launching an external editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// No editor is configured in the environment.
    #[error("set $HUNKVIEW_EDITOR, $VISUAL, or $EDITOR to open files externally")]
    NoEditor,
    /// An editor variable could not be parsed as a command line.
    #[error("failed to parse ${0}: {1}")]
    BadCommand(&'static str, shell_words::ParseError),
    /// The editor process could not be started.
    #[error("failed to launch editor: {0}")]
    Launch(#[from] std::io::Error),
    /// The editor exited with a failure status.
    #[error("editor exited with code {0:?}")]
    Failed(Option<i32>),
}

/// Open a repository file in the configured editor, optionally at a line.
///
/// The editor comes from `$HUNKVIEW_EDITOR`, `$VISUAL`, or `$EDITOR`, first
/// non-empty wins; the value is split shell-style so flags like
/// `"code --wait"` work. Blocks until the editor exits.
pub fn open_in_editor(
    root: &RepoRoot,
    path: &RelPath,
    line: Option<u32>,
) -> Result<(), EditorError> {
    let parts = editor_command()?;
    let (program, args) = parts
        .split_first()
        .expect("editor command is non-empty");

    let absolute = path.to_absolute(root);
    let target = absolute.to_string_lossy();

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.args(file_args(program, &target, line));
    cmd.current_dir(root.path());

    let status = cmd.status()?;
    if !status.success() {
        return Err(EditorError::Failed(status.code()));
    }
    Ok(())
}

/// Resolve the editor command line from the environment.
fn editor_command() -> Result<Vec<String>, EditorError> {
    for key in ["HUNKVIEW_EDITOR", "VISUAL", "EDITOR"] {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            match shell_words::split(trimmed) {
                Ok(parts) if !parts.is_empty() => return Ok(parts),
                Ok(_) => continue,
                Err(e) => return Err(EditorError::BadCommand(key, e)),
            }
        }
    }
    Err(EditorError::NoEditor)
}

/// Place the file (and optional line) into the editor's argument list.
///
/// VS Code takes `-g file:line`, Sublime and Atom take `file:line`, the
/// usual terminal editors take `+line file`; anything else gets just the
/// path and the line is dropped.
fn file_args(program: &str, path: &str, line: Option<u32>) -> Vec<String> {
    let name = Path::new(program)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(program);

    match (name, line) {
        ("code" | "code-insiders" | "codium", Some(line)) => {
            vec!["-g".to_string(), format!("{}:{}", path, line)]
        }
        ("subl" | "atom", Some(line)) => vec![format!("{}:{}", path, line)],
        ("vi" | "vim" | "nvim" | "nano" | "emacs", Some(line)) => {
            vec![format!("+{}", line), path.to_string()]
        }
        _ => vec![path.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_placement_per_editor() {
        assert_eq!(
            file_args("code", "/repo/src/main.rs", Some(42)),
            vec!["-g", "/repo/src/main.rs:42"]
        );
        assert_eq!(
            file_args("subl", "/repo/src/main.rs", Some(7)),
            vec!["/repo/src/main.rs:7"]
        );
        assert_eq!(
            file_args("nvim", "/repo/src/main.rs", Some(7)),
            vec!["+7", "/repo/src/main.rs"]
        );
        // Unknown editors get only the path
        assert_eq!(
            file_args("someeditor", "/repo/src/main.rs", Some(7)),
            vec!["/repo/src/main.rs"]
        );
    }

    #[test]
    fn no_line_means_bare_path() {
        assert_eq!(
            file_args("code", "/repo/src/main.rs", None),
            vec!["/repo/src/main.rs"]
        );
        assert_eq!(
            file_args("vim", "/repo/src/main.rs", None),
            vec!["/repo/src/main.rs"]
        );
    }

    #[test]
    fn editor_name_stripped_of_directories() {
        assert_eq!(
            file_args("/usr/local/bin/code", "/repo/f.rs", Some(3)),
            vec!["-g", "/repo/f.rs:3"]
        );
    }

    // Single test for all env cases: the variables are process-global.
    #[test]
    fn editor_command_from_environment() {
        env::set_var("HUNKVIEW_EDITOR", "code --wait");
        assert_eq!(editor_command().unwrap(), vec!["code", "--wait"]);

        env::set_var("HUNKVIEW_EDITOR", "'unclosed");
        assert!(matches!(
            editor_command(),
            Err(EditorError::BadCommand("HUNKVIEW_EDITOR", _))
        ));

        env::remove_var("HUNKVIEW_EDITOR");
    }
}
