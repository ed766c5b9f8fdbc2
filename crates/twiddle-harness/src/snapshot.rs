#![forbid(unsafe_code)]

//! HTML snapshots of element trees.
//!
//! Snapshots live in `tests/snapshots/<name>.html` of the calling crate and
//! are committed with it. With `BLESS=1` set, missing or differing snapshots
//! are written instead of failing.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Snapshot missing | Panic naming the path |
//! | Snapshot differs | Panic with expected/actual and their digests |
//! | Snapshot dir not writable | Panic naming the path |

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use twiddle_dom::Element;

/// Assert that `element`'s HTML matches the stored snapshot `name`.
///
/// ```ignore
/// assert_html_snapshot!("folder_collapsed", pane.element());
/// ```
#[macro_export]
macro_rules! assert_html_snapshot {
    ($name:expr, $element:expr) => {
        $crate::snapshot::assert_snapshot(
            ::std::path::Path::new(env!("CARGO_MANIFEST_DIR")),
            $name,
            $element,
        )
    };
}

/// Stable 16-hex-digit digest of an element tree.
#[must_use]
pub fn html_digest(element: &Element) -> String {
    let html = normalize_html(&element.outer_html());
    let hash = blake3::hash(html.as_bytes());
    hash.to_hex()[..16].to_owned()
}

/// Trim trailing whitespace per line and drop blank lines.
#[must_use]
pub fn normalize_html(html: &str) -> String {
    html.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn snapshot_path(manifest_dir: &Path, name: &str) -> PathBuf {
    manifest_dir
        .join("tests")
        .join("snapshots")
        .join(format!("{name}.html"))
}

fn bless() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1")
}

/// Backing function of [`assert_html_snapshot!`].
///
/// # Panics
///
/// When the snapshot is missing or differs and `BLESS` is unset, or when it
/// cannot be written.
#[track_caller]
pub fn assert_snapshot(manifest_dir: &Path, name: &str, element: &Element) {
    let actual = normalize_html(&element.outer_html());
    let path = snapshot_path(manifest_dir, name);
    match fs::read_to_string(&path) {
        Ok(expected) if normalize_html(&expected) == actual => {}
        _ if bless() => write_snapshot(&path, &actual),
        Ok(expected) => {
            let expected = normalize_html(&expected);
            panic!(
                "snapshot `{name}` differs ({} != {})\n--- expected\n{expected}\n--- actual\n{actual}\n\
                 rerun with BLESS=1 to accept",
                blake3::hash(expected.as_bytes()).to_hex(),
                blake3::hash(actual.as_bytes()).to_hex(),
            );
        }
        Err(err) => panic!(
            "snapshot `{name}` missing at {} ({err})\n--- actual\n{actual}\n\
             rerun with BLESS=1 to create it",
            path.display()
        ),
    }
}

#[track_caller]
fn write_snapshot(path: &Path, html: &str) {
    let written = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(path, format!("{html}\n")));
    if let Err(err) = written {
        panic!("cannot write snapshot {}: {err}", path.display());
    }
    info!(path = %path.display(), "snapshot written");
}
