//! Step output publishing.
//!
//! GitHub Actions collects step outputs from the file named by
//! `GITHUB_OUTPUT`, one `name=value` line per output. Outside a runner the
//! line is written to stdout instead.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;

use crate::error::ReviewAppError;

/// Destination for step outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutput {
    /// Append to the runner's output file.
    File(Utf8PathBuf),
    /// Print on standard output.
    Stdout,
}

impl ActionOutput {
    /// Picks the output file when one is configured.
    #[must_use]
    pub fn from_path(path: Option<Utf8PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Publishes `name=value`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewAppError::Io`] when the line cannot be written.
    pub fn publish(&self, name: &str, value: &str) -> Result<(), ReviewAppError> {
        let line = format!("{name}={value}\n");
        match self {
            Self::File(path) => append_line(path, &line),
            Self::Stdout => io::stdout()
                .lock()
                .write_all(line.as_bytes())
                .map_err(|error| ReviewAppError::Io {
                    message: format!("failed to write output {name}: {error}"),
                }),
        }
    }
}

fn append_line(path: &Utf8Path, line: &str) -> Result<(), ReviewAppError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| ReviewAppError::Io {
        message: format!("invalid output path '{path}': no file name"),
    })?;

    let mut options = OpenOptions::new();
    options.append(true).create(true);

    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.open_with(file_name, &options))
        .and_then(|mut file| file.write_all(line.as_bytes()))
        .map_err(|error| ReviewAppError::Io {
            message: format!("failed to append to output file '{path}': {error}"),
        })
}
