use std::path::{Path, PathBuf};

use compio::fs;
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;

const DEFAULT_PATH_LIST_FILE_NAME: &str = "paths.txt";

pub fn get_default_path_list_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_PATH_LIST_FILE_NAME)
}

/// File paths fed to the tree builder, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathList {
    paths: Vec<String>,
}

impl PathList {
    pub async fn read(path: &Path) -> Result<Self, PathListError> {
        debug!("Reading path list from {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            path: path.to_path_buf(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            path: path.to_path_buf(),
        })?;
        let list = Self::parse(&contents);
        debug!("Read {} paths", list.len());
        Ok(list)
    }

    /// Blank lines and lines starting with `#` are skipped. Surrounding whitespace is trimmed.
    pub fn parse(contents: &str) -> Self {
        let paths = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum PathListError {
    #[snafu(display("Failed to read the path list: {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Path list {} is not valid UTF-8", path.best_effort_path_display()))]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[rstest]
    #[case("src/lib.rs\nsrc/main.rs\n", vec!["src/lib.rs", "src/main.rs"])]
    #[case("# generated\n\nsrc/lib.rs\n   \n", vec!["src/lib.rs"])]
    #[case("  padded/file.txt  \r\n", vec!["padded/file.txt"])]
    #[case("", vec![])]
    fn parses_lines(#[case] contents: &str, #[case] expected: Vec<&str>) {
        let list = PathList::parse(contents);
        assert_eq!(list.paths(), expected.as_slice());
    }

    #[compio::test]
    async fn reads_list_from_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = get_default_path_list_path(dir.path());
        std::fs::write(&path, "a/b/c/file.txt\n# skipped\nBuild/index.html\n")
            .expect("Failed to write path list");

        let list = PathList::read(&path).await.expect("path list should load");

        assert_eq!(list.paths(), ["a/b/c/file.txt", "Build/index.html"]);
    }

    #[compio::test]
    async fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let result = PathList::read(&get_default_path_list_path(dir.path())).await;

        match result {
            Err(PathListError::ReadError { path, .. }) => {
                assert!(path.ends_with(DEFAULT_PATH_LIST_FILE_NAME));
            }
            other => panic!("Expected ReadError, got {other:?}"),
        }
    }

    #[compio::test]
    async fn invalid_utf8_is_an_encoding_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).expect("Failed to write file");

        let result = PathList::read(&path).await;
        assert!(matches!(result, Err(PathListError::EncodingError { .. })));
    }
}
