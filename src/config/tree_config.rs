use std::borrow::Cow;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::reconcile::TreeOptions;
use crate::tree::{DEFAULT_ROOT_ID, DEFAULT_ROOT_NAME};

const CONFIG_FILE_NAME: &str = "pathtree.yaml";

pub fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `pathtree.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeConfig {
    pub flatten_empty_directories: bool,
    pub root_id: Option<String>,
    pub root_name: Option<String>,
    /// Paths expanded when no session exists yet.
    pub expanded: Vec<String>,
    /// Paths selected when no session exists yet.
    pub selected: Vec<String>,
}

impl TreeConfig {
    /// Reads the config from `root`, falling back to defaults when the file does not exist.
    pub async fn read(root: &Path) -> Result<Self, TreeConfigCreationError> {
        let path = get_config_file_path(root);
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.best_effort_path_display());
            return Ok(Self::default());
        }
        Self::from_path(path).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, TreeConfigCreationError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    pub fn tree_options(&self, flatten_override: bool) -> TreeOptions {
        TreeOptions {
            flatten_empty_directories: flatten_override || self.flatten_empty_directories,
            root_id: self
                .root_id
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_ID.to_string()),
            root_name: self
                .root_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string()),
        }
    }

    fn key(name: &str) -> Yaml<'_> {
        Yaml::Value(Scalar::String(Cow::Borrowed(name)))
    }

    fn parse_flag(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        name: &'static str,
    ) -> Result<bool, TreeConfigCreationError> {
        match top_level.get(&Self::key(name)) {
            None => Ok(false),
            Some(value) => value.as_bool().context(NotABoolSnafu { key: name }),
        }
    }

    fn parse_string(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        name: &'static str,
    ) -> Result<Option<String>, TreeConfigCreationError> {
        match top_level.get(&Self::key(name)) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .context(NotAStringSnafu { key: name }),
        }
    }

    fn parse_path_list(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        name: &'static str,
    ) -> Result<Vec<String>, TreeConfigCreationError> {
        let Some(value) = top_level.get(&Self::key(name)) else {
            return Ok(Vec::new());
        };
        let paths = value
            .as_sequence()
            .context(NotAListSnafu { key: name })?
            .iter()
            .filter_map(|item| {
                let path = item.as_str();
                if path.is_none() {
                    debug!("Skipping non-string entry in '{}': {:?}", name, item);
                }
                path.map(str::to_string)
            })
            .collect();
        Ok(paths)
    }
}

impl TryFrom<&str> for TreeConfig {
    type Error = TreeConfigCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if document.is_null() {
            return Ok(Self::default());
        }
        let top_level = document
            .as_mapping()
            .ok_or(TreeConfigCreationError::TopLevelNotMap)?;

        Ok(TreeConfig {
            flatten_empty_directories: Self::parse_flag(top_level, "flattenEmptyDirectories")?,
            root_id: Self::parse_string(top_level, "rootId")?,
            root_name: Self::parse_string(top_level, "rootName")?,
            expanded: Self::parse_path_list(top_level, "expanded")?,
            selected: Self::parse_path_list(top_level, "selected")?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum TreeConfigCreationError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be true or false", key))]
    NotABool { key: String },
    #[snafu(display("'{}' should be a string", key))]
    NotAString { key: String },
    #[snafu(display("'{}' should be a list of paths", key))]
    NotAList { key: String },
}
