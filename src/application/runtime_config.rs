use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::get_default_path_list_path;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: Command,
    pub root: PathBuf,
    pub path_list: PathBuf,
    pub flatten: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let path_list = cli
            .paths
            .unwrap_or_else(|| get_default_path_list_path(&cli.root));
        Self {
            command: cli.command,
            root: cli.root,
            path_list,
            flatten: cli.flatten,
        }
    }
}
