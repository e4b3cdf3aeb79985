mod path_list;
mod tree_config;

pub use path_list::{PathList, PathListError, get_default_path_list_path};
pub use tree_config::{TreeConfig, TreeConfigCreationError, get_config_file_path};
