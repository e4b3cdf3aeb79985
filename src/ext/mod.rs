mod best_effort_path_ext;
mod tree_path_ext;

pub use best_effort_path_ext::BestEffortPathExt;

pub use tree_path_ext::{
    FLATTENED_PREFIX, PATH_SEPARATOR, TreePathExt, expand_implicit_parent_directories,
    flattened_id, is_flattened_id, parent_path, path_depth, path_name, path_prefixes,
    strip_flattened_prefix,
};
