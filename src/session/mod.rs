mod session_store;

pub use session_store::{Session, SessionStoreError, fingerprint_paths, get_session_file_path};
