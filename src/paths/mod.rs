pub mod path;

pub use path::{common_dir, is_external_url, join, normalize, resolve, ProjectPath};
