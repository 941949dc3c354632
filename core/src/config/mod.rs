mod load;
mod types;

pub use load::{apply_env_overrides, get_semflow_data_dir, load_default, load_file};
pub use types::{ColorChoice, LoggingConfig, Options, ResolvedOptions, SemflowConfig};
