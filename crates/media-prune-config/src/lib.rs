pub mod config;
pub mod paths;

pub use config::{
    add_unique_int, add_unique_string, Config, Exceptions, MovieExceptions, Rules, SeriesExceptions,
    ServiceConfig,
};
pub use paths::{container_base_path, PathManager};
