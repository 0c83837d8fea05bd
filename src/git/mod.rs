pub mod log;
pub mod repo;

pub use log::{LogOptions, LogStream};
pub use repo::GitRepo;
