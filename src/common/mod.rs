pub mod config;
pub mod format;
pub mod mode;
pub mod permissions;

pub use config::Config;
pub use mode::Mode;
