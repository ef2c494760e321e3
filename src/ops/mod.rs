pub mod catalog;

pub use catalog::{build_registry, check_preconditions, is_program_available};
