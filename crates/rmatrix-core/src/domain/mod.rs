pub mod errors;

pub use errors::{ErrorCategory, ReconstructionError, ReconstructionResult};
