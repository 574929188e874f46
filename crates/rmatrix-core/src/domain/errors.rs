//! Failure classes of a reconstruction run and the conversions from module
//! errors into them. The command-line driver prints the diagnostic and exits
//! with the category's code.

use crate::common::ConfigError;
use crate::endf::{AdapterError, RecordError};
use crate::rmatrix::{CompoundSystemError, EvaluationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ReconstructionResult<T> = Result<T, ReconstructionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed records, configs or arguments, and violated construction
    /// invariants.
    Input,
    Io,
    /// Evaluation failures at an energy: Coulomb budgets, singular systems.
    Computation,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Input => 2,
            Self::Io => 3,
            Self::Computation => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Io => "io",
            Self::Computation => "computation",
        }
    }
}

/// A categorised failure with a stable dotted code such as
/// `INPUT.RESONANCE_RECORD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionError {
    category: ErrorCategory,
    code: &'static str,
    message: String,
}

impl ReconstructionError {
    pub fn new(category: ErrorCategory, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Input, code, message)
    }

    pub fn io(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Io, code, message)
    }

    pub fn computation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Computation, code, message)
    }

    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }

    pub fn exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for ReconstructionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error [{}] {}",
            self.category.label(),
            self.code,
            self.message
        )
    }
}

impl Error for ReconstructionError {}

impl From<ConfigError> for ReconstructionError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Read { .. } => Self::io("IO.CONFIG_READ", error.to_string()),
            ConfigError::Parse { .. } => Self::input("INPUT.CONFIG_PARSE", error.to_string()),
        }
    }
}

impl From<RecordError> for ReconstructionError {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::Read { .. } => Self::io("IO.RESONANCE_RECORD_READ", error.to_string()),
            RecordError::Parse { .. } => {
                Self::input("INPUT.RESONANCE_RECORD_PARSE", error.to_string())
            }
        }
    }
}

impl From<AdapterError> for ReconstructionError {
    fn from(error: AdapterError) -> Self {
        match error {
            AdapterError::Evaluation(source) => source.into(),
            other => Self::input("INPUT.RESONANCE_RECORD", other.to_string()),
        }
    }
}

impl From<CompoundSystemError> for ReconstructionError {
    fn from(error: CompoundSystemError) -> Self {
        Self::input("INPUT.COMPOUND_SYSTEM", error.to_string())
    }
}

impl From<EvaluationError> for ReconstructionError {
    fn from(error: EvaluationError) -> Self {
        let code = match error {
            EvaluationError::Channel(_) => "RUN.CHANNEL_PHYSICS",
            EvaluationError::Matrix(_) => "RUN.TMATRIX_SOLVE",
        };
        Self::computation(code, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCategory, ReconstructionError};
    use crate::common::ConfigError;
    use crate::endf::RecordError;
    use crate::numerics::special::coulomb::CoulombError;
    use crate::numerics::special::SolveError;
    use crate::rmatrix::{ChannelError, EvaluationError};
    use std::path::PathBuf;

    #[test]
    fn categories_map_to_distinct_exit_codes() {
        let codes: Vec<i32> = [
            ErrorCategory::Input,
            ErrorCategory::Io,
            ErrorCategory::Computation,
        ]
        .into_iter()
        .map(ErrorCategory::exit_code)
        .collect();
        assert_eq!(codes, [2, 3, 4]);
    }

    #[test]
    fn diagnostics_carry_code_and_exit_status() {
        let error =
            ReconstructionError::input("INPUT.RESONANCE_RECORD", "no particle pair with MT = 2");

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.RESONANCE_RECORD] no particle pair with MT = 2"
        );
        assert_eq!(error.exit_line(), "FATAL EXIT CODE: 2");
        assert_eq!(
            error.to_string(),
            "input error [INPUT.RESONANCE_RECORD] no particle pair with MT = 2"
        );
    }

    #[test]
    fn library_errors_map_onto_categories() {
        let read = ConfigError::Read {
            path: PathBuf::from("config.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let mapped = ReconstructionError::from(read);
        assert_eq!(mapped.category(), ErrorCategory::Io);
        assert_eq!(mapped.code(), "IO.CONFIG_READ");

        let parse = serde_json::from_str::<serde_json::Value>("{").expect_err("malformed");
        let record = RecordError::Parse {
            path: PathBuf::from("record.json"),
            source: parse,
        };
        let mapped = ReconstructionError::from(record);
        assert_eq!(mapped.category(), ErrorCategory::Input);
        assert_eq!(mapped.code(), "INPUT.RESONANCE_RECORD_PARSE");

        let singular = EvaluationError::Matrix(SolveError::SingularMatrix { pivot_index: 0 });
        let mapped = ReconstructionError::from(singular);
        assert_eq!(mapped.category(), ErrorCategory::Computation);
        assert_eq!(mapped.code(), "RUN.TMATRIX_SOLVE");
        assert_eq!(mapped.exit_code(), 4);

        let budget = EvaluationError::Channel(ChannelError::Coulomb(
            CoulombError::IterationBudgetExceeded {
                stage: "closed-channel power series",
                iterations: 4,
                rho: 0.5,
            },
        ));
        assert_eq!(ReconstructionError::from(budget).code(), "RUN.CHANNEL_PHYSICS");
    }
}
