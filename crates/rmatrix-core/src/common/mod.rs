pub mod config;
pub mod constants;

pub use config::{
    load_evaluation_config, BoundaryOption, ClosedChannelPolicy, ConfigError, CoulombConfig,
    EvaluationConfig, EvaluationOptions, Formalism, GridPolicy, RadiusOutOfRange,
};
