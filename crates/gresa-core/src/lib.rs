pub mod error;
pub mod evaluator;
pub mod families;
pub mod format;
pub mod precision;
pub mod registry;
pub mod time_value;
pub mod trace;
pub mod types;

pub use error::GresaError;
pub use evaluator::{evaluate, evaluate_with, evaluate_with_metadata, EvaluationResult};
pub use format::{FormatKind, Formatter, FormatterConfig};
pub use precision::{DerivedValue, PrecisionMode};
pub use registry::{Family, FormulaId, FormulaSpec, Variable};
pub use types::*;

/// Standard result type for all GRESA operations
pub type GresaResult<T> = Result<T, GresaError>;
