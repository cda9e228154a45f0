use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_rational::SymbolicError;
use std::fmt;

/// Everything that can go wrong while running one operation.
/// All variants are recoverable: the session reports them and carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// zero leading coefficient of a quadratic
    InvalidCoefficient(String),
    /// text that is not a well-formed expression
    Parse { input: String, message: String },
    /// an equation without exactly one '=' sign
    Format(String),
    /// the system of equations has no solution
    NoSolution,
    /// input the symbolic engine cannot handle
    Unsupported(String),
    /// a field value of the wrong kind, e.g. text in a numeric field
    InvalidInput(String),
}

impl CalcError {
    pub fn parse(input: &str, err: ParseError) -> Self {
        CalcError::Parse {
            input: input.trim().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::InvalidCoefficient(msg) => write!(f, "{}", msg),
            CalcError::Parse { input, message } => {
                write!(f, "Error: cannot parse '{}': {}", input, message)
            }
            CalcError::Format(msg) => write!(f, "{}", msg),
            CalcError::NoSolution => write!(f, "No solution exists (system may be inconsistent)"),
            CalcError::Unsupported(msg) => write!(f, "Error: {}", msg),
            CalcError::InvalidInput(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CalcError {}

impl From<SymbolicError> for CalcError {
    fn from(err: SymbolicError) -> Self {
        CalcError::Unsupported(err.to_string())
    }
}
