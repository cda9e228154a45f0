//! The five operation handlers. Every handler is pure: it takes its collected input and
//! returns the report to display together with the history entry to record, or an error.
use crate::calculator::error::CalcError;
use crate::calculator::history::HistoryEntry;
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;
use crate::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;

/// quadratic equations `a x^2 + b x + c = 0` with discriminant analysis and vertex form
pub mod quadratic;
/// simplification with optional intermediate steps
pub mod simplifier;
/// factoring with the roots of the polynomial
pub mod factorizer;
/// expansion of powers, with the binomial theorem for `(a + b)^n`
pub mod expander;
/// linear systems of 2 or 3 equations in x, y, z
pub mod system_solver;

pub use expander::BinomialExpander;
pub use factorizer::Factorizer;
pub use quadratic::QuadraticSolver;
pub use simplifier::Simplifier;
pub use system_solver::SystemSolver;

/// Result of a successful operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub report: Report,
    pub entry: HistoryEntry,
}

impl Outcome {
    pub fn new(operation: Operation, report: Report, problem: &str, solution: &str) -> Self {
        Outcome {
            report,
            entry: HistoryEntry::new(operation.history_name(), problem, solution),
        }
    }
}

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    Quadratic(QuadraticSolver),
    Simplify(Simplifier),
    Factor(Factorizer),
    Expand(BinomialExpander),
    System(SystemSolver),
}

#[enum_dispatch(Handler)]
pub trait OperationHandler {
    fn operation(&self) -> Operation;
    fn run(&self) -> Result<Outcome, CalcError>;
    /// extra advice shown under an error message
    fn error_hint(&self, _err: &CalcError) -> Option<&'static str> {
        None
    }
}

pub(crate) fn parse_input(input: &str) -> Result<Expr, CalcError> {
    Expr::parse_expression(input).map_err(|e| CalcError::parse(input, e))
}
