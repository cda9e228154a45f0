use crate::calculator::error::CalcError;
use crate::calculator::handlers::{OperationHandler, Outcome, parse_input};
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;

pub const DEFAULT_EXPRESSION: &str = "(x + 1)**2 - (x - 1)**2";
/// inputs printing longer than this also get the intermediate steps
const STEPS_THRESHOLD: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Simplifier {
    pub input: String,
}

impl Simplifier {
    pub fn new(input: &str) -> Self {
        Simplifier {
            input: input.to_string(),
        }
    }
}

impl OperationHandler for Simplifier {
    fn operation(&self) -> Operation {
        Operation::Simplifier
    }

    fn run(&self) -> Result<Outcome, CalcError> {
        let expr = parse_input(&self.input)?;
        let simplified = expr.simplify_()?;
        let show_steps = expr.to_string().chars().count() > STEPS_THRESHOLD;
        let expanded = if show_steps { Some(expr.expand()?) } else { None };

        let mut report = Report::new();
        report.heading("Simplified Result").math(
            &format!("{} \\Rightarrow {}", expr.to_latex(), simplified.to_latex()),
            &format!("{} => {}", expr, simplified),
        );
        if let Some(expanded) = expanded {
            report
                .heading("Simplification Steps")
                .text("1. Expand all terms:")
                .math(
                    &format!("{} = {}", expr.to_latex(), expanded.to_latex()),
                    &format!("{} = {}", expr, expanded),
                )
                .text("2. Combine like terms:")
                .math(
                    &format!("{} = {}", expanded.to_latex(), simplified.to_latex()),
                    &format!("{} = {}", expanded, simplified),
                );
        }
        Ok(Outcome::new(
            self.operation(),
            report,
            &expr.to_latex(),
            &simplified.to_latex(),
        ))
    }
}
