//! Prompted form fields. Every field shows its default, and an empty answer keeps it.
use crate::calculator::error::CalcError;
use crate::calculator::handlers::{
    BinomialExpander, Factorizer, Handler, QuadraticSolver, Simplifier, SystemSolver, expander,
    factorizer, quadratic, simplifier, system_solver,
};
use crate::calculator::operations::Operation;
use std::collections::VecDeque;

/// Something that answers prompts one line at a time.
/// `None` means the input ended (or was interrupted) and the form is abandoned.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Pre-recorded answers; records every prompt it was shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new(lines: &[&str]) -> Self {
        ScriptedLines {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front()
    }
}

fn answer(src: &mut dyn LineSource, prompt: &str, default: &str) -> Result<Option<String>, CalcError> {
    let line = src
        .read_line(&format!("{} [{}] ", prompt, default))
        .ok_or_else(|| CalcError::InvalidInput("input cancelled".to_string()))?;
    let line = line.trim();
    Ok(if line.is_empty() { None } else { Some(line.to_string()) })
}

pub fn number_field(src: &mut dyn LineSource, prompt: &str, default: f64) -> Result<f64, CalcError> {
    match answer(src, prompt, &default.to_string())? {
        None => Ok(default),
        Some(text) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CalcError::InvalidInput(format!("'{}' is not a number", text))),
        },
    }
}

pub fn text_field(src: &mut dyn LineSource, prompt: &str, default: &str) -> Result<String, CalcError> {
    Ok(answer(src, prompt, default)?.unwrap_or_else(|| default.to_string()))
}

pub fn choice_field(
    src: &mut dyn LineSource,
    prompt: &str,
    choices: &[usize],
    default: usize,
) -> Result<usize, CalcError> {
    let listed = choices.iter().map(|c| c.to_string()).collect::<Vec<_>>().join("/");
    match answer(src, &format!("{} ({})", prompt, listed), &default.to_string())? {
        None => Ok(default),
        Some(text) => text
            .parse::<usize>()
            .ok()
            .filter(|choice| choices.contains(choice))
            .ok_or_else(|| CalcError::InvalidInput(format!("choose one of {}, not '{}'", listed, text))),
    }
}

/// Fills in the form of `operation` and returns the handler ready to run.
pub fn collect(operation: Operation, src: &mut dyn LineSource, precision: usize) -> Result<Handler, CalcError> {
    let handler: Handler = match operation {
        Operation::Quadratic => {
            let [a, b, c] = quadratic::DEFAULT_COEFFICIENTS;
            let a = number_field(src, "Enter coefficient a:", a)?;
            let b = number_field(src, "Enter coefficient b:", b)?;
            let c = number_field(src, "Enter coefficient c:", c)?;
            QuadraticSolver::new(a, b, c).with_precision(precision).into()
        }
        Operation::Simplifier => {
            Simplifier::new(&text_field(src, "Enter expression to simplify:", simplifier::DEFAULT_EXPRESSION)?).into()
        }
        Operation::Factorizer => {
            Factorizer::new(&text_field(src, "Enter polynomial to factor:", factorizer::DEFAULT_POLYNOMIAL)?).into()
        }
        Operation::Expander => {
            BinomialExpander::new(&text_field(src, "Enter binomial to expand:", expander::DEFAULT_BINOMIAL)?).into()
        }
        Operation::SystemSolver => {
            let counts = system_solver::EQUATION_COUNTS;
            let n = choice_field(src, "Number of equations:", &counts, counts[0])?;
            let mut equations = Vec::with_capacity(n);
            for (i, default) in system_solver::default_equations(n).iter().enumerate() {
                equations.push(text_field(src, &format!("Equation {}:", i + 1), default)?);
            }
            SystemSolver::new(&equations).into()
        }
    };
    Ok(handler)
}
