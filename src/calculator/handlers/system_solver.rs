use crate::calculator::error::CalcError;
use crate::calculator::handlers::{OperationHandler, Outcome, parse_input};
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;
use crate::symbolic::symbolic_solve::{Equation, solve_linear_system};

pub const EQUATION_COUNTS: [usize; 2] = [2, 3];
const VARIABLES: [&str; 3] = ["x", "y", "z"];
const HINT: &str = "Ensure equations are properly formatted and consistent";

/// Prefilled equations for a system of `n` equations.
pub fn default_equations(n: usize) -> Vec<String> {
    let equations: &[&str] = if n <= 2 {
        &["x + y = 2", "2x - y = 1"]
    } else {
        &["x + y + z = 6", "2x - y + 3z = 14", "-x + 2y - z = -3"]
    };
    equations.iter().map(|e| e.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemSolver {
    pub equations: Vec<String>,
}

impl SystemSolver {
    pub fn new(equations: &[String]) -> Self {
        SystemSolver {
            equations: equations.to_vec(),
        }
    }

    /// The unknowns: the first `n + 1` of x, y, z.
    fn variables(&self) -> &'static [&'static str] {
        &VARIABLES[..(self.equations.len() + 1).min(VARIABLES.len())]
    }
}

fn split_equation(text: &str) -> Result<(&str, &str), CalcError> {
    match text.matches('=').count() {
        0 => Err(CalcError::Format("Equations must contain '=' sign".to_string())),
        1 => text
            .split_once('=')
            .ok_or_else(|| CalcError::Format("Equations must contain '=' sign".to_string())),
        _ => Err(CalcError::Format(format!(
            "Equation '{}' must contain exactly one '=' sign",
            text.trim()
        ))),
    }
}

impl OperationHandler for SystemSolver {
    fn operation(&self) -> Operation {
        Operation::SystemSolver
    }

    fn run(&self) -> Result<Outcome, CalcError> {
        if self.equations.is_empty() {
            return Err(CalcError::InvalidInput("no equations given".to_string()));
        }
        let sides = self
            .equations
            .iter()
            .map(|text| split_equation(text))
            .collect::<Result<Vec<_>, _>>()?;
        let equations = sides
            .into_iter()
            .map(|(lhs, rhs)| Ok(Equation::new(parse_input(lhs)?, parse_input(rhs)?)))
            .collect::<Result<Vec<_>, CalcError>>()?;
        let solution = solve_linear_system(&equations, self.variables())?.ok_or(CalcError::NoSolution)?;

        let mut report = Report::new();
        report.success("Solution Found!");
        for (var, value) in &solution {
            report.math(
                &format!("{} = {}", var, value.to_latex()),
                &format!("{} = {}", var, value),
            );
        }
        let problem = format!(
            "\\begin{{cases}}{}\\end{{cases}}",
            equations.iter().map(|e| e.to_latex()).collect::<Vec<_>>().join("\\\\")
        );
        let solved = solution
            .iter()
            .map(|(var, value)| format!("{}={}", var, value.to_latex()))
            .collect::<Vec<_>>()
            .join("\\\\");
        Ok(Outcome::new(self.operation(), report, &problem, &solved))
    }

    fn error_hint(&self, err: &CalcError) -> Option<&'static str> {
        match err {
            CalcError::Parse { .. } | CalcError::Unsupported(_) | CalcError::InvalidInput(_) => Some(HINT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(lines: &[&str]) -> SystemSolver {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        SystemSolver::new(&lines)
    }

    #[test]
    fn test_two_equations() {
        let outcome = SystemSolver::new(&default_equations(2)).run().unwrap();
        assert!(outcome.report.contains_text("Solution Found!"));
        assert_eq!(outcome.report.latex_blocks(), vec!["x = 1", "y = 1"]);
        assert_eq!(
            outcome.entry.problem,
            "\\begin{cases}x + y = 2\\\\2 x - y = 1\\end{cases}"
        );
        assert_eq!(outcome.entry.solution, "x=1\\\\y=1");
    }

    #[test]
    fn test_three_equations() {
        let outcome = SystemSolver::new(&default_equations(3)).run().unwrap();
        assert_eq!(outcome.report.latex_blocks(), vec!["x = 0", "y = 1", "z = 5"]);
    }

    #[test]
    fn test_decimal_coefficients() {
        let outcome = system(&["y*0.5=1", "x = 1"]).run().unwrap();
        assert_eq!(outcome.report.latex_blocks(), vec!["x = 1", "y = 2"]);
        let outcome = system(&["x + y = 2.5", "x - y = 0.5"]).run().unwrap();
        assert_eq!(outcome.report.latex_blocks(), vec!["x = \\frac{3}{2}", "y = 1"]);
    }

    #[test]
    fn test_variables_window() {
        assert_eq!(system(&["x = 1", "y = 2"]).variables(), ["x", "y", "z"]);
        assert_eq!(system(&["x = 1"]).variables(), ["x", "y"]);
        assert_eq!(system(&["x = 1", "y = 2", "z = 3"]).variables(), ["x", "y", "z"]);
    }

    #[test]
    fn test_inconsistent_system() {
        let err = system(&["x + y = 1", "x + y = 2"]).run().unwrap_err();
        assert_eq!(err, CalcError::NoSolution);
        assert_eq!(system(&["x + y = 1"]).error_hint(&err), None);
    }

    #[test]
    fn test_free_variable() {
        let outcome = system(&["x + y = 2", "2x + 2y = 4"]).run().unwrap();
        assert_eq!(outcome.report.latex_blocks(), vec!["x = - y + 2"]);
    }

    #[test]
    fn test_missing_equal_sign() {
        for lines in [["x + y", "x - y = 0"], ["x + y = 2", "x - y"], ["x + (", "x - y"]] {
            let err = system(&lines).run().unwrap_err();
            assert_eq!(err, CalcError::Format("Equations must contain '=' sign".to_string()));
            assert_eq!(system(&lines).error_hint(&err), None);
        }
        let err = system(&["x = y = 1", "x - y = 0"]).run().unwrap_err();
        assert!(matches!(err, CalcError::Format(_)));
    }

    #[test]
    fn test_unsupported_systems_get_hint() {
        let solver = system(&["x*y = 2", "x - y = 1"]);
        let err = solver.run().unwrap_err();
        assert!(matches!(err, CalcError::Unsupported(_)));
        assert_eq!(solver.error_hint(&err), Some(HINT));

        let solver = system(&["x + w = 2", "x - y = 1"]);
        let err = solver.run().unwrap_err();
        assert!(err.to_string().contains("unknown variable w"));

        let solver = system(&["x + = 2", "x - y = 1"]);
        let err = solver.run().unwrap_err();
        assert!(matches!(err, CalcError::Parse { .. }));
        assert_eq!(solver.error_hint(&err), Some(HINT));
    }
}
