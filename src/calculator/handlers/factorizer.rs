use crate::calculator::error::CalcError;
use crate::calculator::handlers::{OperationHandler, Outcome, parse_input};
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;
use crate::symbolic::symbolic_rational::SymbolicError;
use crate::symbolic::symbolic_solve::solve_univariate;
use log::debug;

pub const DEFAULT_POLYNOMIAL: &str = "x**3 - 2*x**2 - 5*x + 6";

#[derive(Debug, Clone, PartialEq)]
pub struct Factorizer {
    pub input: String,
}

impl Factorizer {
    pub fn new(input: &str) -> Self {
        Factorizer {
            input: input.to_string(),
        }
    }
}

impl OperationHandler for Factorizer {
    fn operation(&self) -> Operation {
        Operation::Factorizer
    }

    fn run(&self) -> Result<Outcome, CalcError> {
        let poly = parse_input(&self.input)?;
        let factored = poly.factor()?;
        let roots = match solve_univariate(&poly, "x") {
            Ok(roots) => roots,
            Err(SymbolicError::Unsupported(reason)) => {
                debug!("no roots listed: {}", reason);
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        let mut report = Report::new();
        report.heading("Factored Form").math(
            &format!("{} = {}", poly.to_latex(), factored.to_latex()),
            &format!("{} = {}", poly, factored),
        );
        if !roots.is_empty() {
            report.heading("Roots");
            for (i, root) in roots.iter().enumerate() {
                report.math(
                    &format!("x_{{{}}} = {}", i + 1, root.to_latex()),
                    &format!("x_{} = {}", i + 1, root),
                );
            }
        }
        Ok(Outcome::new(
            self.operation(),
            report,
            &poly.to_latex(),
            &factored.to_latex(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polynomial() {
        let outcome = Factorizer::new(DEFAULT_POLYNOMIAL).run().unwrap();
        assert_eq!(
            outcome.entry.solution,
            "\\left(x - 3\\right) \\left(x - 1\\right) \\left(x + 2\\right)"
        );
        assert_eq!(outcome.entry.problem, "x^{3} - 2 x^{2} - 5 x + 6");
        let latex = outcome.report.latex_blocks();
        assert_eq!(&latex[1..], ["x_{1} = -2", "x_{2} = 1", "x_{3} = 3"]);
    }

    #[test]
    fn test_not_polynomial_in_x_skips_roots() {
        let outcome = Factorizer::new("x*y + x").run().unwrap();
        assert_eq!(outcome.entry.solution, "x \\left(y + 1\\right)");
        assert!(!outcome.report.contains_text("Roots"));

        let outcome = Factorizer::new("sin(x)**2 - 1").run().unwrap();
        assert!(!outcome.report.contains_text("Roots"));
    }

    #[test]
    fn test_irreducible_keeps_roots() {
        let outcome = Factorizer::new("x**2 + 1").run().unwrap();
        assert_eq!(outcome.entry.solution, "x^{2} + 1");
        assert!(outcome.report.latex_blocks().contains(&"x_{2} = i"));
    }

    #[test]
    fn test_quartic_splits_into_quadratics() {
        let outcome = Factorizer::new("x**4 - 4").run().unwrap();
        assert_eq!(
            outcome.entry.solution,
            "\\left(x^{2} - 2\\right) \\left(x^{2} + 2\\right)"
        );
        let latex = outcome.report.latex_blocks();
        assert_eq!(latex.len(), 5);
        assert!(latex.contains(&"x_{1} = - \\sqrt{2}"));
        assert!(latex[1..].iter().all(|root| !root.contains("0.")));
    }

    #[test]
    fn test_roots_with_radical_and_imaginary_coefficients() {
        let outcome = Factorizer::new("sqrt(2)*x - 1").run().unwrap();
        assert_eq!(outcome.entry.solution, "\\sqrt{2} x - 1");
        assert_eq!(outcome.report.latex_blocks()[1], "x_{1} = \\frac{\\sqrt{2}}{2}");

        let outcome = Factorizer::new("I*x - 1").run().unwrap();
        assert_eq!(outcome.report.latex_blocks()[1], "x_{1} = - i");
    }

    #[test]
    fn test_constant_has_no_roots() {
        let outcome = Factorizer::new("6").run().unwrap();
        assert_eq!(outcome.entry.solution, "6");
        assert_eq!(outcome.report.latex_blocks().len(), 1);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Factorizer::new("x**").run(),
            Err(CalcError::Parse { .. })
        ));
    }
}
