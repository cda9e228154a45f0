use crate::calculator::error::CalcError;
use crate::calculator::handlers::{OperationHandler, Outcome};
use crate::calculator::operations::Operation;
use crate::calculator::report::{Report, approximate};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_polynomial::Polynomial;
use crate::symbolic::symbolic_solve::solve_univariate;
use num::rational::BigRational;
use num::{Signed, ToPrimitive, Zero};

pub const DEFAULT_COEFFICIENTS: [f64; 3] = [1.0, 0.0, 0.0];
pub const DEFAULT_PRECISION: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticSolver {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// significant digits of the decimal approximations
    pub precision: usize,
}

fn exact(value: f64, name: &str) -> Result<BigRational, CalcError> {
    Expr::from_f64(value)
        .and_then(|e| e.as_rational().cloned())
        .ok_or_else(|| CalcError::InvalidInput(format!("coefficient {} must be a finite number", name)))
}

/// `x + shift`, with a negative shift written as a subtraction
fn shifted_var(shift: &BigRational) -> Expr {
    let x = Expr::var("x");
    if shift.is_zero() {
        x
    } else if shift.is_negative() {
        Expr::Sub(x.boxed(), Expr::Const(-shift).boxed())
    } else {
        Expr::Add(x.boxed(), Expr::Const(shift.clone()).boxed())
    }
}

fn plus_constant(expr: Expr, k: &BigRational) -> Expr {
    if k.is_zero() {
        expr
    } else if k.is_negative() {
        Expr::Sub(expr.boxed(), Expr::Const(-k).boxed())
    } else {
        Expr::Add(expr.boxed(), Expr::Const(k.clone()).boxed())
    }
}

/// two decimals, without a negative zero
fn fixed2(value: &BigRational) -> String {
    let text = format!("{:.2}", value.to_f64().unwrap_or(f64::NAN));
    if text == "-0.00" { "0.00".to_string() } else { text }
}

impl QuadraticSolver {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        QuadraticSolver {
            a,
            b,
            c,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl OperationHandler for QuadraticSolver {
    fn operation(&self) -> Operation {
        Operation::Quadratic
    }

    fn run(&self) -> Result<Outcome, CalcError> {
        if self.a == 0.0 {
            return Err(CalcError::InvalidCoefficient(
                "Coefficient 'a' cannot be zero for quadratic equations!".to_string(),
            ));
        }
        let (a, b, c) = (exact(self.a, "a")?, exact(self.b, "b")?, exact(self.c, "c")?);
        let equation = Polynomial::from_univariate("x", &[c.clone(), b.clone(), a.clone()]).to_expr();
        let roots = solve_univariate(&equation, "x")?;

        let two = BigRational::from_integer(2.into());
        let four = BigRational::from_integer(4.into());
        let discriminant = &b * &b - &four * &a * &c;
        let classification = if discriminant.is_positive() {
            "Two distinct real roots"
        } else if discriminant.is_zero() {
            "One real root (repeated)"
        } else {
            "Two complex roots"
        };
        let shift = &b / (&two * &a);
        let height = &c - &b * &b / (&four * &a);
        let vertex_form = plus_constant(
            Expr::scaled(&a, Expr::Pow(shifted_var(&shift).boxed(), Expr::integer(2).boxed())),
            &height,
        );
        let d = Expr::Const(discriminant);

        let mut report = Report::new();
        report
            .heading("Solutions")
            .text("Equation:")
            .math(
                &format!("{} = 0", equation.to_latex()),
                &format!("{} = 0", equation),
            )
            .text("Discriminant Analysis:")
            .math(
                &format!("D = b^2 - 4ac = {}", d.to_latex()),
                &format!("D = b**2 - 4*a*c = {}", d),
            )
            .text(classification);
        for (i, root) in roots.iter().enumerate() {
            report
                .math(
                    &format!("x_{{{}}} = {}", i + 1, root.to_latex()),
                    &format!("x_{} = {}", i + 1, root),
                )
                .caption(&format!(
                    "Decimal approximation: ≈ {}",
                    approximate(root.value(), self.precision)
                ));
        }
        report
            .heading("Graphical Analysis")
            .text("Vertex form:")
            .math(&vertex_form.to_latex(), &vertex_form.to_string())
            .text(&format!("Vertex at: ({}, {})", fixed2(&-shift), fixed2(&height)));

        let problem = format!("{} = 0", equation.to_latex());
        let solution = format!(
            "\\left[ {}\\right]",
            roots.iter().map(|r| r.to_latex()).collect::<Vec<_>>().join(", \\  ")
        );
        Ok(Outcome::new(self.operation(), report, &problem, &solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::report::Block;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn solve(a: f64, b: f64, c: f64) -> Outcome {
        QuadraticSolver::new(a, b, c).run().unwrap()
    }

    #[test]
    fn test_two_real_roots() {
        let outcome = solve(1.0, 0.0, -4.0);
        let report = &outcome.report;
        assert!(report.contains_text("Two distinct real roots"));
        assert!(report.latex_blocks().contains(&"x_{1} = -2"));
        assert!(report.latex_blocks().contains(&"x_{2} = 2"));
        assert!(report.latex_blocks().contains(&"D = b^2 - 4ac = 16"));
        assert!(report.contains_text("Decimal approximation: ≈ -2.0000"));
        assert_eq!(outcome.entry.problem, "x^{2} - 4 = 0");
        assert_eq!(outcome.entry.solution, "\\left[ -2, \\  2\\right]");
        assert_eq!(outcome.entry.operation, "Quadratic Solver");
    }

    #[test]
    fn test_repeated_root() {
        let outcome = solve(1.0, 2.0, 1.0);
        assert!(outcome.report.contains_text("One real root (repeated)"));
        assert!(outcome.report.latex_blocks().contains(&"x_{1} = -1"));
        assert!(!outcome.report.contains_text("x_2"));
        assert!(outcome.report.contains_text("Vertex at: (-1.00, 0.00)"));
        assert!(outcome.report.latex_blocks().contains(&"\\left(x + 1\\right)^{2}"));
    }

    #[test]
    fn test_complex_roots() {
        let outcome = solve(1.0, 0.0, 1.0);
        assert!(outcome.report.contains_text("Two complex roots"));
        let captions: Vec<&Block> = outcome
            .report
            .blocks()
            .iter()
            .filter(|b| matches!(b, Block::Caption(_)))
            .collect();
        assert_eq!(captions.len(), 2);
        assert!(outcome.report.contains_text("1.0000*I"));
        assert!(outcome.report.contains_text("Vertex at: (0.00, 1.00)"));
    }

    #[test]
    fn test_zero_leading_coefficient() {
        for (b, c) in [(0.0, 0.0), (1.0, 2.0), (-3.5, 0.25)] {
            let err = QuadraticSolver::new(0.0, b, c).run().unwrap_err();
            assert!(matches!(err, CalcError::InvalidCoefficient(_)));
            assert_eq!(
                err.to_string(),
                "Coefficient 'a' cannot be zero for quadratic equations!"
            );
        }
    }

    #[test]
    fn test_roots_satisfy_equation() {
        let values = [-3.0, -1.5, -0.1, 0.0, 0.5, 2.0, 7.0];
        for &a in &[1.0, -2.0, 0.5, 3.0] {
            for &b in &values {
                for &c in &values {
                    let equation =
                        Polynomial::from_univariate("x", &[exact(c, "c").unwrap(), exact(b, "b").unwrap(), exact(a, "a").unwrap()])
                            .to_expr();
                    let roots = solve_univariate(&equation, "x").unwrap();
                    assert!(!roots.is_empty() && roots.len() <= 2);
                    for root in roots {
                        let x = root.value();
                        let residual = Complex64::new(a, 0.0) * x * x + Complex64::new(b, 0.0) * x + c;
                        assert_relative_eq!(residual.norm(), 0.0, epsilon = 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_decimal_coefficients_are_exact() {
        let outcome = solve(0.5, -0.1, 0.0);
        assert!(outcome.report.latex_blocks().contains(&"x_{1} = 0"));
        assert!(outcome.report.latex_blocks().contains(&"x_{2} = \\frac{1}{5}"));
        let outcome = QuadraticSolver::new(1.0, 0.0, -2.0).with_precision(3).run().unwrap();
        assert!(outcome.report.contains_text("≈ -1.41"));
    }
}
