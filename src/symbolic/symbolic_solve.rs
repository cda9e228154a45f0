//! # Equation Solving
//!
//! - `solve_univariate`: roots of a polynomial (or rational) equation in one variable.
//!   Rational roots and roots of quadratic factors are exact; factors of degree three and
//!   higher without rational roots are solved numerically (Durand-Kerner iteration).
//! - `solve_linear_system`: exact Gauss-Jordan elimination over the rationals.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_factor::factor_univariate;
use crate::symbolic::symbolic_polynomial::{Generator, Monomial, Polynomial, uni_eval};
use crate::symbolic::symbolic_rational::{RationalFunction, SymbolicError, sqrt_of_rational};
use log::debug;
use num::rational::BigRational;
use num::{ToPrimitive, Zero};
use num_complex::Complex64;
use std::cmp::Ordering;
use std::fmt;

/// An equality between two expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `lhs - rhs`, which vanishes exactly at the solutions.
    pub fn residual(&self) -> Expr {
        Expr::Sub(self.lhs.clone().boxed(), self.rhs.clone().boxed())
    }

    pub fn to_latex(&self) -> String {
        format!("{} = {}", self.lhs.to_latex(), self.rhs.to_latex())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// A root of a univariate equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Exact { expr: Expr, value: Complex64 },
    Approximate(Complex64),
}

/// Significant digits shown for numerically found roots.
pub const ROOT_DIGITS: usize = 10;

/// Formats a real number with `digits` significant digits, trailing zeros kept (`2.0000`).
pub fn significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }
    // rounding through scientific notation fixes the decimal exponent after carry (9.99999 -> 1.0000e1)
    let scientific = format!("{:.*e}", digits - 1, value);
    let exponent: i32 = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exponent < -4 || exponent >= digits as i32 + 6 {
        return scientific;
    }
    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, value)
}

/// Decimal form of a possibly complex value. Parts below `1e-12` of the other part are
/// round-off and dropped, so `-0.5 + 0.86603*I` or `1.4142*I` with `imaginary = "*I"`.
pub fn format_complex(value: Complex64, digits: usize, imaginary: &str) -> String {
    let scale = value.re.abs().max(1.0);
    if value.im.abs() <= 1e-12 * scale {
        return significant(value.re, digits);
    }
    let magnitude = significant(value.im.abs(), digits);
    if value.re.abs() <= 1e-12 * value.im.abs() {
        let sign = if value.im < 0.0 { "-" } else { "" };
        return format!("{}{}{}", sign, magnitude, imaginary);
    }
    let sign = if value.im < 0.0 { "-" } else { "+" };
    format!("{} {} {}{}", significant(value.re, digits), sign, magnitude, imaginary)
}

impl Root {
    fn exact(expr: Expr) -> Result<Root, SymbolicError> {
        let value = expr.eval_constant().map_err(SymbolicError::Unsupported)?;
        Ok(Root::Exact { expr, value })
    }

    pub fn value(&self) -> Complex64 {
        match self {
            Root::Exact { value, .. } => *value,
            Root::Approximate(value) => *value,
        }
    }

    pub fn is_real(&self) -> bool {
        self.value().im == 0.0
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Root::Exact { .. })
    }

    pub fn to_latex(&self) -> String {
        match self {
            Root::Exact { expr, .. } => expr.to_latex(),
            Root::Approximate(value) => format_complex(*value, ROOT_DIGITS, " i"),
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Root::Exact { expr, .. } => write!(f, "{}", expr),
            Root::Approximate(value) => write!(f, "{}", format_complex(*value, ROOT_DIGITS, "*I")),
        }
    }
}

/// Real roots ascending, then complex roots by real and imaginary part.
fn root_order(a: &Root, b: &Root) -> Ordering {
    let (va, vb) = (a.value(), b.value());
    b.is_real()
        .cmp(&a.is_real())
        .then(va.re.total_cmp(&vb.re))
        .then(va.im.total_cmp(&vb.im))
}

/// `real + radical` with the radical's sign folded into the operator.
fn shifted(real: &BigRational, radical: &Polynomial) -> Expr {
    let radical = radical.to_expr();
    if real.is_zero() {
        return radical;
    }
    match radical.negated() {
        Some(pos) => Expr::Sub(Expr::Const(real.clone()).boxed(), pos.boxed()),
        None => Expr::Add(Expr::Const(real.clone()).boxed(), radical.boxed()),
    }
}

/// Exact roots of a monic quadratic `x^2 + b x + c`.
fn quadratic_roots(coeffs: &[BigRational]) -> Result<Vec<Root>, SymbolicError> {
    let (c, b) = (&coeffs[0], &coeffs[1]);
    let two = BigRational::from_integer(2.into());
    let real = -b / &two;
    let radical = sqrt_of_rational(&(&real * &real - c));
    Ok(vec![
        Root::exact(shifted(&real, &radical.neg()))?,
        Root::exact(shifted(&real, &radical))?,
    ])
}

fn horner(coeffs: &[Complex64], z: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + c)
}

/// Simultaneous approximation of all roots of a square-free polynomial.
pub fn durand_kerner(coeffs: &[BigRational]) -> Vec<Complex64> {
    let lead = coeffs
        .last()
        .and_then(|c| c.to_f64())
        .unwrap_or(1.0);
    let monic: Vec<Complex64> = coeffs
        .iter()
        .map(|c| Complex64::new(c.to_f64().unwrap_or(0.0) / lead, 0.0))
        .collect();
    let n = monic.len().saturating_sub(1);
    let seed = Complex64::new(0.4, 0.9);
    let mut z: Vec<Complex64> = (0..n).map(|k| seed.powu(k as u32)).collect();
    for iteration in 0..2000 {
        let mut largest_step: f64 = 0.0;
        for i in 0..n {
            let zi = z[i];
            let denominator = (0..n)
                .filter(|j| *j != i)
                .fold(Complex64::new(1.0, 0.0), |acc, j| acc * (zi - z[j]));
            if denominator.norm() == 0.0 {
                z[i] = zi + Complex64::new(1e-8, 1e-8);
                largest_step = f64::INFINITY;
                continue;
            }
            let step = horner(&monic, zi) / denominator;
            z[i] = zi - step;
            largest_step = largest_step.max(step.norm());
        }
        if largest_step < 1e-15 {
            debug!("Durand-Kerner converged after {} iterations", iteration + 1);
            break;
        }
    }
    z.into_iter()
        .map(|r| {
            if r.im.abs() < 1e-10 * (1.0 + r.re.abs()) {
                Complex64::new(r.re, 0.0)
            } else {
                r
            }
        })
        .collect()
}

/// `sqrt(2)`, `I` and other atoms free of variables.
fn is_constant_atom(g: &Generator) -> bool {
    matches!(g, Generator::Atom(expr) if expr.extract_variables().is_empty())
}

/// Root of `c1 * var + c0` where `c1` and `c0` are built from constant atoms only.
fn linear_root_with_atoms(p: &Polynomial, var: &str) -> Result<Option<Root>, SymbolicError> {
    let g = Generator::Var(var.to_string());
    if p.degree_in(&g) != 1 || !p.generators().iter().all(|other| *other == g || is_constant_atom(other)) {
        return Ok(None);
    }
    let (mut c1, mut c0) = (Polynomial::zero(), Polynomial::zero());
    for (mono, c) in p.terms() {
        let mut rest = mono.clone();
        let term = |m: Monomial| Polynomial::monomial(m).scale(c);
        if rest.remove(&g).is_some() {
            c1 = c1.add(&term(rest));
        } else {
            c0 = c0.add(&term(rest));
        }
    }
    let root = Expr::Div(c0.neg().to_expr().boxed(), c1.to_expr().boxed()).simplify_()?;
    Ok(Some(Root::exact(root)?))
}

/// Solves `expr = 0` for `var`. Every other symbol makes the equation unsupported.
/// Roots are distinct; values that zero a denominator are excluded.
pub fn solve_univariate(expr: &Expr, var: &str) -> Result<Vec<Root>, SymbolicError> {
    let canon = |e: &Expr| e.simplify_();
    let rf = RationalFunction::from_expr(expr, &canon)?.cancel();
    let not_polynomial =
        || SymbolicError::Unsupported(format!("{} = 0 is not a polynomial equation in {}", expr, var));
    let (Some(num), Some(den)) = (rf.num.univariate_coeffs(var), rf.den.univariate_coeffs(var)) else {
        if rf.den.generators().iter().all(is_constant_atom) {
            if let Some(root) = linear_root_with_atoms(&rf.num, var)? {
                return Ok(vec![root]);
            }
        }
        return Err(not_polynomial());
    };

    let mut roots = Vec::new();
    for (factor, _) in factor_univariate(&num) {
        match factor.len() - 1 {
            1 => roots.push(Root::exact(Expr::Const(-factor[0].clone()))?),
            2 => roots.extend(quadratic_roots(&factor)?),
            _ => roots.extend(durand_kerner(&factor).into_iter().map(Root::Approximate)),
        }
    }
    roots.retain(|root| match root {
        Root::Exact {
            expr: Expr::Const(r),
            ..
        } => !uni_eval(&den, r).is_zero(),
        _ => true,
    });
    roots.sort_by(root_order);
    debug!("roots of {} = 0 in {}: {} found", expr, var, roots.len());
    Ok(roots)
}

fn linear_monomial(var: &str) -> Monomial {
    let mut mono = Monomial::new();
    mono.insert(Generator::Var(var.to_string()), 1);
    mono
}

/// Solves a system of linear equations in `vars` exactly.
///
/// Returns `Ok(None)` for an inconsistent system or when no variable can be determined.
/// Otherwise every determined variable is paired with its value; free variables appear only
/// inside the values of the others.
pub fn solve_linear_system(
    equations: &[Equation],
    vars: &[&str],
) -> Result<Option<Vec<(String, Expr)>>, SymbolicError> {
    let n = vars.len();
    let mut rows: Vec<Vec<BigRational>> = Vec::with_capacity(equations.len());
    for equation in equations {
        let not_linear = || SymbolicError::Unsupported(format!("equation {} is not linear", equation));
        let p = equation.residual().to_polynomial().map_err(|e| match e {
            SymbolicError::NotPolynomial(_) => not_linear(),
            other => other,
        })?;
        for g in p.generators() {
            match g {
                Generator::Var(name) if vars.contains(&name.as_str()) => {}
                Generator::Var(name) => {
                    return Err(SymbolicError::Unsupported(format!(
                        "unknown variable {} in equation {}",
                        name, equation
                    )));
                }
                Generator::Atom(_) => return Err(not_linear()),
            }
        }
        if p.total_degree() > 1 {
            return Err(not_linear());
        }
        let mut row: Vec<BigRational> = vars
            .iter()
            .map(|v| p.coefficient_of(&linear_monomial(v)))
            .collect();
        row.push(-p.coefficient_of(&Monomial::new()));
        rows.push(row);
    }

    // Gauss-Jordan elimination
    let mut pivots: Vec<usize> = Vec::new();
    let mut rank = 0;
    for col in 0..n {
        let Some(found) = (rank..rows.len()).find(|i| !rows[*i][col].is_zero()) else {
            continue;
        };
        rows.swap(rank, found);
        let pivot = rows[rank][col].clone();
        for entry in rows[rank].iter_mut() {
            *entry = entry.clone() / pivot.clone();
        }
        for i in 0..rows.len() {
            if i == rank || rows[i][col].is_zero() {
                continue;
            }
            let factor = rows[i][col].clone();
            for j in 0..=n {
                let t = &factor * &rows[rank][j];
                rows[i][j] -= t;
            }
        }
        pivots.push(col);
        rank += 1;
    }
    if rows[rank..].iter().any(|row| !row[n].is_zero()) {
        debug!("linear system is inconsistent");
        return Ok(None);
    }
    if pivots.is_empty() {
        return Ok(None);
    }

    let solution = pivots
        .iter()
        .enumerate()
        .map(|(row, col)| {
            let mut value = Polynomial::constant(rows[row][n].clone());
            for (j, var) in vars.iter().enumerate() {
                if !pivots.contains(&j) && !rows[row][j].is_zero() {
                    value = value.sub(&Polynomial::variable(var).scale(&rows[row][j]));
                }
            }
            (vars[*col].to_string(), value.to_expr())
        })
        .collect();
    Ok(Some(solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn equation(text: &str) -> Equation {
        let (lhs, rhs) = text.split_once('=').unwrap();
        Equation::new(
            Expr::parse_expression(lhs).unwrap(),
            Expr::parse_expression(rhs).unwrap(),
        )
    }

    fn roots_of(input: &str) -> Vec<String> {
        let expr = Expr::parse_expression(input).unwrap();
        solve_univariate(&expr, "x")
            .unwrap()
            .iter()
            .map(|r| r.to_string())
            .collect()
    }

    #[test]
    fn test_rational_roots() {
        assert_eq!(roots_of("x**2 - 4"), vec!["-2", "2"]);
        assert_eq!(roots_of("x**3 - 2*x**2 - 5*x + 6"), vec!["-2", "1", "3"]);
        assert_eq!(roots_of("x**2 + 2*x + 1"), vec!["-1"]);
        assert_eq!(roots_of("2*x - 1"), vec!["1/2"]);
    }

    #[test]
    fn test_radical_and_complex_roots() {
        assert_eq!(roots_of("x**2 - 2"), vec!["-sqrt(2)", "sqrt(2)"]);
        assert_eq!(roots_of("x**2 - 2*x - 1"), vec!["1 - sqrt(2)", "1 + sqrt(2)"]);
        assert_eq!(roots_of("x**2 + 1"), vec!["-I", "I"]);
        assert_eq!(
            roots_of("x**2 + x + 1"),
            vec!["-1/2 - sqrt(3)*I/2", "-1/2 + sqrt(3)*I/2"]
        );
    }

    #[test]
    fn test_roots_satisfy_equation() {
        let expr = Expr::parse_expression("3*x**2 + 0.5*x - 7").unwrap();
        for root in solve_univariate(&expr, "x").unwrap() {
            let mut values = HashMap::new();
            values.insert("x".to_string(), root.value());
            let residual = expr.eval_complex(&values).unwrap();
            assert_relative_eq!(residual.norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_numeric_roots() {
        // x^3 - x - 1 has one real root (the plastic number) and two complex ones
        let expr = Expr::parse_expression("x**3 - x - 1").unwrap();
        let roots = solve_univariate(&expr, "x").unwrap();
        assert_eq!(roots.len(), 3);
        assert!(roots[0].is_real());
        assert!(!roots[0].is_exact());
        assert_relative_eq!(roots[0].value().re, 1.324717957244746, epsilon = 1e-10);
        assert!(!roots[1].is_real());
    }

    #[test]
    fn test_numeric_roots_carry_no_round_off() {
        // x^5 - x - 1 has no rational roots and no quadratic factor
        let expr = Expr::parse_expression("x**5 - x - 1").unwrap();
        let roots = solve_univariate(&expr, "x").unwrap();
        assert_eq!(roots.len(), 5);
        for root in &roots {
            assert!(!root.is_exact());
            for text in [root.to_string(), root.to_latex()] {
                assert!(!text.contains("e-"), "residual part in {}", text);
                let longest = text
                    .split(|c: char| !c.is_ascii_digit() && c != '.')
                    .map(|part| part.chars().filter(|c| c.is_ascii_digit()).count())
                    .max()
                    .unwrap_or(0);
                assert!(longest <= ROOT_DIGITS + 2, "too many digits in {}", text);
            }
        }
        assert_eq!(roots[0].to_string(), "1.167303978");
        assert!(roots[1..].iter().all(|r| r.to_string().ends_with("*I")));
    }

    #[test]
    fn test_format_complex() {
        assert_eq!(format_complex(Complex64::new(2.7e-48, -2f64.sqrt()), 5, " i"), "-1.4142 i");
        assert_eq!(format_complex(Complex64::new(1.5, 1e-20), 5, "*I"), "1.5000");
        assert_eq!(format_complex(Complex64::new(-0.5, 0.25), 3, "*I"), "-0.500 + 0.250*I");
        assert_eq!(significant(0.00001234, 3), "1.23e-5");
    }

    #[test]
    fn test_quartic_with_quadratic_factors_has_exact_roots() {
        assert_eq!(
            roots_of("x**4 - 4"),
            vec!["-sqrt(2)", "sqrt(2)", "-sqrt(2)*I", "sqrt(2)*I"]
        );
    }

    #[test]
    fn test_denominator_roots_are_excluded() {
        assert_eq!(roots_of("(x**2 - 1)/(x - 1)"), vec!["-1"]);
        assert!(roots_of("1/x").is_empty());
    }

    #[test]
    fn test_linear_roots_with_radical_and_imaginary_coefficients() {
        assert_eq!(roots_of("sqrt(2)*x - 1"), vec!["sqrt(2)/2"]);
        assert_eq!(roots_of("I*x - 1"), vec!["-I"]);
        let expr = Expr::parse_expression("sqrt(2)*x**2 - 1").unwrap();
        assert!(matches!(
            solve_univariate(&expr, "x"),
            Err(SymbolicError::Unsupported(_))
        ));
    }

    #[test]
    fn test_other_symbols_are_unsupported() {
        let expr = Expr::parse_expression("x*y - 1").unwrap();
        assert!(matches!(
            solve_univariate(&expr, "x"),
            Err(SymbolicError::Unsupported(_))
        ));
    }

    #[test]
    fn test_linear_system_two_equations() {
        let eqs = vec![equation("x + y = 2"), equation("2x - y = 1")];
        let solution = solve_linear_system(&eqs, &["x", "y", "z"]).unwrap().unwrap();
        let rendered: Vec<String> = solution
            .iter()
            .map(|(v, e)| format!("{}={}", v, e))
            .collect();
        assert_eq!(rendered, vec!["x=1", "y=1"]);
    }

    #[test]
    fn test_linear_system_three_equations() {
        let eqs = vec![
            equation("x + y + z = 6"),
            equation("2x - y + 3z = 14"),
            equation("-x + 2y - z = -3"),
        ];
        let solution = solve_linear_system(&eqs, &["x", "y", "z"]).unwrap().unwrap();
        let rendered: Vec<String> = solution
            .iter()
            .map(|(v, e)| format!("{}={}", v, e))
            .collect();
        assert_eq!(rendered, vec!["x=0", "y=1", "z=5"]);
    }

    #[test]
    fn test_linear_system_inconsistent() {
        let eqs = vec![equation("x + y = 1"), equation("x + y = 2")];
        assert_eq!(solve_linear_system(&eqs, &["x", "y", "z"]).unwrap(), None);
        let eqs = vec![equation("0 = 0"), equation("x - x = 0")];
        assert_eq!(solve_linear_system(&eqs, &["x", "y"]).unwrap(), None);
    }

    #[test]
    fn test_linear_system_free_variable() {
        let eqs = vec![equation("x + y = 2"), equation("2x + 2y = 4")];
        let solution = solve_linear_system(&eqs, &["x", "y", "z"]).unwrap().unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution[0].0, "x");
        assert_eq!(solution[0].1.to_string(), "-y + 2");
    }

    #[test]
    fn test_linear_system_rejects_bad_input() {
        let eqs = vec![equation("x*y = 1"), equation("x - y = 0")];
        assert!(matches!(
            solve_linear_system(&eqs, &["x", "y"]),
            Err(SymbolicError::Unsupported(_))
        ));
        let eqs = vec![equation("x + w = 1"), equation("x - y = 0")];
        match solve_linear_system(&eqs, &["x", "y", "z"]) {
            Err(SymbolicError::Unsupported(msg)) => assert!(msg.contains("unknown variable w")),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
