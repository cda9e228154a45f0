//! # Symbolic Expression Simplification Module
//!
//! Simplification and expansion of expressions through the rational function normal form.
//!
//! ## Simplification Strategy
//!
//! 1. **Canonical form**: the expression is rewritten as a quotient of expanded polynomials,
//!    with like terms collected and exact constants folded
//! 2. **Atom arguments**: arguments of functions and non-integer powers are simplified first
//! 3. **Cancellation**: common factors of numerator and denominator are removed
//! 4. **Pythagorean identity**: `cos(a)^2` is traded for `1 - sin(a)^2` where that shortens
//!    the result
//!
//! Expansion runs steps 1 and 2 only, so `(x**2 - 1)/(x - 1)` is left as a quotient.
//!
//! Both operations are idempotent: applying them to their own output gives the same tree.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_polynomial::{Generator, Polynomial};
use crate::symbolic::symbolic_rational::{RationalFunction, SymbolicError};

/// Replaces even powers of the generator `cos_atom` by powers of `one_minus_sin2`.
fn substitute_even_powers(p: &Polynomial, cos_atom: &Generator, one_minus_sin2: &Polynomial) -> Polynomial {
    let mut out = Polynomial::zero();
    for (mono, coeff) in p.terms() {
        let e = mono.get(cos_atom).copied().unwrap_or(0);
        let mut rest = mono.clone();
        rest.remove(cos_atom);
        if e % 2 == 1 {
            rest.insert(cos_atom.clone(), 1);
        }
        let term = Polynomial::monomial(rest)
            .scale(coeff)
            .mul(&one_minus_sin2.pow(e / 2));
        out = out.add(&term);
    }
    out
}

fn pythagorean(p: &Polynomial) -> Polynomial {
    let mut best = p.clone();
    for g in p.generators() {
        if let Generator::Atom(Expr::cos(arg)) = &g {
            if best.degree_in(&g) < 2 {
                continue;
            }
            let sin = Polynomial::generator(Generator::Atom(Expr::sin(arg.clone())));
            let one_minus_sin2 = Polynomial::one().sub(&sin.pow(2));
            let rewritten = substitute_even_powers(&best, &g, &one_minus_sin2);
            if rewritten.len() < best.len() {
                best = rewritten;
            }
        }
    }
    best
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Brings the expression to its simplest canonical form.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let expr = Expr::parse_expression("(x + 1)**2 - (x - 1)**2").unwrap();
    /// assert_eq!(expr.simplify_().unwrap().to_string(), "4*x");
    /// ```
    pub fn simplify_(&self) -> Result<Expr, SymbolicError> {
        let canon = |e: &Expr| e.simplify_();
        let rf = RationalFunction::from_expr(self, &canon)?.cancel();
        let num = pythagorean(&rf.num);
        let den = pythagorean(&rf.den);
        if num == rf.num && den == rf.den {
            return Ok(rf.to_expr());
        }
        Ok(RationalFunction { num, den }.cancel().to_expr())
    }

    //___________________________________EXPANSION____________________________________

    /// Multiplies out all products and integer powers, distributing numerators over sums.
    /// Denominators are expanded but not cancelled against numerators.
    pub fn expand(&self) -> Result<Expr, SymbolicError> {
        let canon = |e: &Expr| e.expand();
        let rf = RationalFunction::from_expr(self, &canon)?.normalized();
        Ok(rf.to_expr())
    }

    /// The expression as a single polynomial, if it is one.
    pub fn to_polynomial(&self) -> Result<Polynomial, SymbolicError> {
        let canon = |e: &Expr| e.simplify_();
        RationalFunction::from_expr(self, &canon)?
            .cancel()
            .as_polynomial()
            .ok_or_else(|| SymbolicError::NotPolynomial(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplified(input: &str) -> String {
        Expr::parse_expression(input)
            .unwrap()
            .simplify_()
            .unwrap()
            .to_string()
    }

    fn expanded(input: &str) -> String {
        Expr::parse_expression(input)
            .unwrap()
            .expand()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_simplify_collects_terms() {
        assert_eq!(simplified("(x + 1)**2 - (x - 1)**2"), "4*x");
        assert_eq!(simplified("2*x + 3*x - x"), "4*x");
        assert_eq!(simplified("x - x"), "0");
        assert_eq!(simplified("0.5*x + 0.5*x"), "x");
    }

    #[test]
    fn test_simplify_cancels() {
        assert_eq!(simplified("(x**2 - 1)/(x - 1)"), "x + 1");
        assert_eq!(simplified("(x**2 - y**2)/(x + y)"), "x - y");
        assert_eq!(simplified("x/x"), "1");
    }

    #[test]
    fn test_simplify_functions() {
        assert_eq!(simplified("sin(x + x)"), "sin(2*x)");
        assert_eq!(simplified("sin(x)**2 + cos(x)**2"), "1");
        assert_eq!(simplified("exp(x - x)"), "1");
        assert_eq!(simplified("sqrt(12)"), "2*sqrt(3)");
    }

    #[test]
    fn test_simplify_is_idempotent() {
        for input in [
            "(x + 1)**2 - (x - 1)**2",
            "(x**2 - 1)/(x**2 + 2*x + 1)",
            "x/2 + y/3",
            "sin(x)**3 + sin(x)*cos(x)**2",
            "(x + y)**3/(x*y)",
            "1/(1 - x) + 1/(1 + x)",
        ] {
            let once = Expr::parse_expression(input).unwrap().simplify_().unwrap();
            let twice = once.simplify_().unwrap();
            assert_eq!(once, twice, "simplify is not idempotent on {}", input);
            let reparsed = Expr::parse_expression(&once.to_string()).unwrap().simplify_().unwrap();
            assert_eq!(once.to_string(), reparsed.to_string());
        }
    }

    #[test]
    fn test_simplify_division_by_zero() {
        let expr = Expr::parse_expression("1/(x - x)").unwrap();
        assert_eq!(expr.simplify_(), Err(SymbolicError::DivisionByZero));
    }

    #[test]
    fn test_expand() {
        assert_eq!(
            expanded("(x + 2)**5"),
            "x**5 + 10*x**4 + 40*x**3 + 80*x**2 + 80*x + 32"
        );
        assert_eq!(expanded("(x + y)**2"), "x**2 + 2*x*y + y**2");
        assert_eq!(expanded("(a + b)*(a - b)"), "a**2 - b**2");
        assert_eq!(expanded("(2*x - 1)**3"), "8*x**3 - 12*x**2 + 6*x - 1");
        assert_eq!(expanded("(x**2 - 1)/(x - 1)"), "(x**2 - 1)/(x - 1)");
        assert_eq!(expanded("(x + 1)**0"), "1");
    }

    #[test]
    fn test_expand_is_idempotent() {
        for input in ["(x + 2)**5", "(a - 2*b)**4", "(x + 1)/(x + 2)**2"] {
            let once = Expr::parse_expression(input).unwrap().expand().unwrap();
            assert_eq!(once.expand().unwrap(), once);
        }
    }

    #[test]
    fn test_to_polynomial() {
        let p = Expr::parse_expression("x**3 - 2*x**2 - 5*x + 6")
            .unwrap()
            .to_polynomial()
            .unwrap();
        assert_eq!(p.total_degree(), 3);
        assert!(Expr::parse_expression("1/x").unwrap().to_polynomial().is_err());
    }
}
