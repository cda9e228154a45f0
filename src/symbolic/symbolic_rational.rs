//! # Rational Functions
//!
//! Quotients of polynomials and the conversion of arbitrary expression trees into them.
//! `RationalFunction::from_expr` is the single entry point that turns an `Expr` into
//! canonical algebraic form; non-polynomial pieces (`sin(x)`, `exp(y)`, `x**(1/3)`, ...)
//! become opaque generators whose arguments are canonicalized by a caller supplied closure.
//!
//! Cancellation (`cancel`) removes, in order:
//! 1. exact polynomial divisors of the numerator by the denominator,
//! 2. common monomial factors,
//! 3. the greatest common divisor of univariate numerator and denominator,
//! 4. square roots and `i` from single-term denominators.
//!
//! The result is written with integer coefficients whose overall gcd is 1 and a denominator
//! whose leading coefficient is positive.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_polynomial::{
    Generator, Monomial, Polynomial, uni_div_rem, uni_gcd,
};
use num::bigint::BigInt;
use num::rational::BigRational;
use num::{One, Signed, ToPrimitive, Zero};
use std::fmt;

/// Powers of multi-term bases above this are refused instead of being multiplied out.
pub const MAX_EXPANSION_POWER: i64 = 200;
/// Largest exponent accepted at all.
const MAX_POWER: i64 = 10_000;

/// Errors of the algebraic layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicError {
    DivisionByZero,
    ExponentTooLarge(String),
    NotPolynomial(String),
    Unsupported(String),
}

impl fmt::Display for SymbolicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolicError::DivisionByZero => write!(f, "division by zero"),
            SymbolicError::ExponentTooLarge(exp) => {
                write!(f, "exponent {} is too large to expand", exp)
            }
            SymbolicError::NotPolynomial(expr) => write!(f, "{} is not a polynomial", expr),
            SymbolicError::Unsupported(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SymbolicError {}

/// Splits a positive integer `n` into `(outside, inside)` with `n = outside^2 * inside`.
fn split_square(n: &BigInt) -> (BigInt, BigInt) {
    let mut outside = BigInt::one();
    let mut inside = BigInt::one();
    let mut rest = n.clone();
    let mut p: u64 = 2;
    while p <= 100_000 && BigInt::from(p * p) <= rest {
        let square = BigInt::from(p * p);
        while (&rest % &square).is_zero() {
            rest /= &square;
            outside *= p;
        }
        if (&rest % p).is_zero() {
            rest /= p;
            inside *= p;
        }
        p += 1;
    }
    let root = rest.sqrt();
    if &root * &root == rest {
        outside *= root;
    } else {
        inside *= rest;
    }
    (outside, inside)
}

/// Exact principal square root of a rational constant, as a polynomial over the atoms
/// `sqrt(k)` (k square-free) and `i`. `sqrt(-8) = 2*sqrt(2)*i`, `sqrt(1/2) = sqrt(2)/2`.
pub fn sqrt_of_rational(c: &BigRational) -> Polynomial {
    if c.is_zero() {
        return Polynomial::zero();
    }
    let magnitude = c.abs();
    // sqrt(p/q) = sqrt(p*q)/q
    let radicand = magnitude.numer() * magnitude.denom();
    let (outside, inside) = split_square(&radicand);
    let mut root = Polynomial::constant(BigRational::new(outside, magnitude.denom().clone()));
    if !inside.is_one() {
        let atom = Expr::Sqrt(Box::new(Expr::Const(BigRational::from_integer(inside))));
        root = root.mul(&Polynomial::generator(Generator::Atom(atom)));
    }
    if c.is_negative() {
        root = root.mul(&Polynomial::generator(Generator::Atom(Expr::ImagUnit)));
    }
    root
}

/// Quotient of two polynomials. The denominator is never zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalFunction {
    pub num: Polynomial,
    pub den: Polynomial,
}

impl RationalFunction {
    pub fn from_polynomial(p: Polynomial) -> Self {
        RationalFunction {
            num: p,
            den: Polynomial::one(),
        }
    }

    pub fn constant(c: BigRational) -> Self {
        RationalFunction::from_polynomial(Polynomial::constant(c))
    }

    fn generator(expr: Expr) -> Self {
        RationalFunction::from_polynomial(Polynomial::generator(Generator::Atom(expr)))
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn as_constant(&self) -> Option<BigRational> {
        let num = self.num.as_constant()?;
        let den = self.den.as_constant()?;
        Some(num / den)
    }

    /// The numerator divided out, when the denominator is a constant.
    pub fn as_polynomial(&self) -> Option<Polynomial> {
        let den = self.den.as_constant()?;
        Some(self.num.scale(&den.recip()))
    }

    /// Folds a constant denominator into the numerator.
    fn tidy(self) -> Self {
        match self.as_polynomial() {
            Some(p) => RationalFunction::from_polynomial(p),
            None => self,
        }
    }

    pub fn add(&self, other: &RationalFunction) -> Self {
        if self.den == other.den {
            return RationalFunction {
                num: self.num.add(&other.num),
                den: self.den.clone(),
            };
        }
        RationalFunction {
            num: self.num.mul(&other.den).add(&other.num.mul(&self.den)),
            den: self.den.mul(&other.den),
        }
        .tidy()
    }

    pub fn neg(&self) -> Self {
        RationalFunction {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub fn sub(&self, other: &RationalFunction) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &RationalFunction) -> Self {
        RationalFunction {
            num: self.num.mul(&other.num),
            den: self.den.mul(&other.den),
        }
        .tidy()
    }

    pub fn div(&self, other: &RationalFunction) -> Result<Self, SymbolicError> {
        if other.is_zero() {
            return Err(SymbolicError::DivisionByZero);
        }
        Ok(RationalFunction {
            num: self.num.mul(&other.den),
            den: self.den.mul(&other.num),
        }
        .tidy())
    }

    pub fn powi(&self, n: i64) -> Result<Self, SymbolicError> {
        if n.abs() > MAX_POWER || (n.abs() > MAX_EXPANSION_POWER && self.num.len() + self.den.len() > 2)
        {
            return Err(SymbolicError::ExponentTooLarge(n.to_string()));
        }
        let k = n.unsigned_abs() as u32;
        let raised = RationalFunction {
            num: self.num.pow(k),
            den: self.den.pow(k),
        };
        if n >= 0 {
            Ok(raised.tidy())
        } else {
            RationalFunction::constant(BigRational::one()).div(&raised)
        }
    }

    /// Rescales numerator and denominator to coprime integer coefficients with a positive
    /// leading denominator coefficient.
    fn normalize_content(self) -> Self {
        let tidy = self.tidy();
        if tidy.den.as_constant().is_some() || tidy.num.is_zero() {
            return tidy;
        }
        let ratio = tidy.num.content() / tidy.den.content();
        let numer = BigRational::from_integer(ratio.numer().clone());
        let denom = BigRational::from_integer(ratio.denom().clone());
        RationalFunction {
            num: tidy.num.primitive_part().scale(&numer),
            den: tidy.den.primitive_part().scale(&denom),
        }
    }

    /// Same value, numerator and denominator written with integer coefficients.
    pub fn normalized(self) -> Self {
        self.normalize_content()
    }

    /// Reduces the fraction to lowest terms as far as the algebra here allows.
    pub fn cancel(self) -> Self {
        let tidy = self.tidy();
        if tidy.den.as_constant().is_some() || tidy.num.is_zero() {
            return tidy;
        }
        let RationalFunction { mut num, mut den } = tidy;
        if let Some(quotient) = num.div_exact(&den) {
            return RationalFunction::from_polynomial(quotient);
        }

        let num_content = num.monomial_content();
        let common: Monomial = den
            .monomial_content()
            .into_iter()
            .filter_map(|(g, e)| num_content.get(&g).map(|other| (g, e.min(*other))))
            .collect();
        if !common.is_empty() {
            if let (Some(n), Some(d)) = (num.div_monomial(&common), den.div_monomial(&common)) {
                num = n;
                den = d;
            }
        }

        let mut variables = num.variables();
        variables.extend(den.variables());
        variables.sort();
        variables.dedup();
        if variables.len() == 1 && !num.has_atoms() && !den.has_atoms() {
            let var = &variables[0];
            if let (Some(nc), Some(dc)) = (num.univariate_coeffs(var), den.univariate_coeffs(var)) {
                let g = uni_gcd(&nc, &dc);
                if g.len() > 1 {
                    num = Polynomial::from_univariate(var, &uni_div_rem(&nc, &g).0);
                    den = Polynomial::from_univariate(var, &uni_div_rem(&dc, &g).0);
                }
            }
        }

        if den.len() == 1 {
            if let Some((mono, _)) = den.leading_term() {
                let algebraic: Monomial = mono
                    .into_iter()
                    .filter(|(g, _)| g.square_value().is_some())
                    .collect();
                if !algebraic.is_empty() {
                    let m = Polynomial::monomial(algebraic);
                    num = num.mul(&m);
                    den = den.mul(&m);
                }
            }
        }

        RationalFunction { num, den }.normalize_content()
    }

    pub fn to_expr(&self) -> Expr {
        match self.as_polynomial() {
            Some(p) => p.to_expr(),
            None => Expr::Div(self.num.to_expr().boxed(), self.den.to_expr().boxed()),
        }
    }

    /// Converts an expression tree. `canon` rewrites the arguments of atoms (function
    /// arguments, bases and exponents of non-integer powers) before they become generators,
    /// so that `sin(x + x)` and `sin(2*x)` land on the same generator.
    pub fn from_expr<F>(expr: &Expr, canon: &F) -> Result<Self, SymbolicError>
    where
        F: Fn(&Expr) -> Result<Expr, SymbolicError>,
    {
        let res = match expr {
            Expr::Var(name) => RationalFunction::from_polynomial(Polynomial::variable(name)),
            Expr::Const(c) => RationalFunction::constant(c.clone()),
            Expr::ImagUnit => RationalFunction::generator(Expr::ImagUnit),
            Expr::Add(lhs, rhs) => {
                RationalFunction::from_expr(lhs, canon)?.add(&RationalFunction::from_expr(rhs, canon)?)
            }
            Expr::Sub(lhs, rhs) => {
                RationalFunction::from_expr(lhs, canon)?.sub(&RationalFunction::from_expr(rhs, canon)?)
            }
            Expr::Mul(lhs, rhs) => {
                RationalFunction::from_expr(lhs, canon)?.mul(&RationalFunction::from_expr(rhs, canon)?)
            }
            Expr::Div(lhs, rhs) => {
                RationalFunction::from_expr(lhs, canon)?.div(&RationalFunction::from_expr(rhs, canon)?)?
            }
            Expr::Pow(base, exp) => RationalFunction::power_from_expr(base, exp, canon)?,
            Expr::Sqrt(arg) => {
                let arg = canon(arg)?;
                match arg.as_rational() {
                    Some(c) => RationalFunction::from_polynomial(sqrt_of_rational(c)),
                    None => RationalFunction::generator(Expr::Sqrt(arg.boxed())),
                }
            }
            func => {
                let arg = match func.function_argument() {
                    Some(arg) => canon(arg)?,
                    None => return Err(SymbolicError::Unsupported(format!("cannot convert {}", func))),
                };
                let special = match (func, arg.as_rational()) {
                    (Expr::Exp(_), Some(c)) if c.is_zero() => Some(BigRational::one()),
                    (Expr::Ln(_), Some(c)) if c.is_one() => Some(BigRational::zero()),
                    (Expr::sin(_), Some(c)) | (Expr::tg(_), Some(c)) if c.is_zero() => {
                        Some(BigRational::zero())
                    }
                    (Expr::cos(_), Some(c)) if c.is_zero() => Some(BigRational::one()),
                    _ => None,
                };
                match special {
                    Some(value) => RationalFunction::constant(value),
                    None => RationalFunction::generator(func.with_argument(arg)),
                }
            }
        };
        Ok(res)
    }

    fn power_from_expr<F>(base: &Expr, exp: &Expr, canon: &F) -> Result<Self, SymbolicError>
    where
        F: Fn(&Expr) -> Result<Expr, SymbolicError>,
    {
        let exponent = RationalFunction::from_expr(exp, canon)?.as_constant();
        match exponent {
            Some(n) if n.is_integer() => {
                let n = n
                    .to_integer()
                    .to_i64()
                    .ok_or_else(|| SymbolicError::ExponentTooLarge(n.to_string()))?;
                RationalFunction::from_expr(base, canon)?.powi(n)
            }
            Some(n) => {
                let base_rf = RationalFunction::from_expr(base, canon)?;
                match base_rf.as_constant() {
                    Some(c) if *n.denom() == BigInt::from(2) => {
                        let root = RationalFunction::from_polynomial(sqrt_of_rational(&c));
                        if root.is_zero() && n.is_negative() {
                            return Err(SymbolicError::DivisionByZero);
                        }
                        let k = n
                            .numer()
                            .to_i64()
                            .ok_or_else(|| SymbolicError::ExponentTooLarge(n.to_string()))?;
                        root.powi(k)
                    }
                    _ => Ok(RationalFunction::generator(Expr::Pow(
                        canon(base)?.boxed(),
                        Expr::Const(n).boxed(),
                    ))),
                }
            }
            None => Ok(RationalFunction::generator(Expr::Pow(
                canon(base)?.boxed(),
                canon(exp)?.boxed(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    fn identity(expr: &Expr) -> Result<Expr, SymbolicError> {
        Ok(expr.clone())
    }

    fn canonical(input: &str) -> String {
        let expr = Expr::parse_expression(input).unwrap();
        RationalFunction::from_expr(&expr, &identity)
            .unwrap()
            .cancel()
            .to_expr()
            .to_string()
    }

    #[test]
    fn test_sqrt_of_rational() {
        let q = |n: i64, d: i64| BigRational::new(BigInt::from(n), BigInt::from(d));
        assert_eq!(sqrt_of_rational(&q(16, 1)).to_expr().to_string(), "4");
        assert_eq!(sqrt_of_rational(&q(8, 1)).to_expr().to_string(), "2*sqrt(2)");
        assert_eq!(sqrt_of_rational(&q(-4, 1)).to_expr().to_string(), "2*I");
        assert_eq!(sqrt_of_rational(&q(1, 2)).to_expr().to_string(), "sqrt(2)/2");
        assert_eq!(sqrt_of_rational(&q(-3, 1)).to_expr().to_string(), "sqrt(3)*I");
    }

    #[test]
    fn test_polynomial_collapse() {
        assert_eq!(canonical("(x + 1)**2 - (x - 1)**2"), "4*x");
        assert_eq!(canonical("x + x + 3 - 1"), "2*x + 2");
        assert_eq!(canonical("x*y - y*x"), "0");
    }

    #[test]
    fn test_cancellation() {
        assert_eq!(canonical("(x**2 - 1)/(x - 1)"), "x + 1");
        assert_eq!(canonical("(x**2 - 1)/(x**2 + 2*x + 1)"), "(x - 1)/(x + 1)");
        assert_eq!(canonical("x**2*y/(x*y**2)"), "x/y");
        assert_eq!(canonical("(x/2 + 1/2)/y"), "(x + 1)/(2*y)");
        assert_eq!(canonical("1/(-x - 1)"), "-1/(x + 1)");
    }

    #[test]
    fn test_radicals() {
        assert_eq!(canonical("sqrt(8)*sqrt(2)"), "4");
        assert_eq!(canonical("1/sqrt(2)"), "sqrt(2)/2");
        assert_eq!(canonical("I**2 + 1"), "0");
        assert_eq!(canonical("4**(1/2)"), "2");
    }

    #[test]
    fn test_function_atoms() {
        assert_eq!(canonical("sin(x) + sin(x)"), "2*sin(x)");
        assert_eq!(canonical("exp(0) + cos(0) + ln(1)"), "2");
        assert_eq!(canonical("x**(1/3)*x**(1/3)"), "(x**(1/3))**2");
    }

    #[test]
    fn test_errors() {
        let expr = Expr::parse_expression("1/(x - x)").unwrap();
        assert_eq!(
            RationalFunction::from_expr(&expr, &identity),
            Err(SymbolicError::DivisionByZero)
        );
        let expr = Expr::parse_expression("(x + 1)**1000").unwrap();
        assert!(matches!(
            RationalFunction::from_expr(&expr, &identity),
            Err(SymbolicError::ExponentTooLarge(_))
        ));
        // a single term may be raised freely
        let expr = Expr::parse_expression("x**1000").unwrap();
        assert!(RationalFunction::from_expr(&expr, &identity).is_ok());
    }
}
