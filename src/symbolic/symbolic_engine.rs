//! # Symbolic Engine Module
//!
//! Core expression tree used by the calculator. Every operation of the front end
//! (solve, simplify, factor, expand, typeset) consumes and produces `Expr` values.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "y"
//! - **Constants**: `Const(BigRational)` - exact rational constants, so that `0.1` stays `1/10`
//! - **Imaginary unit**: `ImagUnit` - `i`, obeys `i^2 = -1` during polynomial algebra
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Sqrt`, `Exp`, `Ln`, `sin`, `cos`, `tg`
//!
//! ### Key Methods
//! - `extract_variables()` - the free variables, telling constant atoms such as `sqrt(2)` apart
//! - `eval_complex()` - numeric evaluation over the complex numbers
//! - `summands()` / `as_integer_power()` - structural queries used by the operation handlers
//!
//! Plain-text printing (`Display`) follows the input notation accepted by the parser
//! (`x**2 + 2*x + 1`), so that printing a parsed expression and parsing it again gives
//! back an equal tree for canonical forms.

#![allow(non_camel_case_types)]

use num::bigint::BigInt;
use num::rational::BigRational;
use num::{One, Signed, ToPrimitive, Zero};
use num_complex::Complex64;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::symbolic::parse_expr::rational_from_decimal_str;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// The enum uses `Box<Expr>` for recursive structures, allowing arbitrarily deep expression trees.
/// Ordering and hashing are derived so that expressions can be used as keys of polynomial
/// generators (see `symbolic_polynomial`).
///
/// # Examples
/// ```rust, ignore
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::integer(2)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y")
    Var(String),
    /// Exact rational constant
    Const(BigRational),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Principal square root
    Sqrt(Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// The imaginary unit `i`
    ImagUnit,
}

// binding strength of the printed forms, shared by the plain and LaTeX printers
pub(crate) const PREC_ADD: u8 = 10;
pub(crate) const PREC_NEG: u8 = 15;
pub(crate) const PREC_MUL: u8 = 20;
pub(crate) const PREC_POW: u8 = 30;
pub(crate) const PREC_ATOM: u8 = 40;

fn wrap_plain(expr: &Expr, paren: bool) -> String {
    if paren {
        format!("({})", expr)
    } else {
        expr.to_string()
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Parentheses are only emitted where precedence requires them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::ImagUnit => write!(f, "I"),
            Expr::Add(lhs, rhs) => match rhs.negated() {
                Some(pos) => write!(f, "{} - {}", lhs, wrap_plain(&pos, pos.precedence() <= PREC_ADD)),
                None => write!(f, "{} + {}", lhs, rhs),
            },
            Expr::Sub(lhs, rhs) => match rhs.negated() {
                Some(pos) => write!(f, "{} + {}", lhs, pos),
                None => write!(f, "{} - {}", lhs, wrap_plain(rhs, rhs.precedence() <= PREC_NEG)),
            },
            Expr::Mul(lhs, rhs) => {
                if lhs.is_minus_one() {
                    write!(f, "-{}", wrap_plain(rhs, rhs.precedence() < PREC_MUL))
                } else {
                    write!(
                        f,
                        "{}*{}",
                        wrap_plain(lhs, lhs.precedence() < PREC_NEG),
                        wrap_plain(rhs, rhs.precedence() < PREC_MUL)
                    )
                }
            }
            Expr::Div(num, den) => write!(
                f,
                "{}/{}",
                wrap_plain(num, num.precedence() < PREC_NEG),
                wrap_plain(den, den.precedence() < PREC_POW)
            ),
            Expr::Pow(base, exp) => write!(
                f,
                "{}**{}",
                wrap_plain(base, base.precedence() <= PREC_POW),
                wrap_plain(exp, exp.precedence() < PREC_ATOM)
            ),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::integer(-1)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn integer(value: i64) -> Expr {
        Expr::Const(BigRational::from_integer(BigInt::from(value)))
    }

    pub fn rational(numer: i64, denom: i64) -> Expr {
        Expr::Const(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    /// Converts a floating point input into an exact constant through its shortest decimal
    /// representation, so `0.1` becomes `1/10` rather than the nearest binary fraction.
    /// Returns `None` for infinities and NaN.
    pub fn from_f64(value: f64) -> Option<Expr> {
        if !value.is_finite() {
            return None;
        }
        rational_from_decimal_str(&format!("{}", value)).map(Expr::Const)
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Expr::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if c.is_zero())
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == -BigRational::one())
    }

    /// Builds `coeff * expr` in the canonical printed shape: integer coefficients are leading
    /// factors, fractional ones become a division (`3*x/4`).
    pub fn scaled(coeff: &BigRational, expr: Expr) -> Expr {
        if coeff.is_zero() {
            return Expr::integer(0);
        }
        if coeff.is_one() {
            return expr;
        }
        let numer = BigRational::from_integer(coeff.numer().clone());
        let head = if numer.is_one() {
            expr
        } else if numer == -BigRational::one() {
            -expr
        } else {
            Expr::Mul(Box::new(Expr::Const(numer)), Box::new(expr))
        };
        if coeff.is_integer() {
            head
        } else {
            let denom = BigRational::from_integer(coeff.denom().clone());
            Expr::Div(Box::new(head), Box::new(Expr::Const(denom)))
        }
    }

    /// Arithmetic negation that avoids stacking `-1` factors.
    pub fn negate(self) -> Expr {
        match self {
            Expr::Const(c) => Expr::Const(-c),
            other => match other.negated() {
                Some(pos) => pos,
                None => -other,
            },
        }
    }

    /// If the expression carries a leading minus sign, returns its positive counterpart.
    pub fn negated(&self) -> Option<Expr> {
        match self {
            Expr::Const(c) if c.is_negative() => Some(Expr::Const(-c.clone())),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -BigRational::one() => Some(rhs.as_ref().clone()),
                Expr::Const(c) if c.is_negative() => Some(Expr::Mul(
                    Box::new(Expr::Const(-c.clone())),
                    rhs.clone(),
                )),
                _ => lhs
                    .negated()
                    .map(|pos| Expr::Mul(Box::new(pos), rhs.clone())),
            },
            Expr::Div(num, den) => num
                .negated()
                .map(|pos| Expr::Div(Box::new(pos), den.clone())),
            _ => None,
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_ADD,
            Expr::Const(c) if c.is_negative() => PREC_NEG,
            Expr::Const(c) if !c.is_integer() => PREC_MUL,
            Expr::Mul(..) | Expr::Div(..) if self.negated().is_some() => PREC_NEG,
            Expr::Mul(..) | Expr::Div(..) => PREC_MUL,
            Expr::Pow(..) => PREC_POW,
            _ => PREC_ATOM,
        }
    }

    /// Argument of a one-argument function node.
    pub fn function_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Sqrt(arg)
            | Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg) => Some(arg),
            _ => None,
        }
    }

    /// Rebuilds a one-argument function node around a new argument.
    /// Returns `self` unchanged for nodes that are not functions.
    pub fn with_argument(&self, arg: Expr) -> Expr {
        match self {
            Expr::Sqrt(_) => Expr::Sqrt(arg.boxed()),
            Expr::Exp(_) => Expr::Exp(arg.boxed()),
            Expr::Ln(_) => Expr::Ln(arg.boxed()),
            Expr::sin(_) => Expr::sin(arg.boxed()),
            Expr::cos(_) => Expr::cos(arg.boxed()),
            Expr::tg(_) => Expr::tg(arg.boxed()),
            _ => self.clone(),
        }
    }

    /// Returns the sorted list of variable names occurring in the expression.
    pub fn extract_variables(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found.into_iter().collect()
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            Expr::Const(_) | Expr::ImagUnit => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(found);
                rhs.collect_variables(found);
            }
            func => {
                if let Some(arg) = func.function_argument() {
                    arg.collect_variables(found);
                }
            }
        }
    }

    /// Splits a sum into its terms, in written order. Subtracted terms come back negated.
    /// Any other expression is a single term.
    pub fn summands(&self) -> Vec<Expr> {
        match self {
            Expr::Add(lhs, rhs) => {
                let mut terms = lhs.summands();
                terms.extend(rhs.summands());
                terms
            }
            Expr::Sub(lhs, rhs) => {
                let mut terms = lhs.summands();
                terms.extend(rhs.summands().into_iter().map(Expr::negate));
                terms
            }
            other => vec![other.clone()],
        }
    }

    /// For `base ^ n` with an integer constant `n` returns the base and the exponent.
    pub fn as_integer_power(&self) -> Option<(&Expr, BigInt)> {
        match self {
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) if n.is_integer() => Some((base.as_ref(), n.to_integer())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Numeric evaluation over the complex plane.
    ///
    /// Every variable of the expression must be present in `values`.
    pub fn eval_complex(&self, values: &HashMap<String, Complex64>) -> Result<Complex64, String> {
        let res = match self {
            Expr::Var(name) => *values
                .get(name)
                .ok_or_else(|| format!("no value for variable {}", name))?,
            Expr::Const(c) => Complex64::new(
                c.to_f64()
                    .ok_or_else(|| format!("constant {} is out of range", c))?,
                0.0,
            ),
            Expr::ImagUnit => Complex64::new(0.0, 1.0),
            Expr::Add(lhs, rhs) => lhs.eval_complex(values)? + rhs.eval_complex(values)?,
            Expr::Sub(lhs, rhs) => lhs.eval_complex(values)? - rhs.eval_complex(values)?,
            Expr::Mul(lhs, rhs) => lhs.eval_complex(values)? * rhs.eval_complex(values)?,
            Expr::Div(lhs, rhs) => {
                let den = rhs.eval_complex(values)?;
                if den.norm() == 0.0 {
                    return Err("division by zero".to_string());
                }
                lhs.eval_complex(values)? / den
            }
            Expr::Pow(base, exp) => {
                let base = base.eval_complex(values)?;
                match exp.as_ref() {
                    Expr::Const(n) if n.is_integer() => match n.to_integer().to_i32() {
                        Some(k) => base.powi(k),
                        None => return Err(format!("exponent {} is too large", n)),
                    },
                    other => base.powc(other.eval_complex(values)?),
                }
            }
            Expr::Sqrt(arg) => arg.eval_complex(values)?.sqrt(),
            Expr::Exp(arg) => arg.eval_complex(values)?.exp(),
            Expr::Ln(arg) => arg.eval_complex(values)?.ln(),
            Expr::sin(arg) => arg.eval_complex(values)?.sin(),
            Expr::cos(arg) => arg.eval_complex(values)?.cos(),
            Expr::tg(arg) => arg.eval_complex(values)?.tan(),
        };
        if res.re.is_finite() && res.im.is_finite() {
            Ok(res)
        } else {
            Err(format!("{} does not evaluate to a finite number", self))
        }
    }

    /// Evaluates an expression without variables.
    pub fn eval_constant(&self) -> Result<Complex64, String> {
        self.eval_complex(&HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_display_precedence() {
        let expr = Expr::Pow(Box::new(x() + Expr::integer(1)), Box::new(Expr::integer(2)));
        assert_eq!(expr.to_string(), "(x + 1)**2");
        let expr = Expr::integer(2) * x() - Expr::integer(3);
        assert_eq!(expr.to_string(), "2*x - 3");
        let expr = x() - (x() + Expr::integer(1));
        assert_eq!(expr.to_string(), "x - (x + 1)");
        let expr = x() / (Expr::integer(2) * x());
        assert_eq!(expr.to_string(), "x/(2*x)");
        let expr = -(x() + Expr::integer(1));
        assert_eq!(expr.to_string(), "-(x + 1)");
    }

    #[test]
    fn test_display_negative_terms() {
        let expr = x() + Expr::integer(-4);
        assert_eq!(expr.to_string(), "x - 4");
        let expr = x() + Expr::Mul(Box::new(Expr::integer(-2)), Box::new(Expr::var("y")));
        assert_eq!(expr.to_string(), "x - 2*y");
        let expr = x() - Expr::integer(-1);
        assert_eq!(expr.to_string(), "x + 1");
        let expr = Expr::Pow(Box::new(Expr::integer(-2)), Box::new(Expr::rational(1, 2)));
        assert_eq!(expr.to_string(), "(-2)**(1/2)");
    }

    #[test]
    fn test_from_f64_is_exact_decimal() {
        assert_eq!(Expr::from_f64(0.1), Some(Expr::rational(1, 10)));
        assert_eq!(Expr::from_f64(-2.5), Some(Expr::rational(-5, 2)));
        assert_eq!(Expr::from_f64(3.0), Some(Expr::integer(3)));
        assert_eq!(Expr::from_f64(f64::NAN), None);
    }

    #[test]
    fn test_scaled() {
        let q = BigRational::new(BigInt::from(3), BigInt::from(4));
        assert_eq!(Expr::scaled(&q, x()).to_string(), "3*x/4");
        let m = BigRational::from_integer(BigInt::from(-1));
        assert_eq!(Expr::scaled(&m, x()).to_string(), "-x");
    }

    #[test]
    fn test_eval_complex() {
        let expr = Expr::Pow(Box::new(x()), Box::new(Expr::integer(2))) - Expr::integer(4);
        let mut values = HashMap::new();
        values.insert("x".to_string(), Complex64::new(2.0, 0.0));
        assert_eq!(expr.eval_complex(&values).unwrap(), Complex64::new(0.0, 0.0));
        values.insert("x".to_string(), Complex64::new(0.0, 1.0));
        let value = expr.eval_complex(&values).unwrap();
        assert!((value - Complex64::new(-5.0, 0.0)).norm() < 1e-12);
        assert!(expr.eval_constant().is_err());
    }

    #[test]
    fn test_eval_division_by_zero() {
        let expr = x() / (x() - Expr::integer(1));
        let mut values = HashMap::new();
        values.insert("x".to_string(), Complex64::new(1.0, 0.0));
        assert!(expr.eval_complex(&values).is_err());
    }

    #[test]
    fn test_extract_variables() {
        let expr = Expr::sin(Box::new(Expr::var("y"))) + x() * Expr::var("a");
        assert_eq!(expr.extract_variables(), vec!["a", "x", "y"]);
        let constant = Expr::Sqrt(Box::new(Expr::integer(2))) * Expr::ImagUnit;
        assert!(constant.extract_variables().is_empty());
    }

    #[test]
    fn test_summands_and_power() {
        let expr = x() - Expr::integer(2) + Expr::var("y");
        assert_eq!(
            expr.summands(),
            vec![x(), Expr::integer(-2), Expr::var("y")]
        );
        let pow = Expr::Pow(Box::new(x() + Expr::integer(2)), Box::new(Expr::integer(5)));
        let (base, n) = pow.as_integer_power().unwrap();
        assert_eq!(base, &(x() + Expr::integer(2)));
        assert_eq!(n, BigInt::from(5));
        assert!(x().as_integer_power().is_none());
    }
}
