//! LaTeX rendering of expressions, in the notation of common computer algebra output
//! (`x^{2}`, `\frac{3 x}{4}`, `\sin{\left(x \right)}`).

use crate::symbolic::symbolic_engine::{Expr, PREC_ADD, PREC_MUL, PREC_NEG, PREC_POW};
use num::rational::BigRational;
use num::Signed;

fn paren(latex: String, wrap: bool) -> String {
    if wrap {
        format!("\\left({}\\right)", latex)
    } else {
        latex
    }
}

fn const_latex(c: &BigRational) -> String {
    if c.is_integer() {
        c.to_string()
    } else if c.is_negative() {
        format!("- \\frac{{{}}}{{{}}}", c.numer().abs(), c.denom())
    } else {
        format!("\\frac{{{}}}{{{}}}", c.numer(), c.denom())
    }
}

fn function_latex(name: &str, arg: &Expr) -> String {
    format!("\\{}{{\\left({} \\right)}}", name, arg.to_latex())
}

impl Expr {
    /// LaTeX source for the expression.
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(c) => const_latex(c),
            Expr::ImagUnit => "i".to_string(),
            Expr::Add(lhs, rhs) => match rhs.negated() {
                Some(pos) => format!(
                    "{} - {}",
                    lhs.to_latex(),
                    paren(pos.to_latex(), pos.precedence() <= PREC_ADD)
                ),
                None => format!("{} + {}", lhs.to_latex(), rhs.to_latex()),
            },
            Expr::Sub(lhs, rhs) => match rhs.negated() {
                Some(pos) => format!("{} + {}", lhs.to_latex(), pos.to_latex()),
                None => format!(
                    "{} - {}",
                    lhs.to_latex(),
                    paren(rhs.to_latex(), rhs.precedence() <= PREC_NEG)
                ),
            },
            Expr::Mul(lhs, rhs) => match self.negated() {
                Some(pos) => format!("- {}", paren(pos.to_latex(), pos.precedence() < PREC_MUL)),
                None => {
                    let left = paren(lhs.to_latex(), lhs.precedence() < PREC_MUL);
                    let right = paren(rhs.to_latex(), rhs.precedence() < PREC_MUL);
                    // juxtaposed numbers would read as one number
                    let separator = if right.starts_with(|ch: char| ch.is_ascii_digit()) {
                        " \\cdot "
                    } else {
                        " "
                    };
                    format!("{}{}{}", left, separator, right)
                }
            },
            Expr::Div(num, den) => match num.negated() {
                Some(pos) => format!("- \\frac{{{}}}{{{}}}", pos.to_latex(), den.to_latex()),
                None => format!("\\frac{{{}}}{{{}}}", num.to_latex(), den.to_latex()),
            },
            Expr::Pow(base, exp) => {
                if let Expr::Const(e) = exp.as_ref() {
                    if *e == BigRational::new(1.into(), 2.into()) {
                        return format!("\\sqrt{{{}}}", base.to_latex());
                    }
                }
                let exponent = exp.to_latex();
                match base.as_ref() {
                    Expr::sin(arg) => format!("\\sin^{{{}}}{{\\left({} \\right)}}", exponent, arg.to_latex()),
                    Expr::cos(arg) => format!("\\cos^{{{}}}{{\\left({} \\right)}}", exponent, arg.to_latex()),
                    Expr::tg(arg) => format!("\\tan^{{{}}}{{\\left({} \\right)}}", exponent, arg.to_latex()),
                    other => format!(
                        "{}^{{{}}}",
                        paren(other.to_latex(), other.precedence() <= PREC_POW || other.as_rational().is_some_and(|c| c.is_negative() || !c.is_integer())),
                        exponent
                    ),
                }
            }
            Expr::Sqrt(arg) => format!("\\sqrt{{{}}}", arg.to_latex()),
            Expr::Exp(arg) => format!("e^{{{}}}", arg.to_latex()),
            Expr::Ln(arg) => function_latex("log", arg),
            Expr::sin(arg) => function_latex("sin", arg),
            Expr::cos(arg) => function_latex("cos", arg),
            Expr::tg(arg) => function_latex("tan", arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latex(input: &str) -> String {
        Expr::parse_expression(input).unwrap().to_latex()
    }

    #[test]
    fn test_polynomial_latex() {
        assert_eq!(latex("x**2 + 2*x + 1"), "x^{2} + 2 x + 1");
        assert_eq!(latex("4*x"), "4 x");
        assert_eq!(latex("-x**2 - 3"), "- x^{2} - 3");
        assert_eq!(latex("2*x*y"), "2 x y");
        assert_eq!(latex("(x + 2)**5"), "\\left(x + 2\\right)^{5}");
    }

    #[test]
    fn test_fraction_latex() {
        assert_eq!(latex("3*x/4 - 1/2"), "\\frac{3 x}{4} - \\frac{1}{2}");
        assert_eq!(latex("(x - 1)/(x + 1)"), "\\frac{x - 1}{x + 1}");
        assert_eq!(latex("-1/(x + 1)"), "- \\frac{1}{x + 1}");
    }

    #[test]
    fn test_functions_latex() {
        assert_eq!(latex("sqrt(2)"), "\\sqrt{2}");
        assert_eq!(latex("sin(x)"), "\\sin{\\left(x \\right)}");
        assert_eq!(latex("sin(x)**2"), "\\sin^{2}{\\left(x \\right)}");
        assert_eq!(latex("exp(x)"), "e^{x}");
        assert_eq!(latex("log(x)"), "\\log{\\left(x \\right)}");
        assert_eq!(latex("2*I"), "2 i");
        assert_eq!(latex("2*3"), "2 \\cdot 3");
    }
}
