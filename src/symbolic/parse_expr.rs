/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("(x + 1)**2 - 2x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
//
// grammar (lowest binding first):
//   expr    := term (('+' | '-') term)*
//   term    := unary (('*' | '/') unary | implicit power)*
//   unary   := ('-' | '+') unary | power
//   power   := atom (('**' | '^') unary)?          right associative
//   atom    := number | function '(' expr ')' | identifier | '(' expr ')'
//
// implicit multiplication covers `2x`, `2(x + 1)`, `(x - 1)(x + 1)` and `x y`.
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of, satisfy},
    combinator::{not, opt, peek, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use num::bigint::BigInt;
use num::rational::BigRational;
use num::One;
use std::fmt;

/// function names understood by the parser; `ln` and `log` are both the natural logarithm
const FUNCTIONS: [&str; 8] = ["sqrt", "exp", "ln", "log", "sin", "cos", "tan", "tg"];
/// largest magnitude of the exponent in `1e<exponent>` literals
const MAX_DECIMAL_EXPONENT: u32 = 400;

/// Error produced for text that is not a well-formed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// the input was empty or whitespace only
    Empty,
    /// the input could not be parsed past `position` (a character offset)
    Syntax { position: usize, fragment: String },
    /// a name followed by `(` that is not a known function
    UnknownFunction(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty expression"),
            ParseError::Syntax { position, fragment } if fragment.is_empty() => {
                write!(f, "unexpected end of expression at position {}", position)
            }
            ParseError::Syntax { position, fragment } => {
                write!(f, "invalid syntax at position {}: '{}'", position, fragment)
            }
            ParseError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
        }
    }
}

impl std::error::Error for ParseError {}

/// Converts a decimal literal (`12`, `-0.25`, `.5`, `3.`) into an exact rational.
pub(crate) fn rational_from_decimal_str(text: &str) -> Option<BigRational> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mantissa: BigInt = format!("{}{}", int_part, frac_part).parse().ok()?;
    let mut scale = BigInt::one();
    for _ in 0..frac_part.len() {
        scale *= 10;
    }
    let value = BigRational::new(mantissa, scale);
    Some(if negative { -value } else { value })
}

/// `12`, `2.5`, `3.`, `.5`, optionally with a decimal exponent: `1e3`, `1.5E-2`
fn number(input: &str) -> IResult<&str, Expr> {
    let literal: IResult<&str, (&str, Option<&str>)> = (
        alt((
            recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(preceded(
            one_of("eE"),
            recognize(pair(opt(one_of("+-")), digit1)),
        )),
    )
        .parse(input);
    let (rest, (mantissa, exponent)) = literal?;
    let value = rational_from_decimal_str(mantissa).and_then(|m| match exponent {
        Some(e) => scaled_by_power_of_ten(m, e),
        None => Some(m),
    });
    match value {
        Some(value) => Ok((rest, Expr::Const(value))),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

/// `value * 10^exponent`, `None` for exponents out of range.
fn scaled_by_power_of_ten(value: BigRational, exponent: &str) -> Option<BigRational> {
    let exponent: i32 = exponent.parse().ok()?;
    if exponent.unsigned_abs() > MAX_DECIMAL_EXPONENT {
        return None;
    }
    let power = BigRational::from_integer(num::pow(BigInt::from(10), exponent.unsigned_abs() as usize));
    Some(if exponent < 0 { value / power } else { value * power })
}

fn skip_ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(
        pair(char('('), multispace0),
        expr,
        pair(multispace0, char(')')),
    )
    .parse(input)
}

fn function_call(name: &str, arg: Expr) -> Expr {
    match name {
        "sqrt" => Expr::Sqrt(arg.boxed()),
        "exp" => Expr::Exp(arg.boxed()),
        "ln" | "log" => Expr::Ln(arg.boxed()),
        "sin" => Expr::sin(arg.boxed()),
        "cos" => Expr::cos(arg.boxed()),
        _ => Expr::tg(arg.boxed()),
    }
}

fn name_or_call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    if FUNCTIONS.contains(&name) {
        let (rest, arg) = preceded(multispace0, parenthesized).parse(rest)?;
        return Ok((rest, function_call(name, arg)));
    }
    // a single letter right before '(' is a factor of an implicit product, e.g. x(x + 1)
    if name.chars().count() > 1 && rest.starts_with('(') {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let expr = if name == "I" {
        Expr::ImagUnit
    } else {
        Expr::Var(name.to_string())
    };
    Ok((rest, expr))
}

fn atom(input: &str) -> IResult<&str, Expr> {
    alt((number, name_or_call, parenthesized)).parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) = opt(preceded(
        delimited(multispace0, alt((tag("**"), tag("^"))), multispace0),
        unary,
    ))
    .parse(rest)?;
    match exponent {
        Some(exponent) => Ok((rest, Expr::Pow(base.boxed(), exponent.boxed()))),
        None => Ok((rest, base)),
    }
}

fn unary(input: &str) -> IResult<&str, Expr> {
    if let Ok((rest, _)) = pair(char::<&str, nom::error::Error<&str>>('-'), multispace0).parse(input) {
        let (rest, inner) = unary(rest)?;
        return Ok((rest, inner.negate()));
    }
    if let Ok((rest, _)) = pair(char::<&str, nom::error::Error<&str>>('+'), multispace0).parse(input) {
        return unary(rest);
    }
    power(input)
}

fn product_operator(input: &str) -> IResult<&str, char> {
    alt((terminated(char('*'), not(char('*'))), char('/'))).parse(input)
}

fn implicit_factor(input: &str) -> IResult<&str, Expr> {
    preceded(peek(satisfy(|c| c.is_alphabetic() || c == '(')), power).parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut acc) = unary(input)?;
    loop {
        let (rest, _) = skip_ws(input)?;
        if let Ok((after_op, op)) = product_operator(rest) {
            let (after, rhs) = preceded(multispace0, unary).parse(after_op)?;
            acc = if op == '*' {
                Expr::Mul(acc.boxed(), rhs.boxed())
            } else {
                Expr::Div(acc.boxed(), rhs.boxed())
            };
            input = after;
        } else if let Ok((after, rhs)) = implicit_factor(rest) {
            acc = Expr::Mul(acc.boxed(), rhs.boxed());
            input = after;
        } else {
            return Ok((input, acc));
        }
    }
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut acc) = preceded(multispace0, term).parse(input)?;
    loop {
        let (rest, _) = skip_ws(input)?;
        let Ok((after_op, op)) = alt((char::<&str, nom::error::Error<&str>>('+'), char('-'))).parse(rest) else {
            return Ok((input, acc));
        };
        let (after, rhs) = preceded(multispace0, term).parse(after_op)?;
        acc = if op == '+' {
            Expr::Add(acc.boxed(), rhs.boxed())
        } else {
            Expr::Sub(acc.boxed(), rhs.boxed())
        };
        input = after;
    }
}

/// Parses a whole string into an expression. `**` and `^` are both powers.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let position_of = |rest: &str| input[..input.len() - rest.len()].chars().count();
    match terminated(expr, multispace0).parse(input) {
        Ok((rest, parsed)) if rest.is_empty() => Ok(parsed),
        Ok((rest, _)) => Err(ParseError::Syntax {
            position: position_of(rest),
            fragment: rest.chars().take(12).collect(),
        }),
        Err(nom::Err::Failure(e)) if e.code == nom::error::ErrorKind::Verify => {
            let name = identifier(e.input)
                .map(|(_, name)| name.to_string())
                .unwrap_or_default();
            Err(ParseError::UnknownFunction(name))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::Syntax {
            position: position_of(e.input),
            fragment: e.input.chars().take(12).collect(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax {
            position: input.chars().count(),
            fragment: String::new(),
        }),
    }
}

impl Expr {
    /// Parses user text into an expression, see `parse_expression_func`.
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }
}
