#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("2x^2 + 3(x - 1)").unwrap();
/// assert_eq!(parsed_expression.to_string(), "2*x**2 + 3*(x - 1)");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// the expression tree: construction, plain-text printing and numeric evaluation
///# Example#
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("x**2 - 1").unwrap();
/// let vars = expr.extract_variables();
/// assert_eq!(vars, vec!["x".to_string()]);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// simplification and expansion through the rational function normal form
/// Example#
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("(x + 1)**2 - (x - 1)**2").unwrap();
/// assert_eq!(expr.simplify_().unwrap().to_string(), "4*x");
/// let expr = Expr::parse_expression("(x + 2)**3").unwrap();
/// assert_eq!(expr.expand().unwrap().to_string(), "x**3 + 6*x**2 + 12*x + 8");
/// ```
pub mod symbolic_simplify;
/// sparse multivariate polynomials with exact rational coefficients
pub mod symbolic_polynomial;
/// quotients of polynomials, conversion from expression trees, cancellation
pub mod symbolic_rational;
/// factoring over the rationals
/// Example#
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("x**3 - 2*x**2 - 5*x + 6").unwrap();
/// assert_eq!(expr.factor().unwrap().to_string(), "(x - 3)*(x - 1)*(x + 2)");
/// ```
pub mod symbolic_factor;
/// roots of univariate equations and exact linear systems
/// Example#
/// ```
/// use algebra_calc::symbolic::symbolic_engine::Expr;
/// use algebra_calc::symbolic::symbolic_solve::{Equation, solve_linear_system};
/// let eqs = vec![
///     Equation::new(Expr::parse_expression("x + y").unwrap(), Expr::integer(2)),
///     Equation::new(Expr::parse_expression("2x - y").unwrap(), Expr::integer(1)),
/// ];
/// let solution = solve_linear_system(&eqs, &["x", "y"]).unwrap().unwrap();
/// assert_eq!(solution[0].1, Expr::integer(1));
/// ```
pub mod symbolic_solve;
///______________________________________________________________________________________________________________________________________________
/// LaTeX output
/// _____________________________________________________________________________________________________________________________________________
pub mod symbolic_latex;
