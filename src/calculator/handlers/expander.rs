use crate::calculator::error::CalcError;
use crate::calculator::handlers::{OperationHandler, Outcome, parse_input};
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;
use crate::symbolic::symbolic_engine::Expr;
use num::Signed;

pub const DEFAULT_BINOMIAL: &str = "(x + 2)**5";
const BINOMIAL_THEOREM: &str = "(a + b)^n = \\sum_{k=0}^{n} \\binom{n}{k} a^{n-k}b^k";

#[derive(Debug, Clone, PartialEq)]
pub struct BinomialExpander {
    pub input: String,
}

impl BinomialExpander {
    pub fn new(input: &str) -> Self {
        BinomialExpander {
            input: input.to_string(),
        }
    }
}

/// Sum of the terms, subtracting the negative ones.
fn sum_of(terms: &[Expr]) -> Option<Expr> {
    let (first, rest) = terms.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, term| match term.negated() {
        Some(pos) => Expr::Sub(acc.boxed(), pos.boxed()),
        None => Expr::Add(acc.boxed(), term.clone().boxed()),
    }))
}

impl OperationHandler for BinomialExpander {
    fn operation(&self) -> Operation {
        Operation::Expander
    }

    fn run(&self) -> Result<Outcome, CalcError> {
        let binomial = parse_input(&self.input)?;
        let expanded = binomial.expand()?;

        let mut report = Report::new();
        report.heading("Expanded Form").math(
            &format!("{} = {}", binomial.to_latex(), expanded.to_latex()),
            &format!("{} = {}", binomial, expanded),
        );
        let power = binomial
            .as_integer_power()
            .filter(|(base, n)| n.is_positive() && !base.extract_variables().is_empty());
        if let Some((base, n)) = power {
            report
                .heading("Binomial Theorem Steps")
                .math(BINOMIAL_THEOREM, "(a + b)**n = sum(binomial(n, k)*a**(n - k)*b**k, k = 0..n)");
            let terms = base.summands();
            if let (Some(a), Some(b)) = (terms.first(), sum_of(&terms[1.min(terms.len())..])) {
                report.math(
                    &format!(
                        "\\text{{Here }} a = {}, \\ b = {}, \\ n = {}",
                        a.to_latex(),
                        b.to_latex(),
                        n
                    ),
                    &format!("Here a = {}, b = {}, n = {}", a, b, n),
                );
            }
        }
        Ok(Outcome::new(
            self.operation(),
            report,
            &binomial.to_latex(),
            &expanded.to_latex(),
        ))
    }
}
