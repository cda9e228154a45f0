use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// The five calculator operations, displayed under their menu names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Operation {
    #[default]
    #[strum(to_string = "Quadratic Equation Solver")]
    Quadratic,
    #[strum(to_string = "Expression Simplifier")]
    Simplifier,
    #[strum(to_string = "Polynomial Factorizer")]
    Factorizer,
    #[strum(to_string = "Binomial Expander")]
    Expander,
    #[strum(to_string = "System of Equations Solver")]
    SystemSolver,
}

impl Operation {
    /// Shorter name recorded in the history ledger.
    pub fn history_name(&self) -> &'static str {
        match self {
            Operation::Quadratic => "Quadratic Solver",
            Operation::Simplifier => "Simplifier",
            Operation::Factorizer => "Factorizer",
            Operation::Expander => "Binomial Expander",
            Operation::SystemSolver => "System Solver",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Operation::Quadratic => &["quadratic", "quad"],
            Operation::Simplifier => &["simplify", "simplifier"],
            Operation::Factorizer => &["factor", "factorizer"],
            Operation::Expander => &["expand", "expander", "binomial"],
            Operation::SystemSolver => &["system", "linear", "solve"],
        }
    }

    /// Resolves a menu number (1-based), a menu or history name, or a short alias.
    pub fn from_selector(selector: &str) -> Option<Operation> {
        let selector = selector.trim();
        if let Ok(n) = selector.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Operation::iter().nth(i));
        }
        let lower = selector.to_lowercase();
        Operation::iter().find(|op| {
            op.to_string().to_lowercase() == lower
                || op.history_name().to_lowercase() == lower
                || op.aliases().contains(&lower.as_str())
        })
    }

    /// Numbered menu, one operation per line.
    pub fn menu() -> String {
        Operation::iter()
            .enumerate()
            .map(|(i, op)| format!("{}. {}", i + 1, op))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
