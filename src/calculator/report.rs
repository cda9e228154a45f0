//! Display output of one operation: an ordered list of blocks printed to the terminal.
use crate::symbolic::symbolic_solve::format_complex;
pub use crate::symbolic::symbolic_solve::significant;
use num_complex::Complex64;
use strum_macros::{Display, EnumString};

/// How math blocks are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum OutputMode {
    #[default]
    #[strum(serialize = "latex")]
    Latex,
    #[strum(serialize = "plain")]
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Text(String),
    Math { latex: String, plain: String },
    Caption(String),
    Success(String),
    Info(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    blocks: Vec<Block>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn heading(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Heading(text.to_string()));
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Text(text.to_string()));
        self
    }

    pub fn math(&mut self, latex: &str, plain: &str) -> &mut Self {
        self.blocks.push(Block::Math {
            latex: latex.to_string(),
            plain: plain.to_string(),
        });
        self
    }

    pub fn caption(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Caption(text.to_string()));
        self
    }

    pub fn success(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Success(text.to_string()));
        self
    }

    pub fn info(&mut self, text: &str) -> &mut Self {
        self.blocks.push(Block::Info(text.to_string()));
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// All LaTeX sources of the math blocks, in order.
    pub fn latex_blocks(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Math { latex, .. } => Some(latex.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.blocks.iter().any(|block| match block {
            Block::Heading(s) | Block::Text(s) | Block::Caption(s) | Block::Success(s) | Block::Info(s) => {
                s.contains(needle)
            }
            Block::Math { latex, plain } => latex.contains(needle) || plain.contains(needle),
        })
    }

    pub fn render(&self, mode: OutputMode) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    lines.push(String::new());
                    lines.push(text.clone());
                    lines.push("-".repeat(text.chars().count()));
                }
                Block::Text(text) => lines.push(text.clone()),
                Block::Math { latex, plain } => match mode {
                    OutputMode::Latex => lines.push(format!("    $$ {} $$", latex)),
                    OutputMode::Plain => lines.push(format!("    {}", plain)),
                },
                Block::Caption(text) => lines.push(format!("    {}", text)),
                Block::Success(text) => lines.push(format!("[ok] {}", text)),
                Block::Info(text) => lines.push(format!("[info] {}", text)),
            }
        }
        lines.join("\n")
    }
}

/// Decimal approximation of a possibly complex value, e.g. `-0.50000 + 0.86603*I`.
pub fn approximate(value: Complex64, digits: usize) -> String {
    format_complex(value, digits, "*I")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_significant() {
        assert_eq!(significant(2.0, 5), "2.0000");
        assert_eq!(significant(-1.41421356, 5), "-1.4142");
        assert_eq!(significant(0.5, 5), "0.50000");
        assert_eq!(significant(123.456, 5), "123.46");
        assert_eq!(significant(9.999999, 5), "10.000");
        assert_eq!(significant(0.0, 3), "0.00");
        assert_eq!(significant(123456.0, 3), "123456");
        assert_eq!(significant(0.00001234, 3), "1.23e-5");
    }

    #[test]
    fn test_approximate_complex() {
        assert_eq!(approximate(Complex64::new(2.0, 0.0), 5), "2.0000");
        assert_eq!(
            approximate(Complex64::new(-0.5, 3f64.sqrt() / 2.0), 5),
            "-0.50000 + 0.86603*I"
        );
        assert_eq!(approximate(Complex64::new(0.0, -1.0), 5), "-1.0000*I");
        assert_eq!(approximate(Complex64::new(1.0, 1e-16), 5), "1.0000");
    }

    #[test]
    fn test_render_modes() {
        let mut report = Report::new();
        report
            .heading("Solutions")
            .math("x_{1} = \\frac{1}{2}", "x_1 = 1/2")
            .caption("Decimal approximation: ≈ 0.50000")
            .success("Solution Found!")
            .info("hint");
        let latex = report.render(OutputMode::Latex);
        assert!(latex.contains("Solutions\n---------"));
        assert!(latex.contains("$$ x_{1} = \\frac{1}{2} $$"));
        assert!(latex.contains("[ok] Solution Found!"));
        assert!(latex.contains("[info] hint"));
        let plain = report.render(OutputMode::Plain);
        assert!(plain.contains("    x_1 = 1/2"));
        assert!(!plain.contains("\\frac"));
        assert_eq!(report.latex_blocks(), vec!["x_{1} = \\frac{1}{2}"]);
        assert!(report.contains_text("0.50000"));
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!(OutputMode::from_str("latex").unwrap(), OutputMode::Latex);
        assert_eq!(OutputMode::from_str("Plain").unwrap(), OutputMode::Plain);
        assert!(OutputMode::from_str("html").is_err());
        assert_eq!(OutputMode::default().to_string(), "latex");
    }
}
