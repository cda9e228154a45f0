//! Form-driven algebra calculator: five operations over the symbolic engine and a
//! session history.
//!
//!# Example
//! ```
//! use algebra_calc::calculator::config::CalcConfig;
//! use algebra_calc::calculator::dispatcher::Dispatcher;
//! use algebra_calc::calculator::handlers::{Handler, Simplifier};
//! let mut dispatcher = Dispatcher::new(CalcConfig::default());
//! let handler: Handler = Simplifier::new("(x + 1)**2 - (x - 1)**2").into();
//! let report = dispatcher.dispatch(&handler).unwrap();
//! assert_eq!(report.latex_blocks()[0], "\\left(x + 1\\right)^{2} - \\left(x - 1\\right)^{2} \\Rightarrow 4 x");
//! assert_eq!(dispatcher.session().ledger().len(), 1);
//! ```
/// errors reported to the user
pub mod error;
/// the operation menu
pub mod operations;
/// display blocks and decimal approximations
pub mod report;
/// append-only history of successful calculations
pub mod history;
/// operation handlers behind a common trait
pub mod handlers;
/// prompted form fields with defaults
pub mod form;
/// settings document
pub mod config;
/// selection, dispatch and the session state
pub mod dispatcher;
/// terminal front end
pub mod repl;
