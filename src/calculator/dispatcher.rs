//! Routes the selected operation to its handler and keeps the session history.
use crate::calculator::config::CalcConfig;
use crate::calculator::error::CalcError;
use crate::calculator::form::{LineSource, collect};
use crate::calculator::handlers::{Handler, OperationHandler, Outcome};
use crate::calculator::history::{HistoryEntry, HistoryLedger};
use crate::calculator::operations::Operation;
use crate::calculator::report::Report;
use log::{info, warn};

/// State that lives as long as the session: the ledger and the current selection.
#[derive(Debug, Clone, Default)]
pub struct Session {
    ledger: HistoryLedger,
    selection: Operation,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn selection(&self) -> Operation {
        self.selection
    }

    pub fn select(&mut self, operation: Operation) {
        self.selection = operation;
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.ledger.push(entry);
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    session: Session,
    config: CalcConfig,
}

impl Dispatcher {
    pub fn new(config: CalcConfig) -> Self {
        Dispatcher {
            session: Session::new(),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn select(&mut self, operation: Operation) {
        info!("selected {}", operation);
        self.session.select(operation);
    }

    /// Runs one handler. History grows only when the handler succeeds.
    pub fn dispatch(&mut self, handler: &Handler) -> Result<Report, CalcError> {
        let operation = handler.operation();
        info!("running {}", operation);
        match handler.run() {
            Ok(Outcome { report, entry }) => {
                info!("{} succeeded: {} -> {}", operation, entry.problem, entry.solution);
                self.session.record(entry);
                Ok(report)
            }
            Err(err) => {
                warn!("{} failed: {}", operation, err);
                Err(err)
            }
        }
    }

    /// Fills in the form of the selected operation, runs it and renders the result
    /// (or the error) followed by the history sidebar.
    pub fn run_selected(&mut self, src: &mut dyn LineSource) -> String {
        let operation = self.session.selection();
        let report = match collect(operation, src, self.config.display.precision) {
            Ok(handler) => match self.dispatch(&handler) {
                Ok(report) => report,
                Err(err) => error_report(&err, handler.error_hint(&err)),
            },
            Err(err) => {
                warn!("{} input rejected: {}", operation, err);
                error_report(&err, None)
            }
        };
        let rendered = report.render(self.config.display.output);
        let sidebar = self.history_view(false);
        if sidebar.is_empty() {
            rendered
        } else {
            format!("{}\n\n{}", rendered, sidebar)
        }
    }

    /// The windowed sidebar, or the whole ledger as a table.
    pub fn history_view(&self, all: bool) -> String {
        let ledger = self.session.ledger();
        if all {
            format!("All calculations ({})\n{}", ledger.len(), ledger.table())
        } else {
            ledger.sidebar(self.config.display.history_window)
        }
    }
}

fn error_report(err: &CalcError, hint: Option<&str>) -> Report {
    let mut report = Report::new();
    report.text(&err.to_string());
    if let Some(hint) = hint {
        report.info(hint);
    }
    report
}
