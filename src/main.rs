use algebra_calc::Utils::logger::init_logger;
use algebra_calc::calculator::config::CalcConfig;
use algebra_calc::calculator::dispatcher::Dispatcher;
use algebra_calc::calculator::repl::run_repl;
use log::info;
use std::env;
use std::error::Error;
use std::path::Path;

/// algebra_calc [CONFIG_PATH]
fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => CalcConfig::load(Path::new(&path))?,
        None => CalcConfig::default(),
    };
    if let Some(log_file) = init_logger(&config.logging)? {
        info!("writing log to {}", log_file);
    }
    let mut dispatcher = Dispatcher::new(config);
    run_repl(&mut dispatcher)?;
    info!("session ended after {} calculations", dispatcher.session().ledger().len());
    Ok(())
}
