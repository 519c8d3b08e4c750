use std::process::ExitCode;

use brand_pulse::{logging, report, run, AnalysisConfig};
use tracing::error;

fn main() -> ExitCode {
    logging::init_tracing();

    let config = AnalysisConfig::default();
    match run(&config) {
        Ok(analysis) => {
            print!("{}", report::render_console(&analysis, &config));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "analysis failed");
            eprintln!("brand-pulse: {err}");
            ExitCode::FAILURE
        }
    }
}
