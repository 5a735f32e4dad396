mod cli;
pub mod commands;

use startup_risk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
