//! Command-line entry point: runs the catalog contract checks and exits non-zero on the first failure.

mod cli;

use std::process::ExitCode;

use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();
    env_logger::init();

    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Check run aborted: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
