mod application;
mod presentation;

use application::Outcome;
use std::process::ExitCode;

fn main() -> ExitCode {
    match application::run() {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::error!("{e}");
            if e.is_hash_mismatch() {
                Outcome::Mismatch.exit_code()
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
