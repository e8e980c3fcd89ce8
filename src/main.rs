//! Taskfile - inspect resolved Taskfiles

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = taskfile::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
