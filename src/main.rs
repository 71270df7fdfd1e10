//! Party Roster - Local-first adventuring party manager

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = party_roster::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
