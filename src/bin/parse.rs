use clap::Parser;
use javelin::parse;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
enum CommandError {
    #[error("I/O error")]
    Io(
        #[from]
        #[source]
        std::io::Error,
    ),
    #[error("JSON error")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    #[error("Detected one or more errors")]
    HasError,
}

fn main() -> Result<(), CommandError> {
    let cli = Cli::parse();
    let mut has_error = false;
    for file in &cli.files {
        let source = std::fs::read(file)?;
        match parse(&source) {
            Ok(unit) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&unit)?);
                }
            }
            Err(error) => {
                has_error = true;
                let start = error.location().start;
                eprintln!(
                    "{}:{}:{}: {}",
                    file.display(),
                    start.line,
                    start.column,
                    error
                );
            }
        }
    }
    if has_error {
        return Err(CommandError::HasError);
    }
    Ok(())
}

#[derive(Debug, Parser)]
struct Cli {
    files: Vec<PathBuf>,
    /// Print the syntax tree of each file as JSON.
    #[clap(long)]
    json: bool,
}
