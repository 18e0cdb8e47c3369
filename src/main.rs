use clap::Parser;
use hunk_record::{ExternalEditor, Recorder, StdPrompter, ensure_interactive};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hunk-record")]
#[command(about = "Interactively select hunks of your working changes and commit them")]
struct Cli {
    /// Commit message for the recorded changes
    #[arg(short, long)]
    message: String,

    /// Repository to operate on
    #[arg(long, default_value = ".")]
    repo: String,

    /// Limit the session to these paths
    paths: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = ensure_interactive().and_then(|()| {
        Recorder::new(&cli.repo).record(
            &cli.message,
            &cli.paths,
            &mut StdPrompter,
            &mut ExternalEditor,
        )
    });

    match result {
        Ok(split) => {
            println!("recorded changes to {} file(s)", split.committed.files.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("abort: {e}");
            ExitCode::FAILURE
        }
    }
}
