use flowpilot::error::{validation_error, Error};
use flowpilot::startup;
use std::io::Read;
use tracing::info;

const USAGE: &str = "Usage: flowpilot [--dry-run] <command...>

Interprets a natural-language calendar command and applies it, e.g.
  flowpilot create lunch with Sam tomorrow at noon for an hour
Reads the command from stdin when none is given.

Options:
  --dry-run   Print the interpreted intent without touching the calendar
  -h, --help  Show this message";

#[tokio::main]
async fn main() -> miette::Result<()> {
    let mut dry_run = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => words.push(arg),
        }
    }

    // Initialize logging
    startup::init_logging()?;

    let utterance = if words.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input).map_err(Error::from)?;
        input.trim().to_string()
    } else {
        words.join(" ")
    };
    if utterance.is_empty() {
        return Err(validation_error("No text provided").into());
    }

    info!("Starting FlowPilot");

    // Load configuration
    let config = startup::load_config()?;
    let agent = startup::build_agent(&config)?;

    let output = if dry_run {
        serde_json::to_string_pretty(&agent.interpret(&utterance).await?)
    } else {
        serde_json::to_string_pretty(&agent.interpret_and_execute(&utterance).await?)
    }
    .map_err(Error::from)?;

    println!("{}", output);
    Ok(())
}
