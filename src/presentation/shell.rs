// Interactive shell - reads commands from stdin, prints board changes
use crate::application::output_board::BoardUpdate;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::parse_line;
use crate::presentation::handlers::{handle, Reply};
use crate::presentation::render::format_update;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Prints every region and modal change as it happens, so results from
/// background dispatches show up between prompts.
pub fn spawn_printer(mut updates: mpsc::UnboundedReceiver<BoardUpdate>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            println!("{}", format_update(&update));
        }
    })
}

pub async fn run_shell(state: AppState) -> anyhow::Result<()> {
    println!(
        "{} panels ready. Type `help` for commands, `list` for panels.",
        state.grid.panels().len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                // clap renders help and usage errors itself
                println!("{}", e.render());
                continue;
            }
        };

        match handle(&state, command) {
            Reply::Lines(out) => {
                for line in out {
                    println!("{}", line);
                }
            }
            Reply::Dispatched(_) => {}
            Reply::Quit => break,
        }
    }

    tracing::info!("Shell closed");
    Ok(())
}
