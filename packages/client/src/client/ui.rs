//! Terminal helpers shared by the session and the account commands.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::error::ClientError;

/// Prompt shown by the line editor
pub fn prompt_for(name: &str) -> String {
    format!("{}> ", name)
}

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Print output that arrived while the user may be typing
pub fn print_above_prompt(text: &str, prompt: &str) {
    if text.is_empty() {
        return;
    }
    print!("{}", text);
    redisplay_prompt(prompt);
}

/// Print output that continues on the next event, without the prompt
pub fn print_partial(text: &str) {
    print!("{}", text);
    std::io::stdout().flush().ok();
}

/// Spawn the blocking line editor on its own thread.
///
/// Non-empty lines are forwarded on the returned channel. The channel closes
/// on Ctrl+C, Ctrl+D or a terminal error.
pub fn spawn_line_reader(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        // passwords typed after /delete stay out of the history
                        if !line.starts_with("/delete") {
                            rl.add_history_entry(line).ok();
                        }
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Read one line from the terminal, used by the account commands
pub fn read_line(prompt: &str) -> Result<String, ClientError> {
    let mut rl = DefaultEditor::new().map_err(|e| ClientError::Terminal(e.to_string()))?;
    match rl.readline(prompt) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            Err(ClientError::Terminal("input cancelled".to_string()))
        }
        Err(e) => Err(ClientError::Terminal(e.to_string())),
    }
}
