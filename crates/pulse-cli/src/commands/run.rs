//! Interactive run command.

use anyhow::{Context, Result};
use colored::Colorize;
use pulse_gateway::{GatewayClient, GatewayConfig, GatewayEvent, Severity};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::formatter;
use crate::repl::{self, HELP, ReplCommand};
use crate::theme::Theme;

/// Run the client until `quit`, end of input, or Ctrl+C.
pub(crate) async fn run_client(config: GatewayConfig, token: Option<String>) -> Result<()> {
    println!("{}", "Starting Pulse...".cyan().bold());
    println!("  Gateway: {}", config.endpoint().yellow());
    println!(
        "  Reconnect: {}",
        if config.reconnect.is_enabled() {
            format!("after {} ms", config.reconnect.delay().as_millis()).green()
        } else {
            "disabled".red()
        }
    );
    println!("{}", Theme::dimmed("Type 'help' for commands."));

    let client = GatewayClient::spawn(config);
    let mut events = client.subscribe();

    match token {
        Some(token) => client.connect(token).await.context("failed to start connecting")?,
        None => println!(
            "{}",
            Theme::severity(Severity::Info, "no token configured; use 'connect <token>'")
        ),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification stream lagged");
                },
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if !execute(&client, &line).await {
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            },
        }
    }

    // The actor may already be gone; nothing left to report either way.
    let _ = client.shutdown().await;
    println!("{}", Theme::dimmed("bye"));
    Ok(())
}

fn print_event(event: &GatewayEvent) {
    println!("{}", formatter::event_line(event));
}

/// Run one input line. Returns `false` when the loop should stop.
async fn execute(client: &GatewayClient, line: &str) -> bool {
    let command = match repl::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(message) => {
            println!("{}", Theme::severity(Severity::Error, &message));
            return true;
        },
    };

    let result = match command {
        ReplCommand::Connect(token) => client.connect(token).await,
        ReplCommand::Disconnect => client.disconnect().await,
        ReplCommand::Activity {
            kind,
            name,
            details,
            state,
        } => {
            client
                .set_activity(kind, &name, details.as_deref(), state.as_deref())
                .await
        },
        ReplCommand::Clear => client.clear_activity().await,
        ReplCommand::Status => client.snapshot().await.map(|snapshot| {
            println!("{}", formatter::snapshot_report(&snapshot));
        }),
        ReplCommand::Help => {
            println!("{HELP}");
            Ok(())
        },
        ReplCommand::Quit => return false,
    };

    if let Err(e) = result {
        println!("{}", Theme::severity(Severity::Error, &e.to_string()));
    }
    true
}
