//! Line-oriented stdin front end standing in for the host window system.
//!
//! Each line is parsed into a [`ConsoleCommand`] and dispatched to the same command
//! functions a GUI shell would call.

pub mod parser;

pub use parser::{parse_command, ConsoleCommand, ParseError, HELP};

use anyhow::Result;
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::overlay::{commands, GestureAction};
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands until `quit` or end of input, then tears everything down.
pub async fn run_console<R>(state: &AppState, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    println!("{HELP}");

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(command) => {
                if dispatch(state, command).await == Flow::Quit {
                    break;
                }
            }
            Err(ParseError::Empty) => {}
            Err(ParseError::Unknown(word)) => println!("unknown command `{word}` (try `help`)"),
            Err(ParseError::Usage(usage)) => println!("usage: {usage}"),
        }
    }

    shutdown(state).await;
    Ok(())
}

pub async fn dispatch(state: &AppState, command: ConsoleCommand) -> Flow {
    match command {
        ConsoleCommand::StartOverlay => match commands::start_overlay(state).await {
            Ok(snapshot) => print_json(&snapshot),
            Err(err) => {
                println!("cannot start overlay: {err}");
                commands::request_overlay_permission(state);
            }
        },
        ConsoleCommand::StopOverlay => match commands::stop_overlay(state).await {
            Ok(snapshot) => print_json(&snapshot),
            Err(err) => println!("cannot stop overlay: {err}"),
        },
        ConsoleCommand::RequestPermission => {
            if commands::request_overlay_permission(state) {
                println!("overlay permission already granted");
            }
        }
        ConsoleCommand::GrantPermission => state.capability.grant(),
        ConsoleCommand::Pointer { phase, x, y } => {
            match commands::pointer_event(state, phase, x, y).await {
                Ok(GestureAction::None) => {}
                Ok(action) => println!("{action:?}"),
                Err(err) => println!("{err}"),
            }
        }
        ConsoleCommand::Tap { x, y } => match commands::tap(state, x, y).await {
            Ok(action) => println!("{action:?}"),
            Err(err) => println!("{err}"),
        },
        ConsoleCommand::ToggleVisibility { visible } => {
            let wants_toggle = visible.map_or(true, |v| v != state.screen.is_visible());
            let view = if wants_toggle {
                commands::toggle_temperature_visibility(state)
            } else {
                commands::get_screen_view(state)
            };
            println!("{view}");
        }
        ConsoleCommand::KeepScreenOn(keep_on) => {
            match commands::set_keep_screen_on(state, keep_on) {
                Ok(view) => println!("{view}"),
                Err(err) => {
                    warn!("Failed to persist keep-screen-on preference: {err}");
                    println!("{}", commands::get_screen_view(state));
                }
            }
        }
        ConsoleCommand::Status => {
            print_json(&commands::get_overlay_state(state));
            println!("{}", commands::get_screen_view(state));
        }
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

async fn shutdown(state: &AppState) {
    info!("Shutting down");
    state.overlay.deactivate().await;
    if let Err(err) = state.screen.stop().await {
        warn!("Temperature panel sampling did not stop cleanly: {err:#}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => warn!("Failed to serialise status: {err}"),
    }
}
