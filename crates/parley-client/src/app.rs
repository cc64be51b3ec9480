//! Terminal session loop.
//!
//! One task owns the controller and reacts to stdin lines and channel events
//! one at a time, the way a browser dispatches DOM and socket callbacks.

use std::io::{self, Stdout};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use parley_shared::derive_endpoint;

use crate::commands::UiAction;
use crate::config::ClientConfig;
use crate::display::TerminalDisplay;
use crate::events::{event_queue, ChannelEventKind, EventReceiver};
use crate::session::ChatController;
use crate::transport::WsConnector;

/// How long to wait for the closing handshake when the user quits.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

type TerminalController = ChatController<WsConnector, TerminalDisplay<Stdout>>;

/// Run the interactive client until the user quits, stdin ends, or Ctrl+C.
pub async fn run_session(config: ClientConfig) -> anyhow::Result<()> {
    let endpoint = derive_endpoint(&config.page_url)?;
    info!(page = %config.page_url, endpoint = %endpoint, "Chat endpoint derived");

    let (events_tx, mut events) = event_queue();
    let mut controller = ChatController::new(
        endpoint,
        WsConnector::new(events_tx),
        TerminalDisplay::new(std::io::stdout()),
    );
    controller.display_mut().show_help();

    if config.auto_connect {
        controller.connect();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                if !apply_action(&mut controller, input_action(line)) {
                    break;
                }
            }
            Some(event) = events.recv() => controller.handle_event(event),
            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    if controller.has_channel() {
        controller.disconnect();
        drain_until_closed(&mut controller, &mut events).await;
    }

    Ok(())
}

/// Map one read from stdin to an action. End of input and read failures
/// both quit, so the session still shuts down through the normal path.
fn input_action(line: io::Result<Option<String>>) -> UiAction {
    match line {
        Ok(Some(line)) => UiAction::parse(&line),
        Ok(None) => {
            debug!("Input closed");
            UiAction::Quit
        }
        Err(e) => {
            warn!(error = %e, "Failed to read input");
            UiAction::Quit
        }
    }
}

/// Returns false when the user asked to quit.
fn apply_action(controller: &mut TerminalController, action: UiAction) -> bool {
    match action {
        UiAction::Connect => controller.connect(),
        UiAction::Disconnect => controller.disconnect(),
        UiAction::Send(text) => {
            let outcome = controller.send_chat(&text);
            debug!(?outcome, "Send action handled");
        }
        UiAction::Help => controller.display_mut().show_help(),
        UiAction::Quit => return false,
    }
    true
}

/// Let the closing handshake finish so the server sees a clean close.
async fn drain_until_closed(controller: &mut TerminalController, events: &mut EventReceiver) {
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while let Some(event) = events.recv().await {
            let closed = event.kind == ChannelEventKind::Closed;
            controller.handle_event(event);
            if closed {
                break;
            }
        }
    })
    .await;

    if drained.is_err() {
        debug!("Closing handshake did not finish in time");
    }
}
