//! Game session: setup handshake and the turn loop

use rand::Rng;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

use super::channel::{ChannelError, TurnChannel};
use super::protocol::{Action, Identity, InboundMsg, Signal, TurnSnapshot};
use crate::game::{TurnController, WorldState};
use crate::util::time::Timer;

/// Counters reported when a game ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turn snapshots answered
    pub turns: u64,
    /// Actions that could not be written
    pub emit_failures: u64,
    /// Inbound lines that could not be understood
    pub skipped_messages: u64,
}

/// Read the identity message and every setup snapshot up to `END_INIT`
pub async fn handshake<R, W>(
    channel: &mut TurnChannel<R, W>,
) -> Result<(Identity, WorldState), SessionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let identity: Identity = match channel.read_message().await? {
        InboundMsg::Message { message } => decode(message)?,
        InboundMsg::Signal(signal) => return Err(SessionError::UnexpectedSignal(signal)),
    };
    info!(tank_id = %identity.tank_id, enemy_id = %identity.enemy_id, "Received tank identity");

    let mut world = WorldState::new();
    loop {
        match channel.read_message().await? {
            InboundMsg::Signal(Signal::EndInit) => break,
            InboundMsg::Signal(signal) => return Err(SessionError::UnexpectedSignal(signal)),
            InboundMsg::Message { message } => {
                let snapshot: TurnSnapshot = decode(message)?;
                world.apply(snapshot);
            }
        }
    }

    if world.is_empty() {
        warn!("Setup carried no map objects");
    }
    info!(objects = world.len(), "Initialization complete");
    Ok((identity, world))
}

/// Answer every turn snapshot with exactly one action until the game ends
pub async fn play<R, W, G>(
    channel: &mut TurnChannel<R, W>,
    controller: &mut TurnController<G>,
) -> Result<SessionSummary, SessionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: Rng,
{
    let mut summary = SessionSummary::default();
    let mut timer = Timer::new();

    loop {
        let message = match channel.read_message().await {
            Ok(InboundMsg::Signal(Signal::End)) => {
                info!("Received end of game signal");
                break;
            }
            Ok(InboundMsg::Signal(Signal::EndInit)) => {
                warn!("Ignoring END_INIT received mid-game");
                continue;
            }
            Ok(InboundMsg::Message { message }) => message,
            Err(ChannelError::Closed) => {
                info!("Game channel closed");
                break;
            }
            Err(ChannelError::Decode(e)) => {
                warn!(error = %e, "Skipping malformed message");
                summary.skipped_messages += 1;
                emit(channel, &Action::idle(), &mut summary).await;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        timer.reset();
        summary.turns += 1;

        let action = match decode::<TurnSnapshot>(message) {
            Ok(snapshot) => {
                controller.apply(snapshot);
                let decision = controller.respond();
                debug!(
                    turn = summary.turns,
                    chosen = ?decision.chosen,
                    considered = decision.considered,
                    walls_in_line = decision.walls_in_line,
                    elapsed_us = timer.elapsed_micros(),
                    "Turn decided"
                );
                decision.action
            }
            Err(e) => {
                warn!(turn = summary.turns, error = %e, "Skipping malformed snapshot");
                summary.skipped_messages += 1;
                Action::idle()
            }
        };

        emit(channel, &action, &mut summary).await;
    }

    info!(
        turns = summary.turns,
        objects = controller.world().len(),
        emit_failures = summary.emit_failures,
        skipped_messages = summary.skipped_messages,
        "Game finished"
    );
    Ok(summary)
}

/// Best-effort write; a failed turn is logged and forgotten
async fn emit<R, W>(
    channel: &mut TurnChannel<R, W>,
    action: &Action,
    summary: &mut SessionSummary,
) where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Err(e) = channel.post_action(action).await {
        warn!(error = %e, "Failed to send action");
        summary.emit_failures += 1;
    }
}

fn decode<T: DeserializeOwned>(message: serde_json::Value) -> Result<T, SessionError> {
    serde_json::from_value(message).map_err(SessionError::Payload)
}

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("Unexpected signal during setup: {0:?}")]
    UnexpectedSignal(Signal),

    #[error("Unexpected message payload: {0}")]
    Payload(#[source] serde_json::Error),
}
