//! # Player Control Path
//!
//! A single task owns the host [`PlaybackEngine`] and applies commands to it
//! one at a time. Everything that mutates queue position or transport state,
//! including the resolver's fallback skip, is sent here as a
//! [`PlayerCommand`]; nothing else ever touches the engine.

use crate::error::{PlaybackError, Result};
use bridge_traits::playback::PlaybackEngine;
use core_async::select;
use core_async::sync::{mpsc, oneshot, CancellationToken};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use std::fmt;
use std::io;
use tracing::{debug, error, info, instrument, warn};

/// Completion signal for a command.
pub type CommandReply = oneshot::Sender<Result<()>>;

/// Commands accepted by the control path.
pub enum PlayerCommand {
    /// (Re)prepare the engine for the current entry.
    Prepare { reply: Option<CommandReply> },
    /// Start or resume playback.
    Play { reply: Option<CommandReply> },
    /// User-initiated skip. A no-op when the queue has no next entry.
    SkipToNext { reply: Option<CommandReply> },
    /// Fallback for a track whose address could not be resolved.
    ///
    /// Advances, prepares and plays when a next entry exists. Otherwise
    /// fails with an I/O error of kind `NotFound`.
    SkipUnresolvable {
        track_id: u64,
        reply: Option<CommandReply>,
    },
}

impl PlayerCommand {
    fn name(&self) -> &'static str {
        match self {
            PlayerCommand::Prepare { .. } => "prepare",
            PlayerCommand::Play { .. } => "play",
            PlayerCommand::SkipToNext { .. } => "skip_to_next",
            PlayerCommand::SkipUnresolvable { .. } => "skip_unresolvable",
        }
    }
}

impl fmt::Debug for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::SkipUnresolvable { track_id, .. } => f
                .debug_struct("SkipUnresolvable")
                .field("track_id", track_id)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

// ============================================================================
// ControlHandle
// ============================================================================

/// Cloneable send side of the control path.
#[derive(Clone)]
pub struct ControlHandle {
    sender: mpsc::UnboundedSender<PlayerCommand>,
}

impl ControlHandle {
    /// Enqueue a command without waiting for it to run.
    ///
    /// Never blocks, so it is safe to call from the engine's loading thread.
    pub fn send(&self, command: PlayerCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| PlaybackError::ControlPathClosed)
    }

    /// Schedule the fallback skip for an unresolvable track.
    pub fn schedule_skip_unresolvable(&self, track_id: u64) -> Result<()> {
        self.send(PlayerCommand::SkipUnresolvable {
            track_id,
            reply: None,
        })
    }

    pub async fn prepare(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::Prepare { reply: Some(reply) })
            .await
    }

    pub async fn play(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::Play { reply: Some(reply) })
            .await
    }

    pub async fn skip_to_next(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::SkipToNext { reply: Some(reply) })
            .await
    }

    /// Run the fallback skip and wait for its outcome.
    pub async fn skip_unresolvable(&self, track_id: u64) -> Result<()> {
        self.request(|reply| PlayerCommand::SkipUnresolvable {
            track_id,
            reply: Some(reply),
        })
        .await
    }

    /// Whether the control task has stopped accepting commands.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<F>(&self, build: F) -> Result<()>
    where
        F: FnOnce(CommandReply) -> PlayerCommand,
    {
        let (reply, outcome) = oneshot::channel();
        self.send(build(reply))?;
        outcome
            .await
            .map_err(|_| PlaybackError::ControlPathClosed)?
    }
}

impl fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// PlayerController
// ============================================================================

/// Owner of the engine; consumes commands until cancelled.
pub struct PlayerController {
    engine: Box<dyn PlaybackEngine>,
    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    events: EventBus,
    cancel: CancellationToken,
}

impl PlayerController {
    pub fn new(
        engine: Box<dyn PlaybackEngine>,
        events: EventBus,
        cancel: CancellationToken,
    ) -> (Self, ControlHandle) {
        let (sender, commands) = mpsc::unbounded_channel();
        let controller = Self {
            engine,
            commands,
            events,
            cancel,
        };
        (controller, ControlHandle { sender })
    }

    /// Process commands until the token is cancelled or every
    /// [`ControlHandle`] is dropped.
    ///
    /// Cancellation is checked before each command, so nothing queued runs
    /// after teardown. Pending replies are dropped, which their waiters
    /// observe as [`PlaybackError::ControlPathClosed`].
    pub async fn run(mut self) {
        info!("Player controller started");

        loop {
            let command = select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Player controller cancelled");
                    break;
                }
                command = self.commands.recv() => match command {
                    Some(command) => command,
                    None => {
                        debug!("All control handles dropped");
                        break;
                    }
                },
            };

            self.handle(command);
        }

        self.commands.close();
        info!("Player controller stopped");
    }

    fn handle(&mut self, command: PlayerCommand) {
        debug!(command = ?command, "Handling player command");

        let (outcome, reply) = match command {
            PlayerCommand::Prepare { reply } => (self.run_engine(None, |e| e.prepare()), reply),
            PlayerCommand::Play { reply } => (self.run_engine(None, |e| e.play()), reply),
            PlayerCommand::SkipToNext { reply } => (self.skip_to_next(), reply),
            PlayerCommand::SkipUnresolvable { track_id, reply } => {
                (self.skip_unresolvable(track_id), reply)
            }
        };

        if let Some(reply) = reply {
            // The requester may have given up waiting.
            reply.send(outcome).ok();
        }
    }

    fn skip_to_next(&mut self) -> Result<()> {
        if !self.engine.has_next_entry() {
            debug!("Skip requested at end of queue");
            return Ok(());
        }

        self.advance_and_play(None)?;
        self.emit(PlaybackEvent::TrackSkipped {
            track_id: None,
            reason: "skipped by user".to_string(),
        });
        Ok(())
    }

    #[instrument(skip(self))]
    fn skip_unresolvable(&mut self, track_id: u64) -> Result<()> {
        if !self.engine.has_next_entry() {
            let message = format!(
                "track {} has no playable url and the queue has no next entry",
                track_id
            );
            error!(track_id, "Queue exhausted by unresolvable track");
            self.emit(PlaybackEvent::Error {
                track_id: Some(track_id),
                message: message.clone(),
                recoverable: false,
            });
            self.emit(PlaybackEvent::QueueExhausted { track_id });
            return Err(PlaybackError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                message,
            )));
        }

        self.advance_and_play(Some(track_id))?;
        info!(track_id, "Skipped unresolvable track");
        self.emit(PlaybackEvent::TrackSkipped {
            track_id: Some(track_id),
            reason: "no playable url".to_string(),
        });
        Ok(())
    }

    fn advance_and_play(&mut self, track_id: Option<u64>) -> Result<()> {
        self.run_engine(track_id, |e| e.advance_to_next())?;
        self.run_engine(track_id, |e| e.prepare())?;
        self.run_engine(track_id, |e| e.play())
    }

    fn run_engine<F>(&mut self, track_id: Option<u64>, op: F) -> Result<()>
    where
        F: FnOnce(&mut dyn PlaybackEngine) -> bridge_traits::error::Result<()>,
    {
        op(self.engine.as_mut()).map_err(|err| {
            warn!(error = %err, "Engine command failed");
            self.emit(PlaybackEvent::Error {
                track_id,
                message: err.to_string(),
                recoverable: true,
            });
            PlaybackError::Engine(err)
        })
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine.
        self.events.emit(CoreEvent::Playback(event)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[derive(Default)]
    struct StubEngine {
        has_next: bool,
        calls: Vec<&'static str>,
    }

    impl PlaybackEngine for StubEngine {
        fn has_next_entry(&self) -> bool {
            self.has_next
        }

        fn advance_to_next(&mut self) -> bridge_traits::error::Result<()> {
            self.calls.push("advance");
            Ok(())
        }

        fn prepare(&mut self) -> bridge_traits::error::Result<()> {
            Err(BridgeError::OperationFailed("decoder busy".to_string()))
        }

        fn play(&mut self) -> bridge_traits::error::Result<()> {
            self.calls.push("play");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_engine_failure_is_replied_and_published() {
        let bus = EventBus::new(8);
        let mut events = bus.subscribe();
        let engine = StubEngine {
            has_next: true,
            ..Default::default()
        };
        let (controller, controls) =
            PlayerController::new(Box::new(engine), bus, CancellationToken::new());
        let task = tokio::spawn(controller.run());

        let err = controls.skip_unresolvable(9).await.unwrap_err();
        assert!(err.is_transient());

        match events.recv().await.unwrap() {
            CoreEvent::Playback(PlaybackEvent::Error {
                track_id,
                recoverable,
                ..
            }) => {
                assert_eq!(track_id, Some(9));
                assert!(recoverable);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        drop(controls);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_skip_to_next_at_end_is_noop() {
        let (controller, controls) = PlayerController::new(
            Box::new(StubEngine::default()),
            EventBus::new(8),
            CancellationToken::new(),
        );
        let task = tokio::spawn(controller.run());

        assert!(controls.skip_to_next().await.is_ok());

        drop(controls);
        task.await.unwrap();
    }

    #[test]
    fn test_command_debug() {
        let command = PlayerCommand::SkipUnresolvable {
            track_id: 3,
            reply: None,
        };
        assert_eq!(format!("{:?}", command), "SkipUnresolvable { track_id: 3 }");
        assert_eq!(format!("{:?}", PlayerCommand::Play { reply: None }), "play");
    }
}
