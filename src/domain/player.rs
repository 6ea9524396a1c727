//! Listen Live stream player state.

use std::fmt;

/// Playback state of the live stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Error(String),
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerState::Idle => f.write_str("idle"),
            PlayerState::Loading => f.write_str("loading"),
            PlayerState::Playing => f.write_str("playing"),
            PlayerState::Paused => f.write_str("paused"),
            PlayerState::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Inputs driving the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    PlayRequested,
    StreamReady,
    PauseRequested,
    AudioError(String),
}

#[derive(Debug, Clone, Default)]
pub struct StreamPlayer {
    state: PlayerState,
}

impl StreamPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Apply an event; events that make no sense in the current state are ignored.
    pub fn apply(&mut self, event: PlayerEvent) -> &PlayerState {
        let next = match (&self.state, event) {
            (_, PlayerEvent::AudioError(message)) => Some(PlayerState::Error(message)),
            (
                PlayerState::Idle | PlayerState::Paused | PlayerState::Error(_),
                PlayerEvent::PlayRequested,
            ) => Some(PlayerState::Loading),
            (PlayerState::Loading, PlayerEvent::StreamReady) => Some(PlayerState::Playing),
            (PlayerState::Loading | PlayerState::Playing, PlayerEvent::PauseRequested) => {
                Some(PlayerState::Paused)
            }
            (state, event) => {
                tracing::debug!(%state, ?event, "ignoring player event");
                None
            }
        };

        if let Some(state) = next {
            self.state = state;
        }
        &self.state
    }
}
