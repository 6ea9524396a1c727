//! Listen Live page: program listing plus the live stream player.

use std::sync::Arc;

use url::Url;

use crate::domain::{
    ContentResource, PlayerEvent, PlayerState, Program, StreamPlayer, parse_programs,
};
use crate::ports::{SiteBackend, StreamProbe};

pub struct ListenLive<P: StreamProbe> {
    programs: Vec<Program>,
    player: StreamPlayer,
    probe: Arc<P>,
    stream_url: Url,
}

impl<P: StreamProbe> ListenLive<P> {
    /// Fetch the program list once. A failed fetch leaves the list empty.
    pub async fn mount<B: SiteBackend + ?Sized>(backend: &B, probe: Arc<P>, stream_url: Url) -> Self {
        let programs = match backend.get_json(ContentResource::Programs.path()).await {
            Ok(body) => parse_programs(&body).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "program list unreadable");
                Vec::new()
            }),
            Err(err) => {
                tracing::warn!(error = %err, "program list unavailable");
                Vec::new()
            }
        };

        Self { programs, player: StreamPlayer::new(), probe, stream_url }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }

    pub fn state(&self) -> &PlayerState {
        self.player.state()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Start the stream: `Loading`, then `Playing` if the stream answers.
    pub async fn play(&mut self) -> &PlayerState {
        if self.player.is_playing() {
            return self.player.state();
        }

        self.player.apply(PlayerEvent::PlayRequested);
        match self.probe.probe(&self.stream_url).await {
            Ok(()) => self.player.apply(PlayerEvent::StreamReady),
            Err(err) => {
                tracing::warn!(stream = %self.stream_url, error = %err, "stream failed to start");
                self.player.apply(PlayerEvent::AudioError(err.user_message().to_string()))
            }
        }
    }

    pub fn pause(&mut self) -> &PlayerState {
        self.player.apply(PlayerEvent::PauseRequested)
    }

    /// Audio element reported an error mid-stream.
    pub fn on_audio_error(&mut self, message: impl Into<String>) -> &PlayerState {
        self.player.apply(PlayerEvent::AudioError(message.into()))
    }
}
