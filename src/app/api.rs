//! Production wiring: real HTTP backend and filesystem-backed local store.

use std::sync::Arc;

use crate::adapters::{FileLocalStore, HttpSiteBackend, HttpStreamProbe};
use crate::app::AppContext;
use crate::app::forms::ContactPopup;
use crate::app::listen_live::ListenLive;
use crate::domain::{AppError, SiteConfig};

/// Context used by the CLI and by embedders that talk to a live backend.
pub type LiveContext = AppContext<HttpSiteBackend, FileLocalStore>;

/// Build a context from a loaded configuration.
pub fn connect(config: SiteConfig) -> Result<LiveContext, AppError> {
    let backend = HttpSiteBackend::new(&config.backend)?;
    let store = FileLocalStore::new(config.dashboard.storage_dir.clone());
    Ok(AppContext::new(backend, store, config))
}

/// Mount the Listen Live page against the configured stream.
pub async fn mount_listen_live(ctx: &LiveContext) -> Result<ListenLive<HttpStreamProbe>, AppError> {
    let probe = HttpStreamProbe::new(&ctx.config().backend)?;
    let stream_url = ctx.config().stream.url.clone();
    Ok(ListenLive::mount(ctx.backend().as_ref(), Arc::new(probe), stream_url).await)
}

/// Contact popup closing itself after the configured delay.
pub fn contact_popup(ctx: &LiveContext) -> ContactPopup<HttpSiteBackend> {
    ContactPopup::new(Arc::clone(ctx.backend()), ctx.config().forms.contact_auto_close())
}
