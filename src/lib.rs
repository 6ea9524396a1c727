//! onair: client-side flows of a radio station website, driven against its backend API.
//!
//! Visitor and click telemetry, the public forms, content reads, the Listen
//! Live player and the presenter dashboard all run through [`AppContext`],
//! which carries the backend, the local store and the loaded configuration.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::AppContext;
pub use app::api::{LiveContext, connect, mount_listen_live};
pub use app::dashboard::{DashboardView, EntryLog, MountedDashboard};
pub use app::forms::{ContactPopup, FormController, FormState, FormStatus};
pub use app::listen_live::ListenLive;
pub use app::tracker::Tracker;
pub use domain::{AppError, SiteConfig, load_config};
