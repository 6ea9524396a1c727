pub mod configuration;
pub mod content;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod player;
pub mod timestamp;
pub mod tracking;

pub use configuration::{
    BackendConfig, DashboardConfig, FormsConfig, SiteConfig, StreamConfig, load_config,
    parse_config_content,
};
pub use content::{ContentResource, Program, parse_programs};
pub use dashboard::{
    DASHBOARD_EXPORT_ENDPOINT, DashboardEntry, DashboardFeed, DashboardSnapshot, EntryIdGenerator,
    EntryKind,
};
pub use error::{AppError, GENERIC_FAILURE_MESSAGE, MISSING_FIELDS_MESSAGE};
pub use forms::{FormEncoding, FormFields, FormKind, SUCCESS_INDICATOR, SuccessPolicy};
pub use player::{PlayerEvent, PlayerState, StreamPlayer};
pub use tracking::{
    ClickEvent, ClickPosition, ElementDescriptor, PageSnapshot, VisitorEvent, is_trackable_click,
};
