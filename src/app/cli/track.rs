use clap::Subcommand;

use crate::app::api::LiveContext;
use crate::app::tracker::Tracker;
use crate::domain::{AppError, ClickPosition, ElementDescriptor, PageSnapshot, is_trackable_click};

#[derive(Subcommand)]
pub enum TrackCommands {
    /// Record a page visit
    Visit {
        /// Full URL of the page
        url: String,
        #[arg(long, default_value = "")]
        referrer: String,
        #[arg(long, default_value = concat!("onair/", env!("CARGO_PKG_VERSION")))]
        user_agent: String,
        /// Screen size as WIDTHxHEIGHT
        #[arg(long, default_value = "")]
        screen: String,
        /// Viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "")]
        viewport: String,
    },
    /// Record a click on an element
    Click {
        /// Page the click happened on
        #[arg(long)]
        page: String,
        /// Tag name of the clicked element
        #[arg(long)]
        tag: String,
        #[arg(long)]
        id: Option<String>,
        /// Raw class attribute
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// The element has an inline click handler
        #[arg(long)]
        handler: bool,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, default_value_t = 0)]
        x: i32,
        #[arg(long, default_value_t = 0)]
        y: i32,
    },
}

/// Tracking is best effort: a rejected event is reported but never fails the command.
pub async fn run_track(ctx: &LiveContext, command: TrackCommands) -> Result<(), AppError> {
    let tracker = Tracker::new(ctx.backend().clone());

    match command {
        TrackCommands::Visit { url, referrer, user_agent, screen, viewport } => {
            let page = PageSnapshot {
                page_url: url,
                user_agent,
                referrer,
                screen_resolution: screen,
                viewport_size: viewport,
            };
            if tracker.track_visit(&page).await {
                println!("✅ Visit recorded: {}", page.page_url);
            } else {
                println!("Visit not recorded");
            }
        }
        TrackCommands::Click { page, tag, id, class, role, handler, text, x, y } => {
            let mut target = ElementDescriptor::new(tag).with_text(text);
            if let Some(id) = id {
                target = target.with_id(id);
            }
            if let Some(class) = class {
                target = target.with_class_attr(&class);
            }
            if let Some(role) = role {
                target = target.with_role(role);
            }
            if handler {
                target = target.with_click_handler();
            }

            if !is_trackable_click(&target) {
                println!("Element is not interactive; nothing sent");
            } else if tracker.track_click(&target, &page, ClickPosition { x, y }).await {
                println!("✅ Click recorded on <{}>", target.tag);
            } else {
                println!("Click not recorded");
            }
        }
    }
    Ok(())
}
