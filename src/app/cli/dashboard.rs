use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use serde_json::Value;

use crate::app::api::LiveContext;
use crate::app::dashboard::{DashboardView, EntryLog, cached_entries, export_csv};
use crate::domain::{AppError, DashboardSnapshot, EntryKind, FormFields};

#[derive(Subcommand)]
pub enum DashboardCommands {
    /// Mount the dashboard and follow the weather refresh
    Watch {
        /// Stop after this many refresh intervals (runs until Ctrl-C when omitted)
        #[arg(long)]
        refreshes: Option<u32>,
    },
    /// Submit a testimony (fields as name=value)
    Testimony {
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Submit a call log entry (fields as name=value)
    CallLog {
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Print locally cached entries as JSON
    Entries {
        /// testimony or call-log
        kind: String,
    },
    /// Download the CSV export
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

pub async fn run_dashboard(ctx: &LiveContext, command: DashboardCommands) -> Result<i32, AppError> {
    match command {
        DashboardCommands::Watch { refreshes } => run_watch(ctx, refreshes).await,
        DashboardCommands::Testimony { fields } => {
            submit_entry(ctx, EntryKind::Testimony, &fields).await
        }
        DashboardCommands::CallLog { fields } => submit_entry(ctx, EntryKind::CallLog, &fields).await,
        DashboardCommands::Entries { kind } => {
            let kind = EntryKind::parse(&kind)?;
            let entries = cached_entries(ctx.store().as_ref(), kind);
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(0)
        }
        DashboardCommands::Export { out } => {
            let csv = export_csv(ctx.backend().as_ref()).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    println!("✅ Exported {} bytes to {}", csv.len(), path.display());
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&csv)?;
                }
            }
            Ok(0)
        }
    }
}

async fn run_watch(ctx: &LiveContext, refreshes: Option<u32>) -> Result<i32, AppError> {
    let mut dashboard = DashboardView::new(ctx).mount().await;
    print_snapshot(&dashboard.snapshot());

    let mut remaining = refreshes;
    while remaining != Some(0) {
        let refreshed = tokio::select! {
            refreshed = dashboard.next_refresh() => refreshed,
            _ = tokio::signal::ctrl_c() => false,
        };
        if !refreshed {
            break;
        }
        print_snapshot(&dashboard.snapshot());
        remaining = remaining.map(|n| n - 1);
    }

    dashboard.unmount();
    Ok(0)
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    let updated = snapshot
        .weather_updated_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    println!("Weather (updated {}): {}", updated, render(snapshot.weather.as_ref()));
    println!("Schedule: {}", render(snapshot.schedule.as_ref()));
    println!("Presenters: {}", render(snapshot.presenters.as_ref()));
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "unavailable".to_string(),
    }
}

async fn submit_entry(ctx: &LiveContext, kind: EntryKind, pairs: &[String]) -> Result<i32, AppError> {
    let fields = FormFields::parse_pairs(pairs)?;
    let mut log = EntryLog::load(Arc::clone(ctx.backend()), Arc::clone(ctx.store()));
    let entry = log.submit(kind, fields).await?;
    println!("✅ {} saved (id {})", kind, entry.id);
    Ok(0)
}
