//! Colored terminal rendering for tripcal-core types.

use owo_colors::OwoColorize;
use tripcal_core::ConvertedCalendar;
use tripcal_core::sync::{SyncStatus, TableSyncResult};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for TableSyncResult {
    fn render(&self) -> String {
        match self.status {
            SyncStatus::Synced => format!("{} {}", "✓".green(), self.message),
            SyncStatus::RetriesExhausted => {
                format!("{} {}", "!".yellow(), self.message.yellow())
            }
            SyncStatus::Rejected | SyncStatus::Failed => {
                format!("{} {}", "✗".red(), self.message.red())
            }
        }
    }
}

impl Render for ConvertedCalendar {
    fn render(&self) -> String {
        let nested = self.total_events.saturating_sub(self.event_count);
        format!(
            "{} {} trips and events, {} nested",
            self.calendar.name.bold(),
            self.event_count,
            nested.dimmed()
        )
    }
}
