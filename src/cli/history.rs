//! `kiln history` and `kiln reset`

use crate::app::{init_history, init_service, load_config};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use kiln_memory::{ChatHistoryService, MAX_PAGE_SIZE};

const PREVIEW_CHARS: usize = 80;

/// Print one page of history, newest first
pub async fn run(app_id: i64, page_size: usize, before: Option<DateTime<Utc>>) -> Result<()> {
    let config = load_config()?;
    let history = ChatHistoryService::new(init_history(&config).await?);

    let page = history
        .list_app_chat_history(app_id, page_size.min(MAX_PAGE_SIZE), before)
        .await?;
    if page.is_empty() {
        println!("No history for app {app_id}");
        return Ok(());
    }

    for entry in &page {
        println!(
            "{}  {:<5}  {}",
            entry.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            entry.message_type,
            preview(&entry.message)
        );
    }
    if let Some(last) = page.last() {
        println!();
        println!(
            "Older entries: kiln history --app {app_id} --before {}",
            last.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
        );
    }
    Ok(())
}

/// Delete an application's history and drop its sessions
pub async fn reset(app_id: i64) -> Result<()> {
    let config = load_config()?;
    let service = init_service(&config).await?;
    let removed = service.reset_app(app_id).await?;

    println!("Removed {removed} history entries for app {app_id}");
    Ok(())
}

fn preview(message: &str) -> String {
    let line = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_and_flattens() {
        assert_eq!(preview("a\n  b"), "a b");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 1);
    }
}
