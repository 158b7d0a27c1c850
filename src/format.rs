//! Table rendering and human-readable formatting for the CLI.

use crate::download_station::DownloadTask;
use comfy_table::Table;

/// Render download tasks as a terminal table.
pub fn render_tasks(tasks: &[DownloadTask]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Id",
        "Title",
        "Size",
        "Type",
        "Status",
        "Downloaded",
        "Destination",
    ]);

    for task in tasks {
        table.add_row(vec![
            task.id.clone(),
            task.title.clone(),
            human_bytes(task.size),
            task.task_type.clone(),
            task.status.clone(),
            format!("{}%", percent_downloaded(task)),
            task.additional.detail.destination.clone(),
        ]);
    }

    table
}

/// Completed percentage for one task; 0 while the size is still unknown.
fn percent_downloaded(task: &DownloadTask) -> i64 {
    if task.size > 0 {
        task.additional.transfer.size_downloaded * 100 / task.size
    } else {
        0
    }
}

/// Format a byte count with SI units ("1.5 GB").
pub fn human_bytes(bytes: i64) -> String {
    const UNIT: i64 = 1000;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, ['k', 'M', 'G', 'T', 'P', 'E'][exp])
}

/// Truncate a string to at most `max` characters, ellipsized.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut truncated: String = s.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}
