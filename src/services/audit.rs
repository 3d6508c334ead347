use std::collections::BTreeSet;
use tracing::warn;

use crate::importer::store::{ImportStore, NewImportLog};

/// Max unauthorized titles enumerated in the log message; the leading count
/// always reflects the full set.
const MESSAGE_SAMPLE_LIMIT: usize = 10;

/// Builds the human-readable audit note for unauthorized category titles
pub fn unauthorized_message(titles: &BTreeSet<String>) -> Option<String> {
    if titles.is_empty() {
        return None;
    }

    let noun = if titles.len() == 1 {
        "category"
    } else {
        "categories"
    };
    let shown: Vec<&str> = titles
        .iter()
        .take(MESSAGE_SAMPLE_LIMIT)
        .map(String::as_str)
        .collect();
    let mut message = format!(
        "{} unauthorized {}: {}",
        titles.len(),
        noun,
        shown.join(", ")
    );

    let hidden = titles.len().saturating_sub(MESSAGE_SAMPLE_LIMIT);
    if hidden > 0 {
        message.push_str(&format!(" and {} more", hidden));
    }
    Some(message)
}

/// Writes the per-run audit row. Best-effort: a failed write is warned and
/// swallowed so it cannot fail an already-completed import.
pub async fn record_import(store: &dyn ImportStore, entry: NewImportLog) {
    if let Err(e) = store.insert_import_log(entry).await {
        warn!("failed to write import audit log: {}", e);
    }
}
