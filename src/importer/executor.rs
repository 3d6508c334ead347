use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::planner::RowPlan;
use super::store::{ImportStore, NewProduct, ProductUpdate, StoreError};

/// Rows persisted per batch; a chunk fully settles before the next starts.
pub const CHUNK_SIZE: usize = 100;

/// Cap on simultaneously in-flight point operations within one chunk.
pub const MAX_IN_FLIGHT: usize = 8;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionTotals {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

/// Applies row plans against the datastore in fixed-size chunks.
///
/// Creates within a chunk go through one bulk insert whose skip-on-conflict
/// semantics defend against duplicate natural keys; updates run individually
/// under a bounded fan-out. A failing operation downgrades its rows to
/// skipped and never aborts the batch; there is no cross-row rollback.
pub async fn execute(store: &dyn ImportStore, plans: Vec<RowPlan>) -> ExecutionTotals {
    let mut totals = ExecutionTotals::default();
    let mut remaining = plans.into_iter();

    loop {
        let chunk: Vec<RowPlan> = remaining.by_ref().take(CHUNK_SIZE).collect();
        if chunk.is_empty() {
            break;
        }

        let mut creates: Vec<NewProduct> = Vec::new();
        let mut updates: Vec<ProductUpdate> = Vec::new();
        for plan in chunk {
            match plan {
                RowPlan::Create(product) => creates.push(product),
                RowPlan::Update(update) => updates.push(update),
                RowPlan::Skip(reason) => {
                    debug!(?reason, "row skipped");
                    totals.skipped += 1;
                }
            }
        }

        if !creates.is_empty() {
            let attempted = creates.len() as u64;
            match store.insert_products(creates).await {
                Ok(inserted) => {
                    totals.created += inserted;
                    // rows lost to the conflict guard were not created
                    totals.skipped += attempted.saturating_sub(inserted);
                }
                Err(e) => {
                    warn!("bulk insert failed, skipping {} rows: {}", attempted, e);
                    totals.skipped += attempted;
                }
            }
        }

        if !updates.is_empty() {
            let results: Vec<Result<(), StoreError>> = stream::iter(updates)
                .map(|update| async move { store.update_product(update).await })
                .buffer_unordered(MAX_IN_FLIGHT)
                .collect()
                .await;

            for result in results {
                match result {
                    Ok(()) => totals.updated += 1,
                    Err(e) => {
                        warn!("row update failed, skipped: {}", e);
                        totals.skipped += 1;
                    }
                }
            }
        }
    }

    totals
}
