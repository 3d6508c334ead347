use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{permissions, Actor, Authorizer};
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::importer::{
    category::CategoryResolver,
    executor,
    mapping::ColumnMapping,
    markup::{MarkupRule, PricingRules},
    planner, spreadsheet,
    store::{ImportStore, NewImportLog, SeaOrmImportStore},
};
use crate::services::audit;

/// Caller-supplied import parameters, decoded from the `options` part of the
/// multipart request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub mapping: ColumnMapping,

    #[serde(default)]
    pub markup_rules: Vec<MarkupRule>,

    /// Applied when no markup rule matches; pass-through when omitted
    #[serde(default = "MarkupRule::identity")]
    pub default_markup: MarkupRule,

    /// Keep the stored image when an updated row brings none
    #[serde(default)]
    pub preserve_images: bool,

    /// Target department; defaults to the actor's department scope
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

/// Aggregate result returned to the caller. Partial success is not an error:
/// skipped rows only surface as a count, unauthorized categories by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub missing_categories: Vec<String>,
}

/// Service running price-list imports
pub struct ImportService {
    store: Arc<dyn ImportStore>,
    authorizer: Arc<dyn Authorizer>,
    event_sender: EventSender,
}

impl ImportService {
    /// Creates a new import service backed by the sea-orm store
    pub fn new(
        db_pool: Arc<DbPool>,
        authorizer: Arc<dyn Authorizer>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            store: Arc::new(SeaOrmImportStore::new(db_pool)),
            authorizer,
            event_sender,
        }
    }

    /// Creates an import service over an arbitrary store (used by tests)
    pub fn with_store(
        store: Arc<dyn ImportStore>,
        authorizer: Arc<dyn Authorizer>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            store,
            authorizer,
            event_sender,
        }
    }

    /// Runs one full price-list import.
    ///
    /// Structural failures (unreadable file, bad mapping) abort before any
    /// row is touched. Row-level failures downgrade the affected row to
    /// skipped. Exactly one audit row is written after the batch settles,
    /// best-effort.
    #[instrument(skip(self, bytes, options), fields(actor_id = %actor.id, file_name = %file_name))]
    pub async fn import_price_list(
        &self,
        actor: &Actor,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<ImportSummary, ServiceError> {
        self.authorizer
            .authorize(actor, permissions::PRODUCTS_IMPORT)?;
        let department_id = options.department_id.unwrap_or(actor.department_id);

        // Structural phase: either failure aborts with zero writes.
        let grid = spreadsheet::read_grid(file_name, bytes)?;
        let indexes = options.mapping.validate()?;

        let pricing = PricingRules {
            rules: options.markup_rules.clone(),
            default_rule: options.default_markup.clone(),
        };

        let mut resolver =
            CategoryResolver::new(self.store.as_ref(), self.authorizer.as_ref(), actor);

        // First row is the header; everything after it is data.
        let mut plans = Vec::with_capacity(grid.len().saturating_sub(1));
        for cells in grid.iter().skip(1) {
            plans.push(
                planner::plan_row(
                    cells,
                    &indexes,
                    &pricing,
                    &mut resolver,
                    self.store.as_ref(),
                    department_id,
                    options.preserve_images,
                )
                .await,
            );
        }

        let unauthorized = resolver.into_unauthorized_titles();
        let message = audit::unauthorized_message(&unauthorized);

        let totals = executor::execute(self.store.as_ref(), plans).await;

        audit::record_import(
            self.store.as_ref(),
            NewImportLog {
                actor_id: actor.id,
                department_id,
                file_name: file_name.to_string(),
                created_count: totals.created as i32,
                updated_count: totals.updated as i32,
                skipped_count: totals.skipped as i32,
                message,
            },
        )
        .await;

        self.event_sender
            .send(Event::ImportCompleted {
                actor_id: actor.id,
                department_id,
                file_name: file_name.to_string(),
                created: totals.created,
                updated: totals.updated,
                skipped: totals.skipped,
                timestamp: Utc::now(),
            })
            .await;

        info!(
            created = totals.created,
            updated = totals.updated,
            skipped = totals.skipped,
            unauthorized = unauthorized.len(),
            "price list import finished"
        );

        Ok(ImportSummary {
            created: totals.created,
            updated: totals.updated,
            skipped: totals.skipped,
            missing_categories: unauthorized.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RbacAuthorizer;
    use crate::importer::store::{ExistingProduct, ProductUpdate, StoreError};
    use crate::importer::NewProduct;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::mpsc;

    /// Store that accepts product writes but always fails the audit insertion
    #[derive(Default)]
    struct AuditFailingStore {
        inserted: AtomicU64,
        log_attempts: AtomicU64,
    }

    #[async_trait]
    impl ImportStore for AuditFailingStore {
        async fn find_product(
            &self,
            _sku: &str,
            _brand: &str,
            _department_id: Uuid,
        ) -> Result<Option<ExistingProduct>, StoreError> {
            Ok(None)
        }

        async fn insert_products(&self, rows: Vec<NewProduct>) -> Result<u64, StoreError> {
            self.inserted.fetch_add(rows.len() as u64, Ordering::SeqCst);
            Ok(rows.len() as u64)
        }

        async fn update_product(&self, _update: ProductUpdate) -> Result<(), StoreError> {
            Ok(())
        }

        async fn find_category(&self, _title: &str) -> Result<Option<Uuid>, StoreError> {
            Ok(None)
        }

        async fn create_category(&self, _title: &str) -> Result<Uuid, StoreError> {
            Ok(Uuid::new_v4())
        }

        async fn insert_import_log(&self, _entry: NewImportLog) -> Result<(), StoreError> {
            self.log_attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Other("simulated audit failure".to_string()))
        }
    }

    #[tokio::test]
    async fn failed_audit_write_does_not_fail_the_import() {
        let store = Arc::new(AuditFailingStore::default());
        let (event_tx, _event_rx) = mpsc::channel(8);
        let service = ImportService::with_store(
            store.clone(),
            Arc::new(RbacAuthorizer),
            EventSender::new(event_tx),
        );
        let actor = Actor {
            id: Uuid::new_v4(),
            role: "manager".to_string(),
            department_id: Uuid::new_v4(),
        };

        let file: &[u8] = b"sku,title,price,brand\nA1,Brake pad,100,Bosch\n";
        let options = ImportOptions {
            mapping: ColumnMapping {
                sku: 0,
                title: 1,
                price: 2,
                brand: 3,
                ..Default::default()
            },
            markup_rules: Vec::new(),
            default_markup: MarkupRule::identity(),
            preserve_images: false,
            department_id: None,
        };

        let summary = service
            .import_price_list(&actor, "prices.csv", file, &options)
            .await
            .expect("audit failure must not fail a completed import");

        assert_eq!(summary.created, 1);
        assert_eq!(store.inserted.load(Ordering::SeqCst), 1);
        assert_eq!(store.log_attempts.load(Ordering::SeqCst), 1);
    }
}
