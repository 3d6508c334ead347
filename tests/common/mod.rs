use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;
use uuid::Uuid;

use partsbay_api::{
    auth::{Actor, Authorizer, RbacAuthorizer},
    db::DbPool,
    entities::department,
    events::EventSender,
    importer::{ColumnMapping, MarkupRule},
    migrator::Migrator,
    services::import_service::{ImportOptions, ImportService},
};

/// Test harness backed by an in-memory SQLite database with migrations applied.
///
/// SQLite in-memory databases are per-connection, so the pool is pinned to a
/// single connection.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub import: Arc<ImportService>,
    pub authorizer: Arc<dyn Authorizer>,
    pub department_id: Uuid,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options)
            .await
            .expect("failed to open in-memory sqlite");
        Migrator::up(&db, None).await.expect("migrations failed");
        let db = Arc::new(db);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(partsbay_api::events::process_events(event_rx));

        let department_id = Uuid::new_v4();
        department::ActiveModel {
            id: Set(department_id),
            name: Set("Car Parts".to_string()),
        }
        .insert(&*db)
        .await
        .expect("failed to seed department");

        let authorizer: Arc<dyn Authorizer> = Arc::new(RbacAuthorizer);
        let import = Arc::new(ImportService::new(
            db.clone(),
            authorizer.clone(),
            event_sender,
        ));

        Self {
            db,
            import,
            authorizer,
            department_id,
            _event_task: event_task,
        }
    }

    pub fn actor(&self, role: &str) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: role.to_string(),
            department_id: self.department_id,
        }
    }

    #[allow(dead_code)]
    pub fn manager(&self) -> Actor {
        self.actor("manager")
    }

    #[allow(dead_code)]
    pub fn clerk(&self) -> Actor {
        self.actor("clerk")
    }
}

/// Joins CSV lines into an upload body
#[allow(dead_code)]
pub fn csv_bytes(lines: &[&str]) -> Vec<u8> {
    let mut body = lines.join("\n");
    body.push('\n');
    body.into_bytes()
}

/// Mapping matching the fixture column order:
/// sku, title, price, brand, category, image
#[allow(dead_code)]
pub fn fixture_mapping() -> ColumnMapping {
    ColumnMapping {
        sku: 0,
        title: 1,
        price: 2,
        brand: 3,
        category: 4,
        image: 5,
        ..Default::default()
    }
}

/// Options with a flat 10% markup over every price
#[allow(dead_code)]
pub fn fixture_options() -> ImportOptions {
    use rust_decimal::Decimal;

    ImportOptions {
        mapping: fixture_mapping(),
        markup_rules: vec![MarkupRule {
            lower_bound: Decimal::ZERO,
            upper_bound: Decimal::from(1_000_000),
            adjustment_type: partsbay_api::importer::Adjustment::Percentage,
            adjustment_value: Decimal::from(10),
        }],
        default_markup: MarkupRule::identity(),
        preserve_images: false,
        department_id: None,
    }
}
