use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{category, import_log, product};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("datastore error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Other(String),
}

/// Product fields carried by a planned create
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub brand: String,
    pub department_id: Uuid,
    pub title: String,
    pub supplier_price: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Point update of an existing product; `image_url` already reflects the
/// preserve-images policy.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub id: Uuid,
    pub title: String,
    pub supplier_price: Decimal,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Slice of an existing product the planner needs for classification
#[derive(Debug, Clone)]
pub struct ExistingProduct {
    pub id: Uuid,
    pub image_url: Option<String>,
}

/// One audit row per import run
#[derive(Debug, Clone)]
pub struct NewImportLog {
    pub actor_id: Uuid,
    pub department_id: Uuid,
    pub file_name: String,
    pub created_count: i32,
    pub updated_count: i32,
    pub skipped_count: i32,
    pub message: Option<String>,
}

/// Persistence operations the import pipeline needs. Kept behind a trait so
/// tests can instrument concurrency and failure behavior without a database.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Point lookup by the natural key (sku, brand) within a department
    async fn find_product(
        &self,
        sku: &str,
        brand: &str,
        department_id: Uuid,
    ) -> Result<Option<ExistingProduct>, StoreError>;

    /// Bulk insert with skip-on-conflict semantics over the natural key.
    /// Returns the number of rows actually inserted.
    async fn insert_products(&self, rows: Vec<NewProduct>) -> Result<u64, StoreError>;

    async fn update_product(&self, update: ProductUpdate) -> Result<(), StoreError>;

    /// Case-sensitive exact-title lookup
    async fn find_category(&self, title: &str) -> Result<Option<Uuid>, StoreError>;

    async fn create_category(&self, title: &str) -> Result<Uuid, StoreError>;

    /// Append-only audit insertion
    async fn insert_import_log(&self, entry: NewImportLog) -> Result<(), StoreError>;
}

/// Production store backed by sea-orm
pub struct SeaOrmImportStore {
    db: Arc<DbPool>,
}

impl SeaOrmImportStore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImportStore for SeaOrmImportStore {
    async fn find_product(
        &self,
        sku: &str,
        brand: &str,
        department_id: Uuid,
    ) -> Result<Option<ExistingProduct>, StoreError> {
        let found = product::Entity::find()
            .filter(product::Column::Sku.eq(sku))
            .filter(product::Column::Brand.eq(brand))
            .filter(product::Column::DepartmentId.eq(department_id))
            .one(&*self.db)
            .await?;

        Ok(found.map(|p| ExistingProduct {
            id: p.id,
            image_url: p.image_url,
        }))
    }

    async fn insert_products(&self, rows: Vec<NewProduct>) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let models: Vec<product::ActiveModel> = rows
            .into_iter()
            .map(|p| product::ActiveModel {
                id: Set(Uuid::new_v4()),
                sku: Set(p.sku),
                brand: Set(p.brand),
                department_id: Set(p.department_id),
                title: Set(p.title),
                supplier_price: Set(p.supplier_price),
                price: Set(p.price),
                description: Set(p.description),
                image_url: Set(p.image_url),
                category_id: Set(p.category_id),
                created_at: Set(now),
                updated_at: Set(None),
            })
            .collect();

        // Duplicate natural keys are silently skipped at the storage layer;
        // the returned count only covers rows actually inserted.
        let inserted = product::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    product::Column::Sku,
                    product::Column::Brand,
                    product::Column::DepartmentId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(inserted)
    }

    async fn update_product(&self, update: ProductUpdate) -> Result<(), StoreError> {
        let model = product::ActiveModel {
            id: Set(update.id),
            title: Set(update.title),
            supplier_price: Set(update.supplier_price),
            price: Set(update.price),
            description: Set(update.description),
            image_url: Set(update.image_url),
            category_id: Set(update.category_id),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        };
        model.update(&*self.db).await?;
        Ok(())
    }

    async fn find_category(&self, title: &str) -> Result<Option<Uuid>, StoreError> {
        let found = category::Entity::find()
            .filter(category::Column::Title.eq(title))
            .one(&*self.db)
            .await?;
        Ok(found.map(|c| c.id))
    }

    async fn create_category(&self, title: &str) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let model = category::ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
            created_at: Set(Utc::now()),
        };
        model.insert(&*self.db).await?;
        Ok(id)
    }

    async fn insert_import_log(&self, entry: NewImportLog) -> Result<(), StoreError> {
        let model = import_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            actor_id: Set(entry.actor_id),
            department_id: Set(entry.department_id),
            file_name: Set(entry.file_name),
            created_count: Set(entry.created_count),
            updated_count: Set(entry.updated_count),
            skipped_count: Set(entry.skipped_count),
            message: Set(entry.message),
            created_at: Set(Utc::now()),
        };
        model.insert(&*self.db).await?;
        Ok(())
    }
}
