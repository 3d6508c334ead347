use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only audit record, one row per price-list import run.
/// Never updated after insertion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "import_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Actor who ran the import
    pub actor_id: Uuid,

    pub department_id: Uuid,

    pub file_name: String,

    pub created_count: i32,

    pub updated_count: i32,

    pub skipped_count: i32,

    /// Free-text note, e.g. the unauthorized category titles
    pub message: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
