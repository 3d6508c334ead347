use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use crate::{
    auth::{permissions, Actor},
    entities::import_log,
    errors::ServiceError,
    services::import_service::{ImportOptions, ImportSummary},
    ApiResponse, AppState, ListQuery,
};

/// `POST /api/v1/products/import`
///
/// Multipart body: a `file` part with the price list and an `options` part
/// holding the JSON-encoded [`ImportOptions`]. Responds 2xx with the summary
/// even when rows were skipped; only structural failures are errors.
pub async fn import_price_list(
    State(state): State<AppState>,
    actor: Actor,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, ServiceError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut options: Option<ImportOptions> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidInput(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::InvalidInput(format!("failed reading file part: {}", e))
                })?;
                file = Some((name, bytes.to_vec()));
            }
            Some("options") => {
                let text = field.text().await.map_err(|e| {
                    ServiceError::InvalidInput(format!("failed reading options part: {}", e))
                })?;
                options = Some(serde_json::from_str(&text).map_err(|e| {
                    ServiceError::ValidationError(format!("invalid import options: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| ServiceError::InvalidInput("missing 'file' part".to_string()))?;
    let options =
        options.ok_or_else(|| ServiceError::InvalidInput("missing 'options' part".to_string()))?;

    let summary = state
        .import_service
        .import_price_list(&actor, &file_name, &bytes, &options)
        .await?;

    Ok(Json(summary))
}

/// `GET /api/v1/products/import/history`
///
/// Pages through the append-only import audit trail, newest first.
pub async fn import_history(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<import_log::Model>>>, ServiceError> {
    state
        .authorizer
        .authorize(&actor, permissions::IMPORTS_READ)?;

    let paginator = import_log::Entity::find()
        .order_by_desc(import_log::Column::CreatedAt)
        .paginate(&*state.db, query.limit.max(1));

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(query.page.saturating_sub(1)).await?;

    Ok(Json(ApiResponse::ok(items).with_total(total)))
}
