use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use super::category::{CategoryResolver, Resolution};
use super::mapping::{FieldIndexes, ProductField};
use super::markup::PricingRules;
use super::store::{ImportStore, NewProduct, ProductUpdate};

/// Typed row produced right after column mapping. Downstream code never
/// touches raw cells again.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProductRow {
    pub sku: String,
    pub title: String,
    pub brand: String,
    pub supplier_price: Decimal,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Why a row was skipped. Kept internally for diagnostics; only the
/// aggregate count crosses the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    MissingField(ProductField),
    InvalidPrice(String),
    UnauthorizedCategory(String),
    Store(String),
}

/// Terminal, mutually exclusive classification for one physical row
#[derive(Debug, Clone)]
pub enum RowPlan {
    Create(NewProduct),
    Update(ProductUpdate),
    Skip(RowError),
}

/// Parses a supplier price cell, accepting comma as the decimal separator.
/// Non-positive prices are rejected.
pub fn parse_supplier_price(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    let price = Decimal::from_str(&normalized).ok()?;
    (price > Decimal::ZERO).then_some(price)
}

/// Converts raw cells into a typed row, enforcing the required fields
pub fn extract_row(cells: &[String], indexes: &FieldIndexes) -> Result<RawProductRow, RowError> {
    let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or("");
    let optional = |i: Option<usize>| {
        i.map(cell)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let sku = cell(indexes.sku);
    if sku.is_empty() {
        return Err(RowError::MissingField(ProductField::Sku));
    }
    let title = cell(indexes.title);
    if title.is_empty() {
        return Err(RowError::MissingField(ProductField::Title));
    }
    // Required fields are checked in declaration order: sku, title, price, brand.
    let raw_price = cell(indexes.price);
    if raw_price.is_empty() {
        return Err(RowError::MissingField(ProductField::Price));
    }
    let brand = cell(indexes.brand);
    if brand.is_empty() {
        return Err(RowError::MissingField(ProductField::Brand));
    }
    let supplier_price =
        parse_supplier_price(raw_price).ok_or_else(|| RowError::InvalidPrice(raw_price.to_string()))?;

    Ok(RawProductRow {
        sku: sku.to_string(),
        title: title.to_string(),
        brand: brand.to_string(),
        supplier_price,
        category: optional(indexes.category),
        description: optional(indexes.description),
        image: optional(indexes.image),
    })
}

/// Classifies one row as create, update or skip.
///
/// The planner only reads the datastore; persistence happens later in the
/// executor. A row whose explicitly specified category cannot be resolved is
/// skipped, as is any row whose lookups fail.
pub async fn plan_row(
    cells: &[String],
    indexes: &FieldIndexes,
    pricing: &PricingRules,
    resolver: &mut CategoryResolver<'_>,
    store: &dyn ImportStore,
    department_id: Uuid,
    preserve_images: bool,
) -> RowPlan {
    let row = match extract_row(cells, indexes) {
        Ok(row) => row,
        Err(reason) => return RowPlan::Skip(reason),
    };

    let category_id = match &row.category {
        Some(title) => match resolver.resolve(title).await {
            Ok(Resolution::Id(id)) => Some(id),
            Ok(Resolution::Unauthorized) => {
                return RowPlan::Skip(RowError::UnauthorizedCategory(title.clone()))
            }
            Err(e) => return RowPlan::Skip(RowError::Store(e.to_string())),
        },
        None => None,
    };

    let price = pricing.sale_price(row.supplier_price);

    let existing = match store.find_product(&row.sku, &row.brand, department_id).await {
        Ok(existing) => existing,
        Err(e) => return RowPlan::Skip(RowError::Store(e.to_string())),
    };

    match existing {
        Some(current) => {
            let image_url = if preserve_images && row.image.is_none() {
                current.image_url
            } else {
                row.image
            };
            RowPlan::Update(ProductUpdate {
                id: current.id,
                title: row.title,
                supplier_price: row.supplier_price,
                price,
                description: row.description,
                image_url,
                category_id,
            })
        }
        None => RowPlan::Create(NewProduct {
            sku: row.sku,
            brand: row.brand,
            department_id,
            title: row.title,
            supplier_price: row.supplier_price,
            price,
            description: row.description,
            image_url: row.image,
            category_id,
        }),
    }
}
