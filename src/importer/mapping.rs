use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::warn;

use super::ImportError;

/// Logical product fields a price-list column can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ProductField {
    Sku,
    Title,
    Price,
    Brand,
    Category,
    Description,
    Image,
}

impl ProductField {
    /// Required fields must be mapped for the import to run at all
    pub fn is_required(self) -> bool {
        matches!(
            self,
            ProductField::Sku | ProductField::Title | ProductField::Price | ProductField::Brand
        )
    }
}

/// Sentinel for a field the caller chose not to map
pub const UNMAPPED: i32 = -1;

/// User-supplied mapping from product field to zero-based column index.
/// `-1` marks an unmapped field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub sku: i32,
    pub title: i32,
    pub price: i32,
    pub brand: i32,
    pub category: i32,
    pub description: i32,
    pub image: i32,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sku: UNMAPPED,
            title: UNMAPPED,
            price: UNMAPPED,
            brand: UNMAPPED,
            category: UNMAPPED,
            description: UNMAPPED,
            image: UNMAPPED,
        }
    }
}

/// Validated column positions consumed by the planner
#[derive(Debug, Clone, Copy)]
pub struct FieldIndexes {
    pub sku: usize,
    pub title: usize,
    pub price: usize,
    pub brand: usize,
    pub category: Option<usize>,
    pub description: Option<usize>,
    pub image: Option<usize>,
}

impl ColumnMapping {
    fn index_of(&self, field: ProductField) -> i32 {
        match field {
            ProductField::Sku => self.sku,
            ProductField::Title => self.title,
            ProductField::Price => self.price,
            ProductField::Brand => self.brand,
            ProductField::Category => self.category,
            ProductField::Description => self.description,
            ProductField::Image => self.image,
        }
    }

    /// Validates the mapping before any row is read.
    ///
    /// All required fields must have a non-negative index and no two required
    /// fields may claim the same column. Collisions involving only optional
    /// fields are tolerated with a warning.
    pub fn validate(&self) -> Result<FieldIndexes, ImportError> {
        let missing: Vec<ProductField> = ProductField::iter()
            .filter(|f| f.is_required() && self.index_of(*f) < 0)
            .collect();

        let required: Vec<(ProductField, i32)> = ProductField::iter()
            .filter(|f| f.is_required())
            .map(|f| (f, self.index_of(f)))
            .filter(|(_, idx)| *idx >= 0)
            .collect();

        let conflicting: Vec<ProductField> = required
            .iter()
            .filter(|(field, idx)| {
                required
                    .iter()
                    .any(|(other, other_idx)| other != field && other_idx == idx)
            })
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() || !conflicting.is_empty() {
            return Err(ImportError::IncompleteMapping {
                missing,
                conflicting,
            });
        }

        let mapped: Vec<(ProductField, i32)> = ProductField::iter()
            .map(|f| (f, self.index_of(f)))
            .filter(|(_, idx)| *idx >= 0)
            .collect();
        for (field, idx) in mapped.iter().filter(|(f, _)| !f.is_required()) {
            if let Some((other, _)) = mapped.iter().find(|(o, i)| o != field && i == idx) {
                warn!(
                    "column {} is claimed by both '{}' and '{}'",
                    idx, field, other
                );
            }
        }

        let optional =
            |idx: i32| -> Option<usize> { (idx >= 0).then_some(idx as usize) };

        Ok(FieldIndexes {
            sku: self.sku as usize,
            title: self.title as usize,
            price: self.price as usize,
            brand: self.brand as usize,
            category: optional(self.category),
            description: optional(self.description),
            image: optional(self.image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_mapping() -> ColumnMapping {
        ColumnMapping {
            sku: 0,
            title: 1,
            price: 2,
            brand: 3,
            category: 4,
            description: 5,
            image: 6,
        }
    }

    #[test]
    fn complete_mapping_validates() {
        let indexes = full_mapping().validate().expect("mapping should be valid");
        assert_eq!(indexes.sku, 0);
        assert_eq!(indexes.price, 2);
        assert_eq!(indexes.category, Some(4));
    }

    #[test]
    fn unmapped_optional_fields_become_none() {
        let mapping = ColumnMapping {
            sku: 0,
            title: 1,
            price: 2,
            brand: 3,
            ..Default::default()
        };
        let indexes = mapping.validate().expect("mapping should be valid");
        assert_eq!(indexes.category, None);
        assert_eq!(indexes.description, None);
        assert_eq!(indexes.image, None);
    }

    #[test]
    fn missing_price_is_rejected() {
        let mapping = ColumnMapping {
            price: UNMAPPED,
            ..full_mapping()
        };
        match mapping.validate() {
            Err(ImportError::IncompleteMapping { missing, .. }) => {
                assert_eq!(missing, vec![ProductField::Price]);
            }
            other => panic!("expected IncompleteMapping, got {:?}", other),
        }
    }

    #[test]
    fn required_fields_sharing_a_column_are_rejected() {
        let mapping = ColumnMapping {
            sku: 0,
            title: 0,
            ..full_mapping()
        };
        match mapping.validate() {
            Err(ImportError::IncompleteMapping { conflicting, .. }) => {
                assert!(conflicting.contains(&ProductField::Sku));
                assert!(conflicting.contains(&ProductField::Title));
            }
            other => panic!("expected IncompleteMapping, got {:?}", other),
        }
    }

    #[test]
    fn optional_collision_is_tolerated() {
        let mapping = ColumnMapping {
            description: 4,
            ..full_mapping()
        };
        // category and description both map to column 4; warned, not fatal
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn default_mapping_reports_all_required_missing() {
        match ColumnMapping::default().validate() {
            Err(ImportError::IncompleteMapping { missing, .. }) => {
                assert_eq!(missing.len(), 4);
            }
            other => panic!("expected IncompleteMapping, got {:?}", other),
        }
    }
}
