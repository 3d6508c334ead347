//! Permission string constants, `resource:action` shaped.

pub const PRODUCTS_IMPORT: &str = "products:import";
pub const PRODUCTS_READ: &str = "products:read";
pub const CATEGORIES_CREATE: &str = "categories:create";
pub const IMPORTS_READ: &str = "imports:read";
