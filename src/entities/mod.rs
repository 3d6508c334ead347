pub mod category;
pub mod department;
pub mod import_log;
pub mod product;
