pub mod audit;
pub mod import_service;
