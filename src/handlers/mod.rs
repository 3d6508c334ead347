pub mod health;
pub mod imports;
