/// Board and tile persistence backends.
pub mod board_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
