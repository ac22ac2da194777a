pub mod connection;
pub mod helper;
pub mod models;

// Re-export commonly used types
pub use helper::SqliteHelper;
pub use models::JobRow;
