//! Repositories for database operations

pub mod content;
pub mod progress;
pub mod user;

pub use content::ContentRepository;
pub use progress::ProgressRepository;
pub use user::{DuplicateUsername, UserRepository};
