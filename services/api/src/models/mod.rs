//! API service models

pub mod content;
pub mod progress;
pub mod user;

// Re-export for convenience
pub use content::{Chapter, Enemy, Item, Story};
pub use progress::{SaveProgressRequest, SavedProgress};
pub use user::{AuthResponse, LoginRequest, SignupRequest, UpdateNameRequest, User, UserResponse};
