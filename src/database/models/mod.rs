pub mod announcement;
pub mod asset;
pub mod attendance;
pub mod auth;
pub mod balance;
pub mod employee;
pub mod invoice;
pub mod leave;
pub mod macros;

// Re-export all models for easy importing
pub use announcement::*;
pub use asset::*;
pub use attendance::*;
pub use auth::*;
pub use balance::*;
pub use employee::*;
pub use invoice::*;
pub use leave::*;
