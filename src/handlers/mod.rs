pub mod ai;
pub mod announcements;
pub mod assets;
pub mod attendance;
pub mod auth;
pub mod employees;
pub mod holidays;
pub mod invoices;
pub mod leave;
pub mod retention;
pub mod shared;
