pub mod announcement;
pub mod asset;
pub mod attendance;
pub mod employee;
pub mod invoice;
pub mod leave;
pub mod leave_balance;

// Re-export all repositories for easy importing
pub use announcement::AnnouncementRepository;
pub use asset::AssetRepository;
pub use attendance::AttendanceRepository;
pub use employee::{DepartmentHeadcount, EmployeeRepository};
pub use invoice::InvoiceRepository;
pub use leave::LeaveRequestRepository;
pub use leave_balance::LeaveBalanceRepository;
