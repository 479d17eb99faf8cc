//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod architect_repo;
pub mod assignment_repo;
pub mod client_repo;
pub mod dashboard_repo;
pub mod user_repo;

pub use architect_repo::ArchitectRepo;
pub use assignment_repo::AssignmentRepo;
pub use client_repo::ClientRepo;
pub use dashboard_repo::DashboardRepo;
pub use user_repo::UserRepo;
