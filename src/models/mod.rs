pub mod permit;
pub mod risk;
pub mod user;

pub use permit::{Permit, ReportFormat};
pub use risk::RiskDistribution;
pub use user::{User, UserRecord};
