pub mod dashboard;
pub mod hospitals;
pub mod patients;

pub use dashboard::DashboardService;
pub use hospitals::HospitalAdminService;
pub use patients::PatientAdminService;
