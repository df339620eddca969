pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::PatientError;
pub use router::patient_routes;
