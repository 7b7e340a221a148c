pub mod auth;
pub use auth::AuthService;
pub mod document_service;
pub use document_service::DocumentService;
pub mod provisioning_service;
pub use provisioning_service::ProvisioningService;
