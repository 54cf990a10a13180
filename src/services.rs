pub mod activity_service;
pub mod auth;
pub mod client_service;
pub mod dashboard_service;
pub mod database_service;
pub mod document_service;
pub mod invoice_service;
pub mod project_service;
pub mod settings_service;
