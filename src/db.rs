pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
