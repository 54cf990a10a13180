pub mod activity;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod invoice;
pub mod project;
pub mod settings;
