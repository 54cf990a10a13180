pub mod activity;
pub mod auth;
pub mod clients;
pub mod currencies;
pub mod dashboard;
pub mod database;
pub mod documents;
pub mod files;
pub mod invoices;
pub mod projects;
pub mod settings;
