pub mod currency;
pub mod data_table;
pub mod error;
pub mod i18n;
pub mod listing;
pub mod payments;
pub mod resource_path;
