pub mod data_url;
pub mod save;
pub mod upload;
