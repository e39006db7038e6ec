mod auth_service;
mod catalog_service;
mod reports_service;
mod translation_service;

pub use auth_service::*;
pub use catalog_service::*;
pub use reports_service::*;
pub use translation_service::*;
