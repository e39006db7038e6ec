mod auth_service_impl;
mod catalog_service_impl;
mod reports_service_impl;
mod translation_service_impl;

pub use auth_service_impl::*;
pub use catalog_service_impl::*;
pub use reports_service_impl::*;
pub use translation_service_impl::*;
