pub mod endpoint;

mod credential;
mod request;
mod translation;
mod user;

pub use credential::*;
pub use request::*;
pub use translation::*;
pub use user::*;
