//! Authenticated request pipeline: token attachment, single-flight refresh
//! and session termination.

mod authenticated_client;
mod dispatcher;
mod error;
mod refresh_coordinator;
mod session_terminator;

pub use authenticated_client::*;
pub use dispatcher::Dispatcher;
pub use error::*;
pub use refresh_coordinator::*;
pub use session_terminator::*;
