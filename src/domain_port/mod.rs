mod credential_store;
mod transport;

pub use credential_store::*;
pub use transport::*;
