mod credential_store_memory;
mod transport_scripted;

pub use credential_store_memory::*;
pub use transport_scripted::*;
