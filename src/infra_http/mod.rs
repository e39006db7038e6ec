mod transport_reqwest;

pub use transport_reqwest::*;
