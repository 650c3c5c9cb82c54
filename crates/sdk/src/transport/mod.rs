//! Transport layer for the Cook SDK.

pub mod http;

pub use http::HttpTransport;
