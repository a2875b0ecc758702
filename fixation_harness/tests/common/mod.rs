pub mod test_server;

pub use test_server::{TestApp, TestServer};
