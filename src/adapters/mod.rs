pub mod filesystem_local_store;
pub mod memory_local_store;
pub mod site_backend_http;
pub mod stream_probe_http;

pub use filesystem_local_store::FileLocalStore;
pub use memory_local_store::MemoryLocalStore;
pub use site_backend_http::HttpSiteBackend;
pub use stream_probe_http::HttpStreamProbe;
