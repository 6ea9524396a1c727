mod local_store;
mod site_backend;
mod stream_probe;

pub use local_store::LocalStore;
pub use site_backend::{ApiRequest, ApiResponse, Method, RequestBody, SiteBackend};
pub use stream_probe::StreamProbe;
