mod fake_backend;
mod fake_stream_probe;

pub use fake_backend::FakeBackend;
pub use fake_stream_probe::FakeStreamProbe;
