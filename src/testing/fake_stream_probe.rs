use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use url::Url;

use crate::domain::AppError;
use crate::ports::StreamProbe;

#[derive(Clone, Default)]
pub struct FakeStreamProbe {
    working: bool,
    probes: Arc<AtomicUsize>,
}

impl FakeStreamProbe {
    pub fn working() -> Self {
        Self { working: true, probes: Arc::default() }
    }

    pub fn broken() -> Self {
        Self { working: false, probes: Arc::default() }
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProbe for FakeStreamProbe {
    async fn probe(&self, _stream_url: &Url) -> Result<(), AppError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.working {
            Ok(())
        } else {
            Err(AppError::http("stream offline (fake)", Some(503)))
        }
    }
}
