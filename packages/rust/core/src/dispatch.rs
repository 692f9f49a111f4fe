//! Hand-off from intake to background processing.
//!
//! [`LocalDispatcher`] runs each registration as a tokio task in the current
//! process. At most `max_concurrent_jobs` registrations are processed at once;
//! the rest wait on a semaphore. Failures are logged and never retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use leadscope_crawler::CrawlProvider;
use leadscope_shared::{LeadScopeError, RegisterRequest, RegistrationEvent, RequestId, Result};

use crate::processor::{ProcessedRegistration, RegistrationProcessor};

/// Acknowledgement returned to the caller once a registration is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub request_id: RequestId,
    pub timestamp: DateTime<Utc>,
}

impl From<&RegistrationEvent> for DispatchReceipt {
    fn from(event: &RegistrationEvent) -> Self {
        Self {
            request_id: event.request_id.clone(),
            timestamp: event.timestamp,
        }
    }
}

/// Accepts validated registrations for asynchronous processing.
pub trait RegistrationDispatcher: Send + Sync {
    /// Queue `request`; returns as soon as it is accepted, not when it is done.
    fn dispatch(&self, request: RegisterRequest) -> Result<DispatchReceipt>;
}

/// In-process dispatcher backed by the tokio runtime.
pub struct LocalDispatcher<P> {
    processor: Arc<RegistrationProcessor<P>>,
    permits: Arc<Semaphore>,
    runtime: Handle,
}

impl<P: CrawlProvider + 'static> LocalDispatcher<P> {
    /// Must be called from within a tokio runtime.
    pub fn new(processor: RegistrationProcessor<P>, max_concurrent_jobs: usize) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| LeadScopeError::Dispatch(format!("no tokio runtime: {e}")))?;
        Ok(Self {
            processor: Arc::new(processor),
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
            runtime,
        })
    }

    /// Spawn processing of `event`, returning the task handle.
    pub fn spawn(&self, event: RegistrationEvent) -> JoinHandle<Result<ProcessedRegistration>> {
        let processor = Arc::clone(&self.processor);
        let permits = Arc::clone(&self.permits);

        self.runtime.spawn(async move {
            let request_id = event.request_id.clone();
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return Err(LeadScopeError::Dispatch(e.to_string())),
            };

            match processor.process(event).await {
                Ok(done) => {
                    info!(%request_id, path = %done.path.display(), "background job finished");
                    Ok(done)
                }
                Err(e) => {
                    error!(%request_id, error = %e, "background job failed");
                    Err(e)
                }
            }
        })
    }
}

impl<P: CrawlProvider + 'static> RegistrationDispatcher for LocalDispatcher<P> {
    fn dispatch(&self, request: RegisterRequest) -> Result<DispatchReceipt> {
        let event = RegistrationEvent::new(request);
        let receipt = DispatchReceipt::from(&event);
        if self.permits.available_permits() == 0 {
            warn!(request_id = %receipt.request_id, "all workers busy, registration will wait");
        }

        // Detached; the task logs its own outcome.
        drop(self.spawn(event));
        info!(request_id = %receipt.request_id, "registration dispatched");

        Ok(receipt)
    }
}
