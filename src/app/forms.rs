//! Generic form submission flow shared by contact, donation, pledge and newsletter forms.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::{AppError, FormEncoding, FormFields, FormKind, GENERIC_FAILURE_MESSAGE};
use crate::ports::{ApiRequest, SiteBackend};

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything a form component renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub fields: FormFields,
    pub status: FormStatus,
    pub message: Option<String>,
    pub submit_enabled: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: FormFields::new(),
            status: FormStatus::Idle,
            message: None,
            submit_enabled: true,
        }
    }
}

/// Drives one form: collect fields, POST, show the outcome.
pub struct FormController<B: SiteBackend> {
    backend: Arc<B>,
    kind: FormKind,
    state: FormState,
}

impl<B: SiteBackend> FormController<B> {
    pub fn new(backend: Arc<B>, kind: FormKind) -> Self {
        Self { backend, kind, state: FormState::default() }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.state.fields.set(name, value);
    }

    pub fn set_fields(&mut self, fields: FormFields) {
        for (name, value) in fields.iter() {
            self.state.fields.set(name, value);
        }
    }

    /// Submit the current fields.
    ///
    /// Success clears the fields and shows the form's thank-you text. Any failure
    /// keeps the fields and shows a generic message; the underlying error is only
    /// logged. Nothing is retried.
    pub async fn submit(&mut self) -> FormStatus {
        self.state.message = None;

        if let Err(err) = self.state.fields.require(self.kind.required_fields()) {
            tracing::info!(form = %self.kind, error = %err, "form not submitted");
            self.state.status = FormStatus::Failed;
            self.state.message = Some(err.user_message().to_string());
            return self.state.status;
        }

        self.state.status = FormStatus::Submitting;
        self.state.submit_enabled = false;

        let accepted = match self.send().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(form = %self.kind, error = %err, "form submission failed");
                self.kind.success_policy().tolerates_transport_failure()
            }
        };

        if accepted {
            tracing::info!(form = %self.kind, "form submitted");
            self.state.status = FormStatus::Succeeded;
            self.state.message = Some(self.kind.success_message().to_string());
            self.state.fields.clear();
        } else {
            self.state.status = FormStatus::Failed;
            self.state.message = Some(GENERIC_FAILURE_MESSAGE.to_string());
        }

        self.state.submit_enabled = true;
        self.state.status
    }

    async fn send(&self) -> Result<bool, AppError> {
        let path = self.kind.endpoint();
        let request = match self.kind.encoding() {
            FormEncoding::Json => ApiRequest::post_json(path, self.state.fields.to_json()),
            FormEncoding::Multipart => ApiRequest::post_multipart(
                path,
                self.state.fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ),
        };

        let response = self.backend.send(request).await?;
        let accepted = self.kind.success_policy().accepts(response.status, &response.body);
        if !accepted {
            tracing::warn!(form = %self.kind, status = response.status, "form rejected by backend");
        }
        Ok(accepted)
    }
}

/// Contact form shown in a popup that closes itself after a successful send.
pub struct ContactPopup<B: SiteBackend> {
    form: FormController<B>,
    open: Arc<AtomicBool>,
    auto_close: Duration,
    close_task: Option<JoinHandle<()>>,
}

impl<B: SiteBackend> ContactPopup<B> {
    pub fn new(backend: Arc<B>, auto_close: Duration) -> Self {
        Self {
            form: FormController::new(backend, FormKind::Contact),
            open: Arc::new(AtomicBool::new(false)),
            auto_close,
            close_task: None,
        }
    }

    pub fn open(&mut self) {
        self.cancel_auto_close();
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn close(&mut self) {
        self.cancel_auto_close();
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn form(&self) -> &FormController<B> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController<B> {
        &mut self.form
    }

    /// Submit the contact form; on success schedule the popup to close.
    pub async fn submit(&mut self) -> FormStatus {
        let status = self.form.submit().await;
        if status == FormStatus::Succeeded {
            self.cancel_auto_close();
            let open = Arc::clone(&self.open);
            let delay = self.auto_close;
            self.close_task = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                open.store(false, Ordering::SeqCst);
            }));
        }
        status
    }

    fn cancel_auto_close(&mut self) {
        if let Some(task) = self.close_task.take() {
            task.abort();
        }
    }
}

impl<B: SiteBackend> Drop for ContactPopup<B> {
    fn drop(&mut self) {
        self.cancel_auto_close();
    }
}
