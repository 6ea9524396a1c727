use std::sync::Arc;

use crate::app::api::{self, LiveContext};
use crate::app::forms::{FormController, FormStatus};
use crate::domain::{AppError, FormFields, FormKind};

pub async fn run_contact(
    ctx: &LiveContext,
    name: String,
    email: String,
    subject: String,
    message: String,
) -> Result<i32, AppError> {
    let mut popup = api::contact_popup(ctx);
    popup.open();
    popup.form_mut().set_fields(
        FormFields::new()
            .with("name", name)
            .with("email", email)
            .with("subject", subject)
            .with("message", message),
    );

    let status = popup.submit().await;
    Ok(report(status, popup.form().state().message.as_deref()))
}

pub async fn run_form(ctx: &LiveContext, kind: FormKind, pairs: &[String]) -> Result<i32, AppError> {
    let fields = FormFields::parse_pairs(pairs)?;
    submit(ctx, kind, fields).await
}

pub async fn run_newsletter(ctx: &LiveContext, email: String) -> Result<i32, AppError> {
    submit(ctx, FormKind::Newsletter, FormFields::new().with("email", email)).await
}

/// Exit code 1 when the form ends in `Failed`; the message goes to stderr then.
async fn submit(ctx: &LiveContext, kind: FormKind, fields: FormFields) -> Result<i32, AppError> {
    let mut form = FormController::new(Arc::clone(ctx.backend()), kind);
    form.set_fields(fields);

    let status = form.submit().await;
    Ok(report(status, form.state().message.as_deref()))
}

fn report(status: FormStatus, message: Option<&str>) -> i32 {
    let message = message.unwrap_or_default();
    match status {
        FormStatus::Succeeded => {
            println!("✅ {}", message);
            0
        }
        _ => {
            eprintln!("{}", message);
            1
        }
    }
}
