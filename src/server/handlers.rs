//! HTTP request handlers.
//!
//! The upload handler is the only place errors become user-facing text:
//! form rejections and pipeline failures all land in a flash message on a
//! redirect back to the form, and never take the server down.

use crate::dispatch::{DispatchOptions, Dispatcher, ThreadPacing};
use crate::error::{UploadError, UploadResult};
use crate::loader;
use crate::report::SkipReport;
use crate::server::upload::{validate_extension, SavedUpload};
use crate::server::AppState;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result as ActixResult};
use futures::StreamExt;
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    flash: Option<String>,
}

/// Render the upload form. No side effects; an optional `flash` query
/// parameter is escaped and shown as a status banner.
pub async fn index(query: web::Query<IndexQuery>) -> HttpResponse {
    let banner = query
        .flash
        .as_deref()
        .map(|msg| format!("  <p class=\"flash\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_form(&banner))
}

/// Liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Accept the multipart upload and run the dispatch pipeline.
///
/// Rejections (missing file, empty message, bad extension) redirect before
/// anything touches disk. The pipeline itself blocks for the whole batch,
/// so it runs on a blocking worker thread; its temp file is owned by a
/// guard that deletes it on every exit path.
pub async fn upload(state: web::Data<AppState>, payload: Multipart) -> ActixResult<HttpResponse> {
    let form = match read_form(payload).await {
        Ok(form) => form,
        Err(e) => return Ok(redirect_with_flash(&e.to_string())),
    };

    if let Err(e) = validate_extension(&form.filename, &state.config) {
        return Ok(redirect_with_flash(&e.to_string()));
    }

    let worker_state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || process_batch(&worker_state, form)).await;

    let flash = match outcome {
        Ok(Ok((sent_count, report_path))) => format!(
            "Messages sent successfully! Sent count: {}. Skipped contacts saved to: {}",
            sent_count,
            report_path.display()
        ),
        Ok(Err(e)) => {
            error!("batch processing failed: {:#}", e);
            format!("An error occurred: {}", e)
        }
        Err(e) => {
            error!("batch worker panicked: {}", e);
            "An error occurred: internal failure".to_string()
        }
    };

    Ok(redirect_with_flash(&flash))
}

/// The fields of one submitted upload form.
struct UploadForm {
    filename: String,
    bytes: Vec<u8>,
    message: String,
}

/// Drain the multipart payload and enforce field presence.
async fn read_form(mut payload: Multipart) -> UploadResult<UploadForm> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut message: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(multipart_error)?;

        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field_name.as_str() {
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(multipart_error)?;
                    bytes.extend_from_slice(&chunk);
                }
                file = Some((filename, bytes));
            }
            "message" => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(multipart_error)?;
                    bytes.extend_from_slice(&chunk);
                }
                message = Some(String::from_utf8_lossy(&bytes).to_string());
            }
            _ => {
                // Drain unknown fields
                while field.next().await.is_some() {}
            }
        }
    }

    let (filename, bytes) = file.ok_or(UploadError::MissingFile)?;
    if filename.is_empty() {
        return Err(UploadError::EmptyFilename);
    }

    let message = message.unwrap_or_default().trim().to_string();
    if message.is_empty() {
        return Err(UploadError::MissingMessage);
    }

    Ok(UploadForm {
        filename,
        bytes,
        message,
    })
}

fn multipart_error(e: actix_multipart::MultipartError) -> UploadError {
    UploadError::Io(io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// Persist the upload, load contacts, dispatch, and write the skip report.
///
/// Runs on a blocking worker thread: the dispatch loop sleeps between
/// sends and the gateway client is synchronous. The `SavedUpload` guard
/// removes the temp file whether this returns Ok or Err.
fn process_batch(state: &AppState, form: UploadForm) -> anyhow::Result<(usize, PathBuf)> {
    let saved = SavedUpload::persist(&state.config.upload_dir, &form.filename, &form.bytes)?;

    let batch = loader::load_contacts_from_path(saved.path())?;
    info!("dispatching batch of {} contacts", batch.len());

    let dispatcher = Dispatcher::new(
        state.sender.clone(),
        DispatchOptions::from_config(&state.config),
    );
    let mut pacing = ThreadPacing;
    let summary = dispatcher.run(&batch, &form.message, &mut pacing);

    state.metrics.record_messages_sent(summary.sent_count);
    state.metrics.record_contacts_skipped(summary.skipped_count());
    info!(
        "batch finished: {} sent, {} skipped of {}",
        summary.sent_count,
        summary.skipped_count(),
        summary.total
    );

    let report_path = SkipReport::from_summary(&summary).write_to_dir(&state.config.report_dir)?;
    Ok((summary.sent_count, report_path))
}

/// 303 redirect to the form with the message in the flash query parameter.
fn redirect_with_flash(message: &str) -> HttpResponse {
    let location = format!("/?flash={}", urlencoding::encode(message));
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn render_form(banner: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Bulk Sender</title>
  <style>
    body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
    .flash {{ background: #eef; border: 1px solid #99c; padding: 0.5rem; }}
    label {{ display: block; margin-top: 1rem; }}
  </style>
</head>
<body>
  <h1>Bulk Sender</h1>
{}  <form action="/upload" method="post" enctype="multipart/form-data">
    <label>Contact list (CSV, name and phone per row)
      <input type="file" name="file" accept=".csv">
    </label>
    <label>Message
      <textarea name="message" rows="4" cols="50"></textarea>
    </label>
    <button type="submit">Send</button>
  </form>
</body>
</html>
"#,
        banner
    )
}
