// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile image storage and serving.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/upload/{img}", get(get_image))
}

/// A bare file name: no separators, no parent references, not hidden.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..")
}

/// True when the extension maps to an `image/*` media type.
pub fn is_image_file_name(name: &str) -> bool {
    mime_guess::from_path(name)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE)
}

fn image_path(upload_dir: &str, name: &str) -> PathBuf {
    std::path::Path::new(upload_dir).join(name)
}

/// Write an uploaded image into the upload directory.
///
/// Never overwrites: an existing file with the same name is a 400.
pub async fn store_image(upload_dir: &str, name: &str, bytes: &[u8]) -> Result<()> {
    if !is_safe_file_name(name) || !is_image_file_name(name) {
        return Err(AppError::BadRequest(format!("Invalid image name {:?}", name)));
    }

    let path = image_path(upload_dir, name);
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(AppError::BadRequest(format!("Image {} already exists", name)));
        }
        Err(e) => {
            return Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("creating {}", path.display())),
            ));
        }
    };

    let written = async {
        file.write_all(bytes).await?;
        file.sync_all().await
    }
    .await;
    if let Err(e) = written {
        remove_image(upload_dir, name).await;
        return Err(AppError::Internal(
            anyhow::Error::new(e).context(format!("writing {}", path.display())),
        ));
    }

    tracing::info!(image = %name, size = bytes.len(), "Stored profile image");
    Ok(())
}

/// Best-effort removal of a stored image.
pub async fn remove_image(upload_dir: &str, name: &str) {
    let path = image_path(upload_dir, name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove image");
    }
}

async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(img): Path<String>,
) -> Result<impl IntoResponse> {
    if !is_safe_file_name(&img) {
        return Err(AppError::BadRequest(format!("Invalid image name {:?}", img)));
    }

    let path = image_path(&state.config.upload_dir, &img);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Image {} not found", img)));
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::Error::new(e).context(format!(
                "reading {}",
                path.display()
            ))));
        }
    };

    let content_type = mime_guess::from_path(&img).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, content_type.to_string())], bytes))
}
