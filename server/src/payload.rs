use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, rejection::JsonRejection},
    http::header::CONTENT_TYPE,
};
use platform_api::ApiError;
use products_hr::EmployeeFields;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::http::AppState;

const PROFILE_PIC_FIELD: &str = "profilePic";
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// JSON body whose rejections render as an error envelope.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Employee fields from either a JSON or a multipart body.
///
/// A multipart `profilePic` file part is written to the upload directory
/// before the handler runs; `upload` points at it so the handler can remove it
/// when the write to the store does not go through.
#[derive(Debug)]
pub struct EmployeePayload {
    pub fields: EmployeeFields,
    pub upload: Option<PathBuf>,
}

impl EmployeePayload {
    /// Delete the stored upload, if any. Used when the record was not persisted.
    pub async fn discard_upload(&self) {
        if let Some(path) = &self.upload
            && let Err(err) = tokio::fs::remove_file(path).await
        {
            warn!(path = %path.display(), error = %err, "failed to remove orphaned upload");
        }
    }
}

impl FromRequest<AppState> for EmployeePayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let JsonBody(fields) = JsonBody::<EmployeeFields>::from_request(req, state).await?;
            return Ok(Self {
                fields,
                upload: None,
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        let mut payload = Self {
            fields: EmployeeFields::default(),
            upload: None,
        };
        // A file stored before a later part fails must not outlive the request.
        match read_multipart(multipart, &state.config.upload_dir, &mut payload).await {
            Ok(()) => Ok(payload),
            Err(err) => {
                payload.discard_upload().await;
                Err(err)
            }
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    upload_dir: &Path,
    payload: &mut EmployeePayload,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_owned);

        if name == PROFILE_PIC_FIELD
            && let Some(file_name) = file_name
        {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| ApiError::BadRequest(err.body_text()))?;
            // Browsers send an empty part when no file was chosen.
            if bytes.is_empty() || file_name.is_empty() {
                continue;
            }
            if payload.upload.is_some() {
                return Err(ApiError::BadRequest(
                    "Only one profile picture can be uploaded".into(),
                ));
            }
            let stored = store_upload(upload_dir, &file_name, &bytes).await?;
            payload.fields.profile_pic = Some(format!("/uploads/{}", stored.file_name));
            payload.upload = Some(stored.path);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;
        if name == PROFILE_PIC_FIELD && payload.upload.is_some() {
            debug!("uploaded file takes precedence over profilePic text");
            continue;
        }
        if !payload.fields.set(&name, value) {
            debug!(field = %name, "ignoring unknown multipart field");
        }
    }
    Ok(())
}

struct StoredUpload {
    file_name: String,
    path: PathBuf,
}

fn image_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

async fn store_upload(dir: &Path, original: &str, bytes: &[u8]) -> Result<StoredUpload, ApiError> {
    let extension = image_extension(original).ok_or_else(|| {
        ApiError::BadRequest("Profile picture must be a png, jpg, jpeg, gif or webp image".into())
    })?;
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest(
            "Profile picture must be 5 MB or smaller".into(),
        ));
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(ApiError::internal)?;
    let file_name = format!("{}.{extension}", Uuid::new_v4());
    let path = dir.join(&file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(ApiError::internal)?;
    debug!(path = %path.display(), size = bytes.len(), "profile picture stored");
    Ok(StoredUpload { file_name, path })
}
