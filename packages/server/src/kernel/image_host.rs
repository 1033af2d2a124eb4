//! Cloudinary image host.
//!
//! Uses the signed upload API: parameters are sorted, joined as `k=v&k=v`,
//! suffixed with the API secret and hashed with SHA-256.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::kernel::traits::{BaseImageHost, ImageUpload};

const UPLOAD_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryImageHost {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct UploadErrorBody {
    error: UploadErrorMessage,
}

#[derive(Deserialize)]
struct UploadErrorMessage {
    message: String,
}

impl CloudinaryImageHost {
    pub fn new(cloud_name: String, api_key: String, api_secret: String, folder: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name,
            api_key,
            api_secret,
            folder,
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", UPLOAD_BASE_URL, self.cloud_name)
    }
}

/// Sign upload parameters. `params` must not include file, api_key or signature.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl BaseImageHost for CloudinaryImageHost {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.api_secret,
        );

        debug!(
            file_name = %image.file_name,
            bytes = image.bytes.len(),
            "Uploading event image"
        );

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .context("Invalid image content type")?;

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("Image upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<UploadErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(anyhow!("Image host rejected upload ({}): {}", status, message));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Malformed image host response")?;
        info!(url = %uploaded.secure_url, "Event image uploaded");
        Ok(uploaded.secure_url)
    }
}
