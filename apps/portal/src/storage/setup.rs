//! Resume bucket setup and the storage round-trip probe.

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::gateway::{BucketConfig, GatewayError, StorageGateway, PDF_MIME};

/// Smallest well-formed PDF, used by the probe.
const PROBE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj<<>>endobj\ntrailer<<>>\n%%EOF\n";

/// Creates the bucket unless it is already listed. Returns whether it was
/// created.
pub async fn ensure_bucket(
    storage: &dyn StorageGateway,
    config: &BucketConfig,
) -> Result<bool, GatewayError> {
    let buckets = storage.list_buckets().await?;
    if buckets.iter().any(|b| *b == config.name) {
        info!("Bucket {} already exists", config.name);
        return Ok(false);
    }
    storage.create_bucket(config).await?;
    info!(
        "Bucket {} created (public: {}, limit: {} bytes)",
        config.name, config.public, config.file_size_limit
    );
    Ok(true)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeReport {
    pub path: String,
    pub uploaded: bool,
    pub downloaded: bool,
    pub deleted: bool,
    pub public_url: String,
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn ok(&self) -> bool {
        self.uploaded && self.downloaded && self.deleted && self.error.is_none()
    }
}

/// Uploads a tiny PDF, reads it back and deletes it. Stops at the first
/// failing step and records the error.
pub async fn probe_bucket(storage: &dyn StorageGateway) -> ProbeReport {
    let path = format!("diagnostics/probe-{}.pdf", Utc::now().timestamp_millis());
    let mut report = ProbeReport {
        path: path.clone(),
        public_url: storage.public_url(&path),
        ..ProbeReport::default()
    };

    if let Err(e) = storage
        .upload(&path, Bytes::from_static(PROBE_PDF), PDF_MIME)
        .await
    {
        warn!("Storage probe upload failed: {e}");
        report.error = Some(e.to_string());
        return report;
    }
    report.uploaded = true;

    match storage.download(&path).await {
        Ok(object) if object.bytes.as_ref() == PROBE_PDF => report.downloaded = true,
        Ok(_) => {
            report.error = Some("downloaded probe does not match upload".to_string());
        }
        Err(e) => {
            warn!("Storage probe download failed: {e}");
            report.error = Some(e.to_string());
        }
    }

    match storage.delete(&path).await {
        Ok(()) => report.deleted = true,
        Err(e) => {
            warn!("Storage probe delete failed: {e}");
            report.error.get_or_insert(e.to_string());
        }
    }
    report
}
