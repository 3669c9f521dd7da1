//! Delivery gateway: generate and download operations.
//!
//! The boundary component the (external) HTTP layer calls into. It owns no
//! routing or persistence; the invoice record arrives through an
//! [`InvoiceSource`] collaborator, and the gateway orchestrates the
//! composer and the output resolver around it. All dependencies are passed
//! at construction.

use crate::compose::Composer;
use crate::error::{Error, Result};
use crate::record::InvoiceRecord;
use crate::resolve::OutputResolver;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Media type of delivered documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// External collaborator that assembles the invoice record for a
/// transaction (lookup of transaction, user, and project records happens
/// behind this seam).
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    /// Build the fully-populated invoice record for a transaction.
    async fn invoice_for_transaction(&self, transaction_id: &str) -> Result<InvoiceRecord>;
}

/// Result envelope of the `generate` operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Whether generation succeeded.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// Destination of the rendered document, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// A streamable download of a rendered invoice.
///
/// Holds an open file handle rather than the file's bytes; content is
/// piped to the consumer with flow control instead of being buffered
/// whole in memory.
#[derive(Debug)]
pub struct Download {
    /// Always [`PDF_MEDIA_TYPE`].
    pub content_type: &'static str,
    /// Suggested filename: the destination's last path segment
    /// (`invoice-<id>-<timestamp>.pdf`).
    pub filename: String,
    /// Size of the document in bytes.
    pub content_length: u64,
    file: tokio::fs::File,
}

impl Download {
    /// Pipe the document bytes into a writer, honoring its back-pressure.
    ///
    /// Returns the number of bytes copied.
    pub async fn copy_to<W: AsyncWrite + Unpin>(mut self, writer: &mut W) -> Result<u64> {
        let copied = tokio::io::copy(&mut self.file, writer).await?;
        writer.flush().await?;
        Ok(copied)
    }

    /// Take the underlying reader for integration with streaming bodies.
    pub fn into_reader(self) -> tokio::fs::File {
        self.file
    }
}

/// Orchestrates composition, storage, and streamed delivery.
pub struct DeliveryGateway<S> {
    source: S,
    composer: Composer,
    resolver: OutputResolver,
    write_timeout: Duration,
}

impl<S: InvoiceSource> DeliveryGateway<S> {
    /// Create a gateway with a 30 second bound on write completion.
    pub fn new(source: S, composer: Composer, resolver: OutputResolver) -> Self {
        Self {
            source,
            composer,
            resolver,
            write_timeout: Duration::from_secs(30),
        }
    }

    /// Override the bounded wait for write completion.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Generate the invoice document for a transaction.
    ///
    /// Always returns an envelope; internal errors are logged and folded
    /// into `success: false` rather than propagated.
    pub async fn generate(&self, transaction_id: &str) -> GenerateResponse {
        match self.generate_document(transaction_id).await {
            Ok(path) => GenerateResponse {
                success: true,
                message: "Invoice generated successfully".to_string(),
                file_path: Some(path.to_string_lossy().into_owned()),
            },
            Err(e) => {
                log::error!("Error generating invoice for {}: {}", transaction_id, e);
                GenerateResponse {
                    success: false,
                    message: e.to_string(),
                    file_path: None,
                }
            },
        }
    }

    /// Generate and open the document for streaming delivery.
    ///
    /// Generation runs fresh on every call (always-regenerate; no cached
    /// retrieval). Fails with [`Error::NotFound`] if the freshly written
    /// destination cannot be opened.
    pub async fn download(&self, transaction_id: &str) -> Result<Download> {
        let path = self.generate_document(transaction_id).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| Error::NotFound(format!("no invoice at {}", path.display())))?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|_| Error::NotFound(format!("no invoice at {}", path.display())))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "invoice.pdf".to_string());

        Ok(Download {
            content_type: PDF_MEDIA_TYPE,
            filename,
            content_length: metadata.len(),
            file,
        })
    }

    /// Compose the record's document and persist it at the resolved
    /// destination.
    async fn generate_document(&self, transaction_id: &str) -> Result<PathBuf> {
        let record = self.source.invoice_for_transaction(transaction_id).await?;
        let bytes = self.composer.compose(&record)?;
        let destination = self.resolver.resolve(&record.id, None).await?;
        self.write_atomic(&destination, &bytes).await?;
        log::info!("Invoice generated successfully: {}", destination.display());
        Ok(destination)
    }

    /// Write bytes to a `.part` sibling and rename into place, under the
    /// bounded write timeout. A failed or timed-out write never leaves a
    /// truncated file at the advertised destination.
    async fn write_atomic(&self, destination: &Path, bytes: &[u8]) -> Result<()> {
        let mut part = destination.as_os_str().to_owned();
        part.push(".part");
        let part = PathBuf::from(part);

        let write = async {
            tokio::fs::write(&part, bytes).await?;
            tokio::fs::rename(&part, destination).await
        };

        match tokio::time::timeout(self.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(Error::StorageWrite(format!(
                    "{}: {}",
                    destination.display(),
                    e
                )))
            },
            Err(_) => {
                let _ = tokio::fs::remove_file(&part).await;
                Err(Error::WriteTimeout(self.write_timeout.as_millis() as u64))
            },
        }
    }
}
