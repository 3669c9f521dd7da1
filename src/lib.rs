//! # invoice_press
//!
//! Invoice PDF composition and delivery.
//!
//! The crate turns a fully-populated [`InvoiceRecord`] into a paginated
//! PDF document with a deterministic layout, decides where the rendered
//! bytes land, and hands callers a flow-controlled download of the result.
//! Transaction lookup, persistence, routing, and authentication are
//! external collaborators reached through the [`InvoiceSource`] seam.
//!
//! ## Components
//!
//! - [`format`]: pure display formatting (dates, currency, status codes)
//! - [`pdf`]: the document encoder (objects, content streams, assembly)
//! - [`Composer`]: invoice record to document bytes, deterministic
//! - [`OutputResolver`]: destination paths under the storage area
//! - [`DeliveryGateway`]: the generate and download boundary operations
//!
//! ## Quick start
//!
//! ```ignore
//! use invoice_press::{Composer, DeliveryGateway, OutputResolver};
//!
//! let gateway = DeliveryGateway::new(my_source, Composer::new(), OutputResolver::default());
//! let response = gateway.generate("tx-123").await;
//! assert!(response.success);
//!
//! let download = gateway.download("tx-123").await?;
//! download.copy_to(&mut response_body).await?;
//! ```

#![warn(missing_docs)]

pub mod compose;
pub mod error;
pub mod format;
pub mod gateway;
pub mod pdf;
pub mod record;
pub mod resolve;

pub use compose::Composer;
pub use error::{Error, Result};
pub use gateway::{DeliveryGateway, Download, GenerateResponse, InvoiceSource, PDF_MEDIA_TYPE};
pub use record::{InvoiceRecord, LineItem, Party, ProjectSummary};
pub use resolve::{OutputResolver, DEFAULT_STORAGE_DIR};
