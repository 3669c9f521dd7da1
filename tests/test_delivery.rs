//! Gateway tests: the generate envelope, streamed download, and the
//! atomic-write guarantee, run against a stub invoice source and a
//! temporary storage area.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use invoice_press::{
    Composer, DeliveryGateway, Error, InvoiceRecord, InvoiceSource, LineItem, OutputResolver,
    Party, ProjectSummary, Result, PDF_MEDIA_TYPE,
};
use std::path::Path;

struct StubSource;

#[async_trait]
impl InvoiceSource for StubSource {
    async fn invoice_for_transaction(&self, transaction_id: &str) -> Result<InvoiceRecord> {
        Ok(sample_record(transaction_id))
    }
}

struct MissingSource;

#[async_trait]
impl InvoiceSource for MissingSource {
    async fn invoice_for_transaction(&self, transaction_id: &str) -> Result<InvoiceRecord> {
        Err(Error::NotFound(format!(
            "transaction {} not found",
            transaction_id
        )))
    }
}

fn sample_record(transaction_id: &str) -> InvoiceRecord {
    InvoiceRecord {
        id: "inv-42".to_string(),
        invoice_number: "INV-2024-042".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap(),
        due_date: None,
        transaction_id: transaction_id.to_string(),
        transaction_hash: "0xfeedface".to_string(),
        amount: 50.0,
        currency: "USD".to_string(),
        status: "completed".to_string(),
        client: Party {
            id: "client-1".to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.test".to_string(),
            address: None,
            wallet_address: None,
        },
        freelancer: Party {
            id: "freelancer-1".to_string(),
            name: "Jo Developer".to_string(),
            email: "jo@freelance.test".to_string(),
            address: None,
            wallet_address: None,
        },
        project: ProjectSummary {
            id: "project-1".to_string(),
            title: "Gateway work".to_string(),
            description: "Short engagement.".to_string(),
        },
        items: vec![LineItem {
            description: "Consulting".to_string(),
            quantity: 1,
            unit_price: 50.0,
            total: 50.0,
        }],
        subtotal: 50.0,
        tax: None,
        tax_rate: None,
        total: 50.0,
    }
}

fn gateway_in<S: InvoiceSource>(source: S, root: &Path) -> DeliveryGateway<S> {
    DeliveryGateway::new(source, Composer::new(), OutputResolver::new(root))
}

fn no_partial_files(root: &Path) {
    for entry in std::fs::read_dir(root).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().to_string();
        assert!(!name.ends_with(".part"), "leftover partial file {}", name);
    }
}

#[tokio::test]
async fn test_generate_writes_document_and_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(StubSource, dir.path());

    let response = gateway.generate("tx-1").await;
    assert!(response.success);
    assert_eq!(response.message, "Invoice generated successfully");

    let path = response.file_path.expect("path on success");
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    no_partial_files(dir.path());
}

#[tokio::test]
async fn test_generate_envelope_wire_shape() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(StubSource, dir.path());

    let response = gateway.generate("tx-1").await;
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["filePath"].is_string());
}

#[tokio::test]
async fn test_repeated_generation_yields_distinct_destinations() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(StubSource, dir.path());

    let first = gateway.generate("tx-1").await.file_path.unwrap();
    let second = gateway.generate("tx-1").await.file_path.unwrap();
    assert_ne!(first, second);
    assert!(Path::new(&first).exists());
    assert!(Path::new(&second).exists());
}

#[tokio::test]
async fn test_generate_failure_folds_into_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(MissingSource, dir.path());

    let response = gateway.generate("tx-gone").await;
    assert!(!response.success);
    assert!(response.message.contains("tx-gone"));
    assert!(response.file_path.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("filePath").is_none());
}

#[tokio::test]
async fn test_download_metadata_and_streamed_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(StubSource, dir.path());

    let download = gateway.download("tx-1").await.unwrap();
    assert_eq!(download.content_type, PDF_MEDIA_TYPE);
    assert!(download.filename.starts_with("invoice-inv-42-"));
    assert!(download.filename.ends_with(".pdf"));

    let expected_len = download.content_length;
    let mut body = Vec::new();
    let copied = download.copy_to(&mut body).await.unwrap();
    assert_eq!(copied, expected_len);
    assert_eq!(body.len() as u64, expected_len);
    assert!(body.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_download_regenerates_on_each_call() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(StubSource, dir.path());

    let first = gateway.download("tx-1").await.unwrap();
    let second = gateway.download("tx-1").await.unwrap();
    assert_ne!(first.filename, second.filename);
}

#[tokio::test]
async fn test_download_failure_is_an_error_not_an_empty_stream() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = gateway_in(MissingSource, dir.path());

    let err = gateway.download("tx-gone").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    no_partial_files(dir.path());
}

#[tokio::test]
async fn test_storage_area_created_on_first_generate() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("uploads").join("invoices");
    let gateway = gateway_in(StubSource, &root);

    let response = gateway.generate("tx-1").await;
    assert!(response.success);
    assert!(root.is_dir());
}
