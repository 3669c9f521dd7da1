//! Render an invoice record from a JSON file to a PDF.
//!
//! Usage: `render_invoice <record.json> [output.pdf]`
//!
//! Reads a camelCase invoice record (the upstream wire shape), composes the
//! document, and writes it either to the given output path or to the
//! default storage area. Set `RUST_LOG=debug` for composition logging.

use invoice_press::{Composer, InvoiceRecord, OutputResolver};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(record_path) = args.next() else {
        eprintln!("usage: render_invoice <record.json> [output.pdf]");
        return ExitCode::FAILURE;
    };
    let explicit = args.next().map(PathBuf::from);

    match run(&record_path, explicit).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            log::error!("{}", e);
            eprintln!("render_invoice: {}", e);
            ExitCode::FAILURE
        },
    }
}

async fn run(record_path: &str, explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let json = tokio::fs::read_to_string(record_path).await?;
    let record: InvoiceRecord = serde_json::from_str(&json)?;

    let bytes = Composer::new().compose(&record)?;
    let destination = OutputResolver::default().resolve(&record.id, explicit).await?;
    tokio::fs::write(&destination, &bytes).await?;
    Ok(destination)
}
