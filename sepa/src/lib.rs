//! SEPA credit transfer support
//!
//! pain.001 (CustomerCreditTransferInitiation) handling for the finance
//! office: generating transfer initiation documents from payment orders,
//! reading settlement metadata back out of uploaded documents, and bundling
//! generated files into downloadable exports.
//!
//! # Standards
//!
//! - ISO 20022: Universal financial industry message scheme
//! - pain.001.001.03: Customer Credit Transfer Initiation
//!
//! # Example
//!
//! ```no_run
//! use sepa::{ExportResult, SepaExport};
//! use chrono::Utc;
//!
//! # fn main() -> sepa::Result<()> {
//! let export = SepaExport::new("vereinsfest", Utc::now())
//!     .with_xml_file("./data/sepa/vereinsfest.xml");
//! let result = ExportResult::build(vec![export])?;
//!
//! let response = result.download_response("transfers", false)?;
//! assert_eq!(response.content_type, "application/xml");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod export;
pub mod pain001;

// Re-exports
pub use config::{Config, InitiatorConfig};
pub use error::{Error, Result};
pub use export::{DownloadResponse, ExportResult, ExportStore, MemoryExportStore, SepaExport};
pub use pain001::{
    Pain001Builder, Pain001Document, Pain001Generator, PaymentInstruction, SettlementMetadata,
};
