//! Service layer for the memorials application.
//!
//! This module contains the business logic for:
//! - Memorial data access (`MemorialService`)
//! - Rendered page text (`PageReader`, `ProxyReader`)
//! - AI extraction of post data (`MemorialExtractor`, `LlmExtractor`)
//! - Photo lookup (`ImageExtractor`, `OpenGraphImages`)

mod extractor;
mod images;
mod memorials;
mod reader;

pub use extractor::{LlmExtractor, MemorialExtractor, parse_extraction};
pub use images::{ImageExtractor, OpenGraphImages, find_image};
pub use memorials::MemorialService;
pub use reader::{PageReader, ProxyReader};
