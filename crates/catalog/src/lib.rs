mod catalog;
pub mod crawl;
pub mod error;

pub use crate::catalog::{Catalog, Initialized, Status};
pub use crate::crawl::{CrawlEvent, CrawlSummary};
pub use itemdb_extract::Item;
pub use itemdb_extract::models::Record;
