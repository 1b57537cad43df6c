pub mod client;
pub mod config;
pub mod crawl;
pub mod csv_source;
pub mod download;
pub mod extract;
pub mod output;

pub use client::HttpClient;
pub use config::AcquireConfig;
pub use crawl::{CrawlError, Crawler};
pub use csv_source::{read_unique_ids, retain_only, CsvSourceError, UNIQUE_ID_COLUMN};
pub use download::ImageDownloader;
