pub mod config;
pub mod delay_manager;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod finder;
pub mod input_loader;
pub mod logger;
pub mod pagination;
pub mod search_engine;

// Exporting types for convenience
pub use config::{RunParams, SearchConfig, Settings};
pub use error::{ConfigError, ExportError, FetchError, FinderError, InputError};
pub use extractor::{Extractor, ResultRecord};
pub use finder::{CompanyFinder, CompanyOutcome, CompanyResults, DiscoveryReport, SearchState, StopReason};
pub use search_engine::{HttpFetcher, PageFetcher};
