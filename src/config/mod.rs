//! Configuration module for Quote-Sieve
//!
//! The crawl runs from fixed constants. [`Config::default`] carries them, and
//! [`validate`] checks that a configuration is usable before a run starts.
//! Library callers (tests in particular) build `Config` values directly.
//!
//! # Example
//!
//! ```
//! use quote_sieve::config::{validate, Config};
//!
//! let config = Config::default();
//! validate(&config).unwrap();
//! assert_eq!(config.crawler.page_count, 10);
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SourceConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_OUTPUT_PATH,
    DEFAULT_PACING_DELAY, DEFAULT_PAGE_COUNT, DEFAULT_URL_TEMPLATE, DEFAULT_WORKER_COUNT,
    OUTPUT_HEADER, PAGE_PLACEHOLDER,
};

// Re-export validation
pub use validation::validate;
