use std::path::PathBuf;
use std::time::Duration;

/// Listing page URL template; `{}` is replaced by the 1-based page number
pub const DEFAULT_URL_TEMPLATE: &str = "http://quotes.toscrape.com/page/{}/";

/// Placeholder substituted with the page number
pub const PAGE_PLACEHOLDER: &str = "{}";

/// Number of listing pages fetched per run
pub const DEFAULT_PAGE_COUNT: u32 = 10;

/// Number of worker threads
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause a worker takes after each page
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

/// Output CSV file
pub const DEFAULT_OUTPUT_PATH: &str = "quotes.csv";

/// Header row of the output CSV file
pub const OUTPUT_HEADER: [&str; 3] = ["Quote", "Author", "Tags"];

/// Main configuration structure for Quote-Sieve
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds the URL of the given 1-based page
    pub fn page_url(&self, page: u32) -> String {
        self.source
            .url_template
            .replacen(PAGE_PLACEHOLDER, &page.to_string(), 1)
    }

    /// Builds the URLs of every page in the run, in page order
    pub fn page_urls(&self) -> Vec<String> {
        (1..=self.crawler.page_count)
            .map(|page| self.page_url(page))
            .collect()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Number of listing pages to fetch (pages 1..=page_count)
    pub page_count: u32,

    /// Number of concurrent worker threads
    pub worker_count: usize,

    /// Timeout applied to each page request
    pub fetch_timeout: Duration,

    /// Delay a worker sleeps after finishing each page
    pub pacing_delay: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_count: DEFAULT_PAGE_COUNT,
            worker_count: DEFAULT_WORKER_COUNT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

/// Where pages come from
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// URL template containing a single `{}` page placeholder
    pub url_template: String,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            user_agent: format!("quote-sieve/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Path to the CSV file; truncated at the start of every run
    pub path: PathBuf,

    /// Header row written before any record
    pub header: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            header: OUTPUT_HEADER.iter().map(|column| column.to_string()).collect(),
        }
    }
}
