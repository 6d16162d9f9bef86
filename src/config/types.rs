use serde::Deserialize;

/// Main configuration structure for Apizoo-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Total time budget for a single page request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Time budget for establishing a connection (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum number of pages fetched at the same time
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_concurrent_fetches: default_max_concurrent(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "agent-name")]
    pub agent_name: String,

    /// Version of the scraper
    #[serde(rename = "agent-version")]
    pub agent_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.agent_name, self.agent_version, self.contact_url
        )
    }
}

/// Target catalog repository configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Upstream repository as `owner/name`
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch new submissions are compared against
    #[serde(rename = "base-branch", default = "default_base_branch")]
    pub base_branch: String,

    /// Directory inside the repository holding submission files
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Base URL of the hosting REST API
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the hosting web UI (used for compare links)
    #[serde(rename = "web-url", default = "default_web_url")]
    pub web_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            base_branch: default_base_branch(),
            data_dir: default_data_dir(),
            api_url: default_api_url(),
            web_url: default_web_url(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_concurrent() -> u32 {
    4
}

fn default_repository() -> String {
    "ShishirPatil/gorilla".to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_data_dir() -> String {
    "data/apizoo".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}
