use receiptvault_core::validation::validator::{
    DEFAULT_EXPECTED_TAX_RATE, DEFAULT_TAX_RATE_TOLERANCE,
};
use receiptvault_core::validation::ValidationConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Default monthly budget for burn-rate reporting.
    pub monthly_budget: f64,
    /// Tax-rate rule parameters.
    pub validation: ValidationConfig,
    /// Vision extraction endpoint; absent when no API key is configured,
    /// in which case ingestion falls back to the OCR text parser.
    pub vision: Option<VisionConfig>,
}

/// Connection details for the AI vision extraction API.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                              |
    /// |------------------------|------------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                            |
    /// | `PORT`                 | `3000`                                               |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                                 |
    /// | `MONTHLY_BUDGET`       | `50000`                                              |
    /// | `EXPECTED_TAX_RATE`    | `0.08`                                               |
    /// | `TAX_RATE_TOLERANCE`   | `0.05`                                               |
    /// | `VISION_API_KEY`       | unset (disables vision extraction)                   |
    /// | `VISION_API_URL`       | `https://generativelanguage.googleapis.com/v1beta`   |
    /// | `VISION_MODEL`         | `gemini-1.5-flash`                                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let monthly_budget: f64 = std::env::var("MONTHLY_BUDGET")
            .unwrap_or_else(|_| "50000".into())
            .parse()
            .expect("MONTHLY_BUDGET must be a number");

        let expected_tax_rate: f64 = std::env::var("EXPECTED_TAX_RATE")
            .unwrap_or_else(|_| DEFAULT_EXPECTED_TAX_RATE.to_string())
            .parse()
            .expect("EXPECTED_TAX_RATE must be a number");

        let tax_rate_tolerance: f64 = std::env::var("TAX_RATE_TOLERANCE")
            .unwrap_or_else(|_| DEFAULT_TAX_RATE_TOLERANCE.to_string())
            .parse()
            .expect("TAX_RATE_TOLERANCE must be a number");

        let vision = std::env::var("VISION_API_KEY").ok().map(|api_key| {
            let api_url = std::env::var("VISION_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
            let model =
                std::env::var("VISION_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into());
            VisionConfig {
                api_url,
                api_key,
                model,
            }
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            monthly_budget,
            validation: ValidationConfig {
                expected_tax_rate,
                tax_rate_tolerance,
            },
            vision,
        }
    }
}
