use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub api_server: ServerConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub max_connections: u32,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Postgres,
    Supabase,
    /// Stub store: reads come back empty, inserts are rejected
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Publishable (anon) API key
    pub key: String,
    #[serde(default = "SupabaseConfig::default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin is allowed.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl SupabaseConfig {
    fn default_table() -> String {
        "analytics".to_string()
    }
}

impl StoreConfig {
    const fn default_max_connections() -> u32 {
        5
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset, matching how the site treats missing keys
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase_url = var("SUPABASE_URL").or_else(|| var("VITE_SUPABASE_URL"));
        let supabase_key =
            var("SUPABASE_KEY").or_else(|| var("VITE_SUPABASE_PUBLISHABLE_KEY"));
        let supabase_table = var("SUPABASE_TABLE").unwrap_or_else(SupabaseConfig::default_table);

        let supabase = match (supabase_url, supabase_key) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key,
                table: supabase_table,
            }),
            _ => None,
        };

        let mut backend = match var("STORE_BACKEND") {
            Some(value) => match value.to_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "supabase" => StoreBackend::Supabase,
                "disabled" | "none" | "mock" => StoreBackend::Disabled,
                other => {
                    tracing::warn!(
                        "Unknown STORE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres, supabase, disabled"
                    );
                    StoreBackend::Sqlite
                }
            },
            None if supabase.is_some() => StoreBackend::Supabase,
            None => StoreBackend::Sqlite,
        };

        if backend == StoreBackend::Supabase && supabase.is_none() {
            tracing::warn!("Supabase keys missing. Visit analytics running in disabled mode.");
            backend = StoreBackend::Disabled;
        }

        let url = var("DATABASE_URL").unwrap_or_else(|| "sqlite://./pulse.db?mode=rwc".to_string());

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<NonZeroU32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
                .get(),
            None => StoreConfig::default_max_connections(),
        };

        let api_host = var("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let api_port = var("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            store: StoreConfig {
                backend,
                url,
                max_connections,
                supabase,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            cors: CorsConfig { allowed_origins },
        })
    }
}
