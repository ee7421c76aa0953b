use crate::config::ServerConfig;
use clap::Parser;

/// Command-line overrides. Anything left unset falls back to the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "ee-tile-proxy")]
#[command(about = "Serves Earth Engine tile-map URLs for fixed composites")]
pub struct CliArgs {
    #[arg(long, help = "Port to listen on (env: PORT, default 8000)")]
    pub port: Option<u16>,

    #[arg(long, help = "Earth Engine REST base URL (env: EE_API_BASE)")]
    pub api_base: Option<String>,

    #[arg(long, help = "Timeout for outbound requests, in seconds")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON (env: LOG_FORMAT=json)")]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(api_base) = self.api_base {
            config.api_base = api_base;
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
        config.verbose |= self.verbose;
        config.json_logs |= self.json_logs;
        config
    }
}
