use clap::Parser;

/// Command-line arguments.
///
/// Every option is an override; anything left unset falls through to the
/// config file, environment, or built-in defaults.
#[derive(Parser, Debug)]
#[command(author, version, about = "Mempool fee oracle server", long_about = None)]
pub struct Cli {
    /// Host address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port for the HTTP server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// WebSocket URL of the upstream mempool feed
    #[arg(long)]
    pub upstream_url: Option<String>,

    /// Redis connection URL
    #[arg(long)]
    pub redis_url: Option<String>,

    /// Expiry in seconds for published cache keys
    #[arg(long)]
    pub cache_ttl_secs: Option<u64>,

    /// How often estimates are published, in milliseconds
    #[arg(long)]
    pub publish_interval_ms: Option<u64>,

    /// Bucket decay factor applied per decay tick
    #[arg(long)]
    pub decay_factor: Option<f64>,

    /// Use an in-process cache instead of Redis
    #[arg(long)]
    pub memory_cache: bool,

    /// Log filter directives
    #[arg(long, default_value = "fee_oracle_server=info,fee_oracle=info")]
    pub log_filter: String,

    /// Path to a config file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::try_parse_from([
            "fee-oracle-server",
            "--port",
            "9000",
            "--memory-cache",
            "--decay-factor",
            "0.9",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(9000));
        assert!(cli.memory_cache);
        assert_eq!(cli.decay_factor, Some(0.9));
        assert_eq!(cli.host, None);
    }
}
