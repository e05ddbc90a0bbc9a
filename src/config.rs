//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "cook-flow")]
#[command(about = "Step-by-step recipe runner with per-step countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// JSON recipe catalog; the built-in recipes are used when omitted
    #[arg(short, long, value_name = "FILE")]
    pub recipes: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces() {
        let config = Config::try_parse_from(["cook-flow"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert!(config.recipes.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from(["cook-flow", "-p", "8080", "-v", "--recipes", "book.json"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.recipes, Some(PathBuf::from("book.json")));
    }
}
