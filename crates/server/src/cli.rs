//! Command-line overrides for the server.

use clap::Parser;

/// Lightweight local Kanban Burner web server.
#[derive(Parser, Debug)]
#[command(name = "burner-server", about = "Kanban Burner local web server")]
pub struct ServerArgs {
    /// Bind address (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides PORT); a busy port falls back to a free one
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServerArgs {
    pub fn apply(&self, config: &mut burner_core::Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let lookup = |_: &str| -> Option<String> { None };
        let mut config = burner_core::Config::from_lookup("", &lookup);
        let args = ServerArgs::try_parse_from(["burner-server", "--port", "9000"]).unwrap();
        args.apply(&mut config);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn no_flags_keep_config() {
        let lookup = |_: &str| -> Option<String> { None };
        let mut config = burner_core::Config::from_lookup("", &lookup);
        ServerArgs::try_parse_from(["burner-server"]).unwrap().apply(&mut config);
        assert_eq!(config.server.port, 8765);
    }
}
