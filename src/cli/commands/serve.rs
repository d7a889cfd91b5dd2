//! Serve Command
//!
//! Start the web form and download server.
//!
//! Usage:
//!   apiscribe serve [--host 0.0.0.0] [--port 8080]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::server;
use crate::types::Result;

pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let out = Output::new();
    out.info(&format!(
        "Serving on http://{} (Ctrl-C to stop)",
        config.server.bind_address()
    ));
    out.field("Output", config.output.dir.display());

    server::serve(&config).await
}
