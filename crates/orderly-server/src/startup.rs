//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ____          __          __
  / __ \_________/ /__  _____/ /_  __
 / / / / ___/ __  / _ \/ ___/ / / / /
/ /_/ / /  / /_/ /  __/ /  / / /_/ /
\____/_/   \__,_/\___/_/  /_/\__, /
                            /____/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("Ready:     http://{}/ready", addr);
    info!("{}", separator);
}
