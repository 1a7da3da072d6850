//! geotrust CLI entry point
//!
//! GPS validation and regional analysis - CLI + web API

use geotrust::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
