// ABOUTME: Site API server binary
// ABOUTME: Loads environment configuration, opens the database and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Sitekit Server Binary
//!
//! Serves the configuration document, page contents and media endpoints.

use anyhow::Result;
use clap::Parser;
use sitekit::{
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    server::SiteServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sitekit-server")]
#[command(about = "Sitekit - configuration, content and media API for small-business sites")]
pub struct Args {
    /// Override HTTP port
    #[arg(long, env = "HTTP_PORT")]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url);
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let database = Database::new(
        &config.database.url.to_connection_string(),
        config.database.max_connections,
    )
    .await?;

    display_available_endpoints(&config);

    if let Err(e) = SiteServer::new(config, database).run().await {
        error!("Server error: {}", e);
        return Err(e);
    }
    Ok(())
}

fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.host, config.http_port);
    info!("=== Available API Endpoints ===");
    info!("   Health:          GET    {base}/health, {base}/ready");
    info!("   Site Config:     GET|PUT|PATCH {base}/api/config");
    info!("   Page Contents:   GET    {base}/api/page-contents/{{pageId}}");
    info!("                    POST   {base}/api/page-contents");
    info!("                    PUT|DELETE {base}/api/page-contents/{{id}}");
    info!("   Media:           POST   {base}/api/media/upload");
    info!("                    GET|DELETE {base}/api/media/{{id}}");
    info!("                    GET    {base}/api/media/{{id}}/info");
    info!("=== End of Endpoint List ===");
}
