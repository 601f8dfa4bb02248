use market_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, working directory, logging)
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    init_logger_with_file(
        Some(&config.log_level),
        false,
        config.logs_dir().to_str(),
    );

    print_banner();

    tracing::info!("🥭 Mango Market Server starting...");

    // 2. Initialize server state (database, schema, JWT)
    let state = ServerState::initialize(&config).await;

    // 3. Run the HTTP server until ctrl-c
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
