use actix_web::{web, App, HttpServer, HttpResponse, Error, HttpRequest};
use actix_cors::Cors;
use actix_web_actors::ws;
use blueprints_server::{AppState, Settings, WsSession};
use blueprints_server::api::handlers::{
    create_blueprint, delete_blueprint, get_blueprint, list_by_author,
};
use blueprints_server::health_check;
use dotenv::dotenv;
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// WebSocket connection handler
/// This upgrades the HTTP connection to a relay session
async fn websocket_route(
    req: HttpRequest,
    stream: web::Payload,
    app_data: web::Data<AppState>,
) -> std::result::Result<HttpResponse, Error> {
    let peer_addr = req.peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!("New WebSocket connection request from: {}", peer_addr);

    ws::start(
        WsSession::new(app_data.relay.clone(), peer_addr),
        &req,
        stream,
    )
}

#[actix_web::main]
async fn main() -> blueprints_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state: the store and the relay actor
    let state = web::Data::new(AppState::new(config.clone()));

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Relay initialized and ready to accept connections at ws://{}:{}/ws",
        config.server.host, config.server.port
    );

    let workers = config.server.workers as usize;
    let cors_settings = config.cors.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = if cors_settings.enabled {
            let cors_config = Cors::default();

            // Apply specific CORS rules based on configuration
            let cors_config = if cors_settings.allow_any_origin {
                // The original service allowed every origin on both the
                // HTTP and realtime channels
                cors_config
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .expose_any_header()
            } else {
                // More restrictive CORS for hardened deployments
                cors_config
                    .allowed_origin("http://localhost:8080")
                    .allowed_origin("http://127.0.0.1:8080")
                    .allowed_methods(vec!["GET", "POST", "DELETE"])
                    .allowed_headers(vec!["Content-Type"])
            };

            // Set max age
            cors_config.max_age(cors_settings.max_age as usize)
        } else {
            // CORS disabled - use most restrictive settings
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api/v1/blueprints")
                    .route("", web::post().to(create_blueprint))
                    .route("/{author}", web::get().to(list_by_author))
                    .route("/{author}/{name}", web::get().to(get_blueprint))
                    .route("/{author}/{name}", web::delete().to(delete_blueprint)),
            )
            .route("/ws", web::get().to(websocket_route))
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await?;

    Ok(())
}
