use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use explaind::ai::GeneratorFactory;
use explaind::api::middleware::Cors;
use explaind::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use explaind::config::AppConfig;
use explaind::store;
use tracing::{error, info};

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

async fn index() -> impl Responder {
    let html = include_str!("../static/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting explaind server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match store::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    let generator = match GeneratorFactory::create_default(&config) {
        Some(g) => g,
        None => {
            error!("Failed to initialize explanation generator from config");
            std::process::exit(1);
        }
    };

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(generator.clone()))
            .wrap(Cors)
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .configure(explaind::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
