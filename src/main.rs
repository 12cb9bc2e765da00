use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use notesdesk::config::AppConfig;
use notesdesk::db::mongodb::get_database;
use notesdesk::middlewares::authmw::JwtAuth;
use notesdesk::routes::routes::init_routes;
use notesdesk::state::app_state::AppState;
use notesdesk::utils::favicon::FaviconResolver;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let db = match get_database(&config.mongodb_uri, &config.db_name).await {
        Ok(db) => db,
        Err(e) => {
            error!("Error connecting to the database: {}", e);
            std::process::exit(1);
        }
    };

    let favicon = match FaviconResolver::new() {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Failed to build HTTP client for favicon lookups: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState {
        db,
        favicon,
        jwt_secret: config.jwt_secret.clone(),
    });

    info!("Starting server on {}:{}", config.host, config.port);

    let cors_origins = config.cors_origins.clone();
    let jwt_secret = config.jwt_secret.clone();

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");

        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .max_age(3600);

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .service(
                web::scope("/api")
                    .wrap(JwtAuth::new(&jwt_secret))
                    .configure(init_routes),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
