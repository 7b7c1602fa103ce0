//! Single binary web server for the bracket engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! See `ServerConfig::from_env` for the scoring and roster variables.

use actix_web::{web::Data, App, HttpServer};
use tennis_bracket_web::http::{configure, AppContext};
use tennis_bracket_web::roster::load_roster_file;
use tennis_bracket_web::{ServerConfig, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    let store = Store::new();
    if let Some(path) = &config.roster_csv {
        if let Err(e) = load_roster_file(&store, path) {
            log::error!("Failed to load roster {}: {}", path.display(), e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e));
        }
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppContext::new(store, config.engine));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
