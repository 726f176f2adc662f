use std::io;

use actix_web::web;
use dotenvy::dotenv;
use tiffin_service::application::seed::seed_demo_data;
use tiffin_service::config::Config;
use tiffin_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let state = web::Data::new(AppState::new(pool, config.auth.clone()));

    if config.seed_demo_data {
        let seeding = state.clone();
        web::block(move || seed_demo_data(&seeding.accounts, &seeding.catalog))
            .await
            .map_err(io::Error::other)?
            .map_err(io::Error::other)?;
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
