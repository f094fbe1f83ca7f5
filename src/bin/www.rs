use actix_files::Files;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use icfpc2018::config::Config;
use icfpc2018::reference::ReferenceTable;
use icfpc2018::www;
use icfpc2018::www::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    icfpc2018::init_logging();
    let config = Config::from_env()?;
    let data_url = config.require_data_url()?.to_string();
    let reference = ReferenceTable::load(config.reference_path.as_deref())?;
    tracing::info!(
        entries = reference.len(),
        "loaded reference table"
    );

    let state = web::Data::new(AppState::new(data_url, reference));
    if let Some(every) = config.refresh_interval {
        www::handlers::leaderboard::spawn_refresher(state.clone(), every);
    }

    let bind_address = config.bind();
    tracing::info!("Starting server at: http://{}/leaderboard", bind_address);
    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(www::handlers::index))
            .route(
                "/leaderboard",
                web::get().to(www::handlers::leaderboard::show),
            )
            .route(
                "/leaderboard.json",
                web::get().to(www::handlers::leaderboard::json),
            )
            .route(
                "/refresh",
                web::post().to(www::handlers::leaderboard::refresh),
            )
            .service(Files::new("/static", &static_dir))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;
    Ok(())
}
