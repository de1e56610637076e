use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use site_audit_server::{
    app_state::AppState,
    config::Config,
    constants::BANNER,
    handlers::{download_report, generate_reports, health_check, root},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::load().map_err(std::io::Error::other)?;
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return Err(std::io::Error::other(e));
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let state = AppState::new(config).map_err(std::io::Error::other)?;

    log::info!("Starting App:\n{}", BANNER);
    log::info!("Listening on http://{}:{}", host, port);
    log::info!(
        "Reports are written to {}",
        state.report_service.output_dir().display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(root)
            .service(health_check)
            .service(generate_reports)
            .service(download_report)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
