use crate::configuration::Settings;
use crate::connectors::DocumentStore;
use crate::helpers;
use crate::middleware;
use crate::routes;
use crate::routes::frontend::StaticDir;
use crate::services::AdminAuth;
use actix_cors::Cors;
use actix_web::{dev::Server, http::header, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    settings: Settings,
    store: Arc<dyn DocumentStore>,
) -> Result<Server, std::io::Error> {
    let auth = AdminAuth::new(settings.admin_password.clone());
    let auth_data = web::Data::new(auth.clone());
    let store = web::Data::new(store);

    let static_dir = StaticDir::new(&settings.static_dir);
    let static_data = web::Data::new(static_dir.clone());

    let cors_origin = settings.cors_origin.trim_end_matches('/').to_string();
    tracing::info!(cors_origin = %cors_origin, "CORS origin allowed");

    let json_config = web::JsonConfig::default().error_handler(helpers::json_error_handler);

    let server = HttpServer::new(move || {
        let allowed_origin = cors_origin.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req| origin.as_bytes() == allowed_origin.as_bytes())
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/api")
                    .service(routes::registration::register)
                    .service(routes::registration::count)
                    .service(web::scope("/speakers").service(routes::speaker::get::list))
                    .service(web::scope("/sessions").service(routes::session::get::list))
                    .service(
                        web::scope("/admin")
                            .service(routes::admin::login::handler)
                            .service(
                                web::scope("")
                                    .wrap(middleware::authentication::Manager::new(auth.clone()))
                                    .service(
                                        web::scope("/attendees")
                                            .service(routes::admin::attendee::list)
                                            .service(routes::admin::attendee::item),
                                    )
                                    .service(
                                        web::scope("/speakers")
                                            .service(routes::speaker::get::list)
                                            .service(routes::speaker::add::item)
                                            .service(routes::speaker::update::item)
                                            .service(routes::speaker::delete::item),
                                    )
                                    .service(
                                        web::scope("/sessions")
                                            .service(routes::session::get::list)
                                            .service(routes::session::add::item)
                                            .service(routes::session::update::item)
                                            .service(routes::session::delete::item),
                                    )
                                    .service(routes::admin::analytics::designations),
                            ),
                    ),
            )
            .configure(|cfg| routes::frontend::configure(cfg, &static_dir))
            .default_service(web::to(routes::frontend::spa))
            .app_data(json_config.clone())
            .app_data(store.clone())
            .app_data(auth_data.clone())
            .app_data(static_data.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
