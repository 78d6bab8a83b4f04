//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use career_portal::Trace;
#[cfg(debug_assertions)]
use career_portal::doc::ApiDoc;
use career_portal::inbound::http::applications::{
    bulk_update_status, confirm_application, get_application, list_applications,
};
use career_portal::inbound::http::error::invalid_input;
use career_portal::inbound::http::health::{HealthState, live, ready};
use career_portal::inbound::http::jobs::apply_to_job;
use career_portal::inbound::http::notifications::{list_notifications, mark_notification_read};
use career_portal::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(|err, _| invalid_input(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| invalid_input(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| invalid_input(err)))
        .service(apply_to_job)
        .service(confirm_application)
        .service(bulk_update_status)
        .service(list_applications)
        .service(get_application)
        .service(list_notifications)
        .service(mark_notification_read);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring adapters, binding the socket or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
