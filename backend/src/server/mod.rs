//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, movies, reviews, social, users};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    // Literal segments register ahead of the `{username}` and `{item}` captures.
    let api = web::scope("/api/v1")
        .service(auth::register)
        .service(auth::verify)
        .service(auth::login)
        .service(auth::forgot_password)
        .service(auth::reset_password)
        .service(users::me)
        .service(users::search)
        .service(users::available)
        .service(users::profile)
        .service(users::followers)
        .service(users::following)
        .service(users::user_saved)
        .service(users::user_watched)
        .service(social::pending_requests)
        .service(social::send_request)
        .service(social::accept_request)
        .service(social::reject_request)
        .service(social::cancel_request)
        .service(social::unfollow)
        .service(social::remove_follower)
        .service(movies::my_saved)
        .service(movies::my_watched)
        .service(movies::save_for_later)
        .service(movies::remove_from_saved)
        .service(movies::mark_as_watched)
        .service(movies::remove_from_watched)
        .service(movies::add_review)
        .service(movies::reviews_for_movie)
        .service(reviews::my_reviews);

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
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing the token signer, binding, and store path.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when the document store cannot be opened or
/// when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        signer,
        bind_addr,
        store_path,
    } = config;
    let http_state = build_http_state(store_path, signer)?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
