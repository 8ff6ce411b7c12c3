use actix_web::dev::Server;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::net::TcpListener;
use std::time;
use tracing_actix_web::TracingLogger;

use crate::auth::auth_client::AuthClient;
use crate::config::{DatabaseSettings, Settings};
use crate::errors::json_error_response;
use crate::routes::{
    handle_auth_callback, handle_complete_checkout, handle_create_checkout,
    handle_create_newsletter, handle_dashboard_analytics, handle_dashboard_home,
    handle_dashboard_stats, handle_delete_newsletter, handle_get_newsletter, handle_get_settings,
    handle_list_newsletters, handle_list_subscribers, handle_logout, handle_send_newsletter,
    handle_subscribe, handle_subscriber_directory, handle_toggle_publish,
    handle_toggle_subscriber, handle_update_newsletter, handle_update_settings, health_check,
};

/// Public url of the application, used to build links pointing back to it.
pub struct ApplicationBaseUrl(pub String);

/// Fake latencies of the operations that would talk to a mail or payment provider.
pub struct SimulatedLatency {
    pub send_newsletter: time::Duration,
    pub checkout: time::Duration,
}

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let redis_client = redis::Client::open(config.get_redis_address())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
        let auth_client = AuthClient::new(
            config.get_auth_provider_base_url(),
            config.get_auth_provider_api_key(),
            config.get_auth_provider_timeout(),
        )
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
        let latency = SimulatedLatency {
            send_newsletter: config.get_send_delay(),
            checkout: config.get_checkout_delay(),
        };

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            db_pool,
            redis_client,
            auth_client,
            ApplicationBaseUrl(config.get_app_base_url()),
            latency,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Malformed or incomplete JSON bodies are answered with the same `{"error": ...}` shape as the handlers.
fn json_error_handler(err: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    let response = json_error_response(StatusCode::BAD_REQUEST, &err.to_string());

    InternalError::from_response(err, response).into()
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    redis_client: redis::Client,
    auth_client: AuthClient,
    base_url: ApplicationBaseUrl,
    latency: SimulatedLatency,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let redis_client = web::Data::new(redis_client);
    let auth_client = web::Data::new(auth_client);
    let base_url = web::Data::new(base_url);
    let latency = web::Data::new(latency);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/subscribe", web::post().to(handle_subscribe))
                    .route("/subscribers", web::get().to(handle_list_subscribers))
                    .route("/dashboard/stats", web::get().to(handle_dashboard_stats))
                    .route("/newsletters/send", web::post().to(handle_send_newsletter))
                    .route(
                        "/stripe/create-checkout",
                        web::post().to(handle_create_checkout),
                    ),
            )
            .route("/checkout/complete", web::post().to(handle_complete_checkout))
            .route("/auth/callback", web::get().to(handle_auth_callback))
            .route("/auth/logout", web::post().to(handle_logout))
            .service(
                web::scope("/dashboard")
                    .route("", web::get().to(handle_dashboard_home))
                    .route("/analytics", web::get().to(handle_dashboard_analytics))
                    .route("/settings", web::get().to(handle_get_settings))
                    .route("/settings", web::put().to(handle_update_settings))
                    .route("/subscribers", web::get().to(handle_subscriber_directory))
                    .route(
                        "/subscribers/{id}/toggle",
                        web::post().to(handle_toggle_subscriber),
                    )
                    .route("/newsletters", web::get().to(handle_list_newsletters))
                    .route("/newsletters", web::post().to(handle_create_newsletter))
                    .route("/newsletters/{id}", web::get().to(handle_get_newsletter))
                    .route("/newsletters/{id}", web::put().to(handle_update_newsletter))
                    .route(
                        "/newsletters/{id}",
                        web::delete().to(handle_delete_newsletter),
                    )
                    .route(
                        "/newsletters/{id}/publish",
                        web::post().to(handle_toggle_publish),
                    ),
            )
            .app_data(db_pool.clone())
            .app_data(redis_client.clone())
            .app_data(auth_client.clone())
            .app_data(base_url.clone())
            .app_data(latency.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
