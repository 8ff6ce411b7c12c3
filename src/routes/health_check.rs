use actix_web::HttpResponse;

/// Liveness probe: an empty 200 whenever the server accepts requests.
#[tracing::instrument(name = "Health check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
