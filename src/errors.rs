use actix_web::{http::StatusCode, HttpResponse};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Writes an error followed by its whole `source()` chain. Used by the `Debug` implementation of the route
/// errors, so logs carry the root cause while responses stay generic.
pub fn error_chain_fmt(
    err: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}", err)?;
    let mut current = err.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}

/// `{"error": message}` body with the given status. Server errors never leak their message.
pub fn json_error_response(status: StatusCode, message: &str) -> HttpResponse {
    let message = if status.is_server_error() {
        INTERNAL_ERROR_MESSAGE
    } else {
        message
    };

    HttpResponse::build(status).json(ErrorBody { error: message })
}
