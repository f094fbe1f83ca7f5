use actix_web::{HttpResponse, Responder, http::header};

/// Leaderboard pages and the JSON export.
pub mod leaderboard;
/// Page layout and response helpers.
pub mod template;

/// Redirects the root to the leaderboard.
pub async fn index() -> impl Responder {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/leaderboard"))
        .finish()
}
