use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::response::Html;

use crate::inbound::http::router::AppState;

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.file_server_hits.load(Ordering::Relaxed);

    Html(format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {hits} times!</p>
  </body>
</html>"#
    ))
}
