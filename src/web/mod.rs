pub mod render;

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::{Category, MapStyle, SearchOrigin};
use crate::search::{Finder, SearchError};

#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<Finder>,
}

/// Build the application router around a shared [`Finder`]
pub fn router(finder: Arc<Finder>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/explore", post(explore))
        .route("/nearby", post(nearby))
        .route("/api/search", get(api_search))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { finder })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchForm {
    place: String,
    category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExploreForm {
    place: String,
    category: String,
    style: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NearbyForm {
    lat: String,
    lon: String,
    name: String,
    category: String,
    style: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiSearchQuery {
    q: String,
}

fn user_message(error: &SearchError) -> String {
    match error {
        SearchError::EmptyInput => "Please enter a place to search for".to_string(),
        SearchError::Unreachable(_) => {
            "Could not complete the search: the map service is unavailable. Please try again later."
                .to_string()
        }
        SearchError::NoResults { query } => format!("No results found for '{}'", query),
    }
}

/// Nearby searches need a concrete category; an empty selection searches
/// restaurants
pub(crate) fn nearby_category(category: &str) -> &str {
    match category.trim() {
        "" | "general" => Category::Restaurant.key(),
        other => other,
    }
}

fn parse_coordinate(value: &str, limit: f64) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}

async fn index() -> Html<String> {
    Html(render::index_page(None))
}

async fn search(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    match state
        .finder
        .candidates(&form.place, Some(form.category.as_str()))
        .await
    {
        Ok(result) => Html(render::candidates_page(&result, &form.category)),
        Err(e) => Html(render::index_page(Some(&user_message(&e)))),
    }
}

async fn explore(State(state): State<AppState>, Form(form): Form<ExploreForm>) -> Html<String> {
    let category = nearby_category(&form.category);
    let style = MapStyle::from_key(&form.style);

    match state.finder.explore(&form.place, category).await {
        Ok(exploration) => Html(render::nearby_page(
            &exploration.origin,
            &exploration.places,
            category,
            style,
        )),
        Err(e) => Html(render::index_page(Some(&user_message(&e)))),
    }
}

async fn nearby(State(state): State<AppState>, Form(form): Form<NearbyForm>) -> Html<String> {
    let (Some(lat), Some(lon)) = (
        parse_coordinate(&form.lat, 90.0),
        parse_coordinate(&form.lon, 180.0),
    ) else {
        return Html(render::index_page(Some(
            "Please choose a valid location before searching nearby",
        )));
    };

    let name = match form.name.trim() {
        "" => "Selected location",
        n => n,
    };
    let origin = SearchOrigin::new(lat, lon, name);
    let category = nearby_category(&form.category);
    let style = MapStyle::from_key(&form.style);

    info!(lat, lon, category, "nearby search requested");
    let places = state.finder.nearby(&origin, category).await;

    Html(render::nearby_page(&origin, &places, category, style))
}

async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<ApiSearchQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.finder.raw_search(&params.q).await {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(SearchError::EmptyInput) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Empty query" })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}
