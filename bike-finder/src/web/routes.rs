//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::geo::{Coord, Direction, haversine_miles, parse_direction_filter};
use crate::geocode::{GeocodeFailure, GeocodeResult};
use crate::nearby::{
    AvailabilitySummary, CacheStatus, DEFAULT_LABEL, NearbyError, NearbyOutcome, SearchKind,
    SearchQuery,
};
use crate::settings::{Favorite, Settings, SettingsError};

use super::dto::*;
use super::map::{DEFAULT_RADIUS_MILES, MarkerStyle, map_click, no_results_message, zoom_for_radius};
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/geocode", get(geocode))
        .route("/api/nearby", get(nearby))
        .route("/api/inventory/refresh", post(refresh_inventory))
        .route("/api/weather", get(weather))
        .route("/api/favorites", get(list_favorites).post(save_favorite))
        .route("/api/favorites/:name", delete(delete_favorite))
        .route("/api/favorites/:name/search", get(search_favorite))
        .route("/api/settings/api-key", put(set_api_key))
        .route("/api/location/click", get(location_click))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with search form and map.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let favorites = state.settings.lock().await.favorites.keys().cloned().collect();
    let page = IndexTemplate::new(favorites, state.weather.is_enabled().await);
    Html(
        page.render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Geocode a free-text address.
async fn geocode(
    State(state): State<AppState>,
    Query(req): Query<GeocodeRequest>,
) -> Result<Json<GeocodeResult>, AppError> {
    let address = non_blank(&req.address).ok_or_else(|| AppError::BadRequest {
        message: "address is required".to_string(),
    })?;
    Ok(Json(state.geocoder.geocode(address).await))
}

fn non_blank(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}

/// Geocode an address, turning failures into errors.
async fn locate(state: &AppState, address: &str) -> Result<GeocodeResult, AppError> {
    let result = state.geocoder.geocode(address).await;
    if result.success {
        return Ok(result);
    }

    let message = result
        .error
        .unwrap_or_else(|| format!("Could not find location for: {address}"));
    Err(match result.failure {
        Some(GeocodeFailure::ServiceUnavailable) => AppError::Unavailable { message },
        _ => AppError::NotFound { message },
    })
}

/// Validate a latitude/longitude pair from a request.
fn parse_coord(lat: f64, lon: f64) -> Result<Coord, AppError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest {
            message: format!("Invalid coordinates: {lat}, {lon}"),
        });
    }
    Ok(Coord::new(lat, lon))
}

/// Validated search options shared by ad-hoc and saved searches.
#[derive(Debug, Clone, PartialEq)]
struct SearchOptions {
    radius_miles: f64,
    direction: Option<Direction>,
    kind: SearchKind,
}

impl SearchOptions {
    fn parse(
        radius: Option<f64>,
        direction: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Self, AppError> {
        let radius_miles = radius.unwrap_or(DEFAULT_RADIUS_MILES);
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(AppError::BadRequest {
                message: format!("Invalid radius: {radius_miles}"),
            });
        }

        let direction = parse_direction_filter(direction).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

        let kind = kind
            .and_then(non_blank)
            .map(str::parse::<SearchKind>)
            .transpose()
            .map_err(|message| AppError::BadRequest { message })?
            .unwrap_or_default();

        Ok(Self {
            radius_miles,
            direction,
            kind,
        })
    }

    fn query(&self, origin: Coord) -> SearchQuery {
        SearchQuery::new(origin, self.radius_miles)
            .with_direction(self.direction)
            .with_kind(self.kind)
            .with_label(DEFAULT_LABEL)
    }
}

/// A finished search, ready to render.
struct SearchResults {
    origin: GeocodeResult,
    query: SearchQuery,
    outcome: NearbyOutcome,
    inventory_updated: DateTime<Utc>,
}

async fn run_search(
    state: &AppState,
    origin: GeocodeResult,
    query: SearchQuery,
    refresh: bool,
) -> Result<SearchResults, AppError> {
    let inventory = state
        .inventory
        .get_or_fetch()
        .await
        .ok_or_else(|| AppError::Unavailable {
            message: "Could not load station data. Please try refreshing.".to_string(),
        })?;

    let outcome = state.resolver.find_nearby(&inventory, &query, refresh).await?;
    debug!(
        routes = state.resolver.walking().cached_count(),
        searches = state.resolver.cached_count(),
        geocodes = state.geocoder.cached_count(),
        "cache sizes"
    );

    Ok(SearchResults {
        origin,
        query,
        outcome,
        inventory_updated: inventory.fetched_at(),
    })
}

/// Render search results as an HTML fragment or JSON.
fn respond(headers: &HeaderMap, results: SearchResults) -> Result<Response, AppError> {
    let SearchResults {
        origin,
        query,
        outcome,
        inventory_updated,
    } = results;

    let availability = AvailabilitySummary::of(query.kind, &outcome.stations);
    let message = outcome
        .stations
        .is_empty()
        .then(|| no_results_message(query.radius_miles, query.direction));
    let zoom = zoom_for_radius(query.radius_miles);

    if accepts_html(headers) {
        let template = NearbyResultsTemplate {
            origin_label: origin
                .formatted_address
                .clone()
                .unwrap_or_else(|| origin.address.clone()),
            origin_lat: query.origin.lat,
            origin_lon: query.origin.lon,
            origin_marker: MarkerStyle::for_origin(query.kind),
            radius_miles: query.radius_miles,
            zoom,
            metrics: MetricView::from_summary(&availability),
            stations: outcome
                .stations
                .iter()
                .map(|s| StationView::from_nearby(query.kind, s))
                .collect(),
            filtered_out: outcome.summary.describe(),
            message,
            from_cache: outcome.cache == CacheStatus::Hit,
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let stations = outcome
            .stations
            .iter()
            .map(|s| StationResult::from_nearby(query.kind, s))
            .collect();

        Ok(Json(NearbyResponse {
            origin,
            kind: query.kind,
            radius: query.radius_miles,
            direction: query
                .direction
                .map_or_else(|| "all".to_string(), |d| d.to_string()),
            stations,
            availability,
            summary: outcome.summary,
            filtered_out: outcome.summary.describe(),
            message,
            cache: outcome.cache,
            zoom,
            inventory_updated,
        })
        .into_response())
    }
}

/// Search for stations near an address or a point.
async fn nearby(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<NearbyRequest>,
) -> Result<Response, AppError> {
    let options = SearchOptions::parse(req.radius, req.direction.as_deref(), req.kind.as_deref())?;

    let origin = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => GeocodeResult::from_map_click(parse_coord(lat, lon)?),
        _ => {
            let address = req
                .address
                .as_deref()
                .and_then(non_blank)
                .ok_or_else(|| AppError::BadRequest {
                    message: "address or lat/lon is required".to_string(),
                })?;
            locate(&state, address).await?
        }
    };

    let coord = origin.coord().ok_or_else(|| AppError::Internal {
        message: "resolved location has no coordinates".to_string(),
    })?;

    let results = run_search(&state, origin, options.query(coord), req.refresh).await?;
    respond(&headers, results)
}

/// Re-fetch the station inventory.
async fn refresh_inventory(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let inventory = state
        .inventory
        .refresh()
        .await
        .map_err(|e| AppError::Unavailable {
            message: format!("Could not refresh station data: {e}"),
        })?;

    info!(stations = inventory.len(), "inventory refreshed on request");
    Ok(Json(RefreshResponse {
        stations: inventory.len(),
        updated_at: inventory.fetched_at(),
    }))
}

/// Current weather, or `null` when no API key is configured.
async fn weather(
    State(state): State<AppState>,
    Query(req): Query<WeatherRequest>,
) -> Result<Json<Option<WeatherResponse>>, AppError> {
    let at = parse_coord(req.lat, req.lon)?;
    let weather = match state.weather.current_weather(at).await {
        Ok(weather) => weather,
        Err(e) => {
            warn!(error = %e, "weather lookup failed");
            None
        }
    };

    Ok(Json(weather.map(|weather| WeatherResponse {
        conditions: weather.conditions(),
        weather,
    })))
}

/// All saved favorites, ordered by name.
async fn list_favorites(State(state): State<AppState>) -> Json<Vec<FavoriteResult>> {
    let settings = state.settings.lock().await;
    Json(
        settings
            .favorites
            .iter()
            .map(|(name, favorite)| FavoriteResult {
                name: name.clone(),
                favorite: favorite.clone(),
            })
            .collect(),
    )
}

/// Write settings to disk.
fn persist(state: &AppState, settings: &Settings) -> Result<(), AppError> {
    state.settings_store.save(settings).map_err(AppError::from)
}

/// Save a search as a favorite, geocoding its address.
async fn save_favorite(
    State(state): State<AppState>,
    Json(req): Json<SaveFavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteResult>), AppError> {
    let address = non_blank(&req.address).ok_or_else(|| AppError::BadRequest {
        message: "address is required".to_string(),
    })?;
    let options = SearchOptions::parse(req.radius, req.direction.as_deref(), req.kind.as_deref())?;
    let location_result = locate(&state, address).await?;

    let name = req
        .name
        .as_deref()
        .and_then(non_blank)
        .map(str::to_string)
        .unwrap_or_else(|| Favorite::default_name(options.kind, address));

    let favorite = Favorite {
        address: address.to_string(),
        search_type: options.kind,
        radius: options.radius_miles,
        direction: options.direction,
        location_result,
    };

    let mut settings = state.settings.lock().await;
    settings.add_favorite(name.clone(), favorite.clone());
    persist(&state, &settings)?;

    info!(%name, "saved favorite");
    Ok((StatusCode::CREATED, Json(FavoriteResult { name, favorite })))
}

/// Delete a saved favorite.
async fn delete_favorite(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut settings = state.settings.lock().await;
    if settings.remove_favorite(&name).is_none() {
        return Err(AppError::NotFound {
            message: format!("No favorite named {name}"),
        });
    }
    persist(&state, &settings)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run a saved favorite's search from its stored location.
async fn search_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(req): Query<FavoriteSearchRequest>,
) -> Result<Response, AppError> {
    let favorite = state
        .settings
        .lock()
        .await
        .favorites
        .get(&name)
        .cloned()
        .ok_or_else(|| AppError::NotFound {
            message: format!("No favorite named {name}"),
        })?;

    let query = favorite.to_query().ok_or_else(|| AppError::BadRequest {
        message: format!("Favorite {name} has no stored location"),
    })?;

    // Later lookups of the same address skip the geocoder.
    state
        .geocoder
        .remember(&favorite.address, favorite.location_result.clone())
        .await;

    let results = run_search(&state, favorite.location_result, query, req.refresh).await?;
    respond(&headers, results)
}

/// Set the weather API key and whether it is saved to disk.
async fn set_api_key(
    State(state): State<AppState>,
    Json(req): Json<ApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = req.api_key.trim().to_string();
    {
        let mut settings = state.settings.lock().await;
        settings.set_api_key(key.clone(), req.remember);
        persist(&state, &settings)?;
    }

    state.weather.set_api_key(Some(key)).await;
    Ok(Json(ApiKeyResponse {
        weather_enabled: state.weather.is_enabled().await,
        remembered: req.remember,
    }))
}

/// Offer a new search origin where the user clicked the map.
async fn location_click(
    Query(req): Query<LocationClickRequest>,
) -> Result<Json<LocationClickResponse>, AppError> {
    let current = parse_coord(req.from_lat, req.from_lon)?;
    let clicked = parse_coord(req.lat, req.lon)?;

    Ok(Json(LocationClickResponse {
        distance_miles: haversine_miles(current, clicked),
        location: map_click(current, clicked).map(|(_, location)| location),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// An upstream service or the station data is unavailable
    Unavailable { message: String },
    Internal { message: String },
}

impl From<NearbyError> for AppError {
    fn from(e: NearbyError) -> Self {
        match e {
            NearbyError::NoInventory => AppError::Unavailable {
                message: "Could not load station data. Please try refreshing.".to_string(),
            },
        }
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unavailable { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
