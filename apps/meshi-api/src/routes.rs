use std::{convert::Infallible, net::IpAddr, net::SocketAddr};

use axum::{
	Json, Router,
	extract::{ConnectInfo, FromRequestParts, Path, Query, State},
	http::{HeaderValue, StatusCode, header, request::Parts},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meshi_domain::client_ip::resolve_client_ip;
use meshi_service::{
	AssignTermRequest, CountResponse, CreateRestaurantRequest, CreateTermRequest, Error,
	ListRequest, SearchRequest, SearchResponse,
};

use crate::state::AppState;

/// Path prefixes that must never be interpreted as a region slug. Mirrors the
/// rewrite-rule exclusions the hierarchical URLs were originally registered
/// with; a reserved first segment falls straight through to 404 without
/// consuming rate-limit quota.
const RESERVED_SEGMENTS: [&str; 8] =
	["health", "v1", "admin", "assets", "favicon.ico", "robots.txt", "sitemap.xml", "feed"];

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/restaurants", get(list_restaurants))
		.route("/v1/search", get(search))
		.route("/v1/search/count", get(count))
		.route("/{region}", get(region_path))
		.route("/{region}/{area}", get(area_path))
		.route("/{region}/{area}/{genre}", get(genre_path))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/terms", post(create_term))
		.route("/v1/admin/restaurants", post(create_restaurant))
		.route("/v1/admin/restaurants/{restaurant_id}/terms", post(assign_term))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Client IP for rate limiting, resolved from proxy headers with the direct
/// connection address as the last resort.
pub struct ClientIp(pub IpAddr);
impl<S> FromRequestParts<S> for ClientIp
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let client_header =
			parts.headers.get("client-ip").and_then(|value| value.to_str().ok());
		let forwarded =
			parts.headers.get("x-forwarded-for").and_then(|value| value.to_str().ok());
		let remote = parts
			.extensions
			.get::<ConnectInfo<SocketAddr>>()
			.map(|ConnectInfo(addr)| addr.ip());

		Ok(Self(resolve_client_ip(client_header, forwarded, remote)))
	}
}

#[derive(Debug, Default, Clone, Deserialize)]
struct SearchParams {
	keyword: Option<String>,
	category: Option<String>,
	tag: Option<String>,
	region: Option<String>,
	area: Option<String>,
	genre: Option<String>,
	page: Option<u32>,
	per_page: Option<u32>,
}
impl SearchParams {
	fn into_request(self, client_ip: IpAddr) -> SearchRequest {
		SearchRequest {
			client_ip,
			keyword: self.keyword,
			category: self.category,
			tag: self.tag,
			region: self.region,
			area: self.area,
			genre: self.genre,
			page: self.page,
			per_page: self.per_page,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
	page: Option<u32>,
	per_page: Option<u32>,
}

async fn list_restaurants(
	State(state): State<AppState>,
	Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
	let response = state
		.service
		.list_recent(ListRequest { page: params.page, per_page: params.per_page })
		.await?;

	Ok(Json(response).into_response())
}

async fn search(
	State(state): State<AppState>,
	ClientIp(client_ip): ClientIp,
	Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
	let max_age = state.service.cfg.search.cache_max_age_secs;
	let response = state.service.search(params.into_request(client_ip)).await?;

	Ok(search_response(response, max_age))
}

async fn count(
	State(state): State<AppState>,
	ClientIp(client_ip): ClientIp,
	Query(params): Query<SearchParams>,
) -> Result<Json<CountResponse>, ApiError> {
	let response = state.service.count_preview(params.into_request(client_ip)).await?;

	Ok(Json(response))
}

async fn region_path(
	state: State<AppState>,
	client_ip: ClientIp,
	Path(region): Path<String>,
	params: Query<SearchParams>,
) -> Result<Response, ApiError> {
	taxonomy_path(state, client_ip, params, region, None, None).await
}

async fn area_path(
	state: State<AppState>,
	client_ip: ClientIp,
	Path((region, area)): Path<(String, String)>,
	params: Query<SearchParams>,
) -> Result<Response, ApiError> {
	taxonomy_path(state, client_ip, params, region, Some(area), None).await
}

async fn genre_path(
	state: State<AppState>,
	client_ip: ClientIp,
	Path((region, area, genre)): Path<(String, String, String)>,
	params: Query<SearchParams>,
) -> Result<Response, ApiError> {
	taxonomy_path(state, client_ip, params, region, Some(area), Some(genre)).await
}

/// Hierarchical taxonomy URLs: `/{region}`, `/{region}/{area}`,
/// `/{region}/{area}/{genre}`. Extra query parameters (keyword, category,
/// tag, paging) still apply on top of the path segments.
async fn taxonomy_path(
	State(state): State<AppState>,
	ClientIp(client_ip): ClientIp,
	Query(params): Query<SearchParams>,
	region: String,
	area: Option<String>,
	genre: Option<String>,
) -> Result<Response, ApiError> {
	if RESERVED_SEGMENTS.contains(&region.as_str()) {
		return Err(ApiError::from(Error::NotFound {
			message: "No content exists at this path.".to_string(),
		}));
	}

	let max_age = state.service.cfg.search.cache_max_age_secs;
	let mut request = params.into_request(client_ip);

	// Path segments win over identically named query parameters; a query
	// string can still supply the deeper segments on a shorter path.
	request.region = Some(region);
	if area.is_some() {
		request.area = area;
	}
	if genre.is_some() {
		request.genre = genre;
	}

	let response = state.service.search(request).await?;

	Ok(search_response(response, max_age))
}

/// Scoped search responses are cacheable for a short time and vary by client
/// characteristics; ordinary responses carry neither header.
fn search_response(response: SearchResponse, max_age_secs: u64) -> Response {
	let scoped = response.scoped;
	let mut http_response = Json(response).into_response();

	if scoped {
		let headers = http_response.headers_mut();

		headers.insert(header::VARY, HeaderValue::from_static("User-Agent, Accept-Encoding"));

		if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={max_age_secs}")) {
			headers.insert(header::CACHE_CONTROL, value);
		}
	}

	http_response
}

async fn create_term(
	State(state): State<AppState>,
	Json(payload): Json<CreateTermRequest>,
) -> Result<Response, ApiError> {
	let response = state.service.create_term(payload).await?;

	Ok((StatusCode::CREATED, Json(response)).into_response())
}

async fn create_restaurant(
	State(state): State<AppState>,
	Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Response, ApiError> {
	let response = state.service.create_restaurant(payload).await?;

	Ok((StatusCode::CREATED, Json(response)).into_response())
}

async fn assign_term(
	State(state): State<AppState>,
	Path(restaurant_id): Path<Uuid>,
	Json(payload): Json<AssignTermRequest>,
) -> Result<StatusCode, ApiError> {
	state.service.assign_term(restaurant_id, payload).await?;

	Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::RateLimited => Self::new(
				StatusCode::TOO_MANY_REQUESTS,
				"rate_limited",
				"Too many search requests. Please retry later.",
			),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Conflict { message } => Self::new(StatusCode::CONFLICT, "conflict", message),
			Error::Storage { message } => {
				tracing::error!(%message, "Storage failure while handling a request.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Internal storage error.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
