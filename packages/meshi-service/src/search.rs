use std::net::IpAddr;

use meshi_domain::filter::{self, FilterInput, FilterSpec};
use meshi_storage::queries;
use tracing::{debug, warn};

use crate::{Error, MeshiService, Result, list::RestaurantItem};

/// One externally triggered search request, carried explicitly through the
/// pipeline instead of being read from ambient request state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub client_ip: IpAddr,
	pub keyword: Option<String>,
	pub category: Option<String>,
	pub tag: Option<String>,
	pub region: Option<String>,
	pub area: Option<String>,
	pub genre: Option<String>,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	/// True when the request carried at least one effective filter; the HTTP
	/// layer only sets search cache headers for scoped responses.
	pub scoped: bool,
	pub total: i64,
	pub page: u32,
	pub per_page: u32,
	pub items: Vec<RestaurantItem>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CountResponse {
	pub count: i64,
}

impl MeshiService {
	/// Full request pipeline: rate-limit admission, taxonomy path resolution,
	/// FilterSpec construction, then the content query. An empty spec falls
	/// back to default-listing semantics with `scoped = false`.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let spec = self.scope_request(&req).await?;
		let (page, per_page) = self.page_params(req.page, req.per_page);
		let offset = i64::from(page - 1) * i64::from(per_page);
		let scoped = !spec.is_empty();

		let total = queries::count_restaurants(&self.db, &spec).await?;
		let restaurants =
			queries::search_restaurants(&self.db, &spec, i64::from(per_page), offset).await?;

		debug!(scoped, total, page, "Search executed.");

		Ok(SearchResponse {
			scoped,
			total,
			page,
			per_page,
			items: restaurants.into_iter().map(RestaurantItem::from).collect(),
		})
	}

	/// Same pipeline as [`search`](Self::search) but only counts matches;
	/// backs live result-count previews. Still admission-controlled, since it
	/// can trigger a scoped content query.
	pub async fn count_preview(&self, req: SearchRequest) -> Result<CountResponse> {
		let spec = self.scope_request(&req).await?;
		let count = queries::count_restaurants(&self.db, &spec).await?;

		Ok(CountResponse { count })
	}

	/// Count matches for an already-built spec. Read-only; an empty spec
	/// counts everything, matching the default listing.
	pub async fn count_spec(&self, spec: &FilterSpec) -> Result<i64> {
		Ok(queries::count_restaurants(&self.db, spec).await?)
	}

	/// Admission, resolution and spec construction, in that order. Admission
	/// runs first on every path that can reach the content query so abusive
	/// traffic never costs term lookups.
	async fn scope_request(&self, req: &SearchRequest) -> Result<FilterSpec> {
		if !self.limiter.admit(req.client_ip) {
			warn!(client_ip = %req.client_ip, "Rate limit exceeded.");

			return Err(Error::RateLimited);
		}

		let resolution = self
			.resolve_taxonomy_path(req.region.as_deref(), req.area.as_deref(), req.genre.as_deref())
			.await?;

		if resolution.supplied && !resolution.valid {
			// Deliberately vague: the caller learns the path is unroutable,
			// not which segment was wrong.
			return Err(Error::NotFound {
				message: "No content exists at this path.".to_string(),
			});
		}

		Ok(filter::build_filter_spec(
			FilterInput {
				keyword: req.keyword.as_deref(),
				category: req.category.as_deref(),
				tag: req.tag.as_deref(),
				region: resolution.region.as_deref(),
				area: resolution.area.as_deref(),
				genre: resolution.genre.as_deref(),
			},
			self.cfg.search.max_keyword_chars,
			self.cfg.search.max_slug_chars,
		))
	}

	pub(crate) fn page_params(&self, page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
		let page = page.unwrap_or(1).max(1);
		let per_page = per_page
			.unwrap_or(self.cfg.search.default_page_size)
			.clamp(1, self.cfg.search.max_page_size);

		(page, per_page)
	}
}
