use meshi_domain::filter::FilterSpec;
use meshi_storage::{models::Restaurant, queries};

use crate::{MeshiService, Result};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ListRequest {
	pub page: Option<u32>,
	pub per_page: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RestaurantItem {
	pub restaurant_id: uuid::Uuid,
	pub title: String,
	pub description: String,
	pub address: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: time::OffsetDateTime,
}
impl From<Restaurant> for RestaurantItem {
	fn from(restaurant: Restaurant) -> Self {
		Self {
			restaurant_id: restaurant.restaurant_id,
			title: restaurant.title,
			description: restaurant.description,
			address: restaurant.address,
			created_at: restaurant.created_at,
			updated_at: restaurant.updated_at,
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListResponse {
	pub total: i64,
	pub page: u32,
	pub per_page: u32,
	pub items: Vec<RestaurantItem>,
}

impl MeshiService {
	/// The default content listing, newest first. Not a search request: no
	/// admission check, no resolver, no cache headers.
	pub async fn list_recent(&self, req: ListRequest) -> Result<ListResponse> {
		let (page, per_page) = self.page_params(req.page, req.per_page);
		let offset = i64::from(page - 1) * i64::from(per_page);
		let spec = FilterSpec::default();

		let total = queries::count_restaurants(&self.db, &spec).await?;
		let restaurants =
			queries::search_restaurants(&self.db, &spec, i64::from(per_page), offset).await?;

		Ok(ListResponse {
			total,
			page,
			per_page,
			items: restaurants.into_iter().map(RestaurantItem::from).collect(),
		})
	}
}
