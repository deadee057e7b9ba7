use time::OffsetDateTime;
use uuid::Uuid;

use meshi_domain::{Dimension, slug};
use meshi_storage::{models::Restaurant, queries};

use crate::{Error, MeshiService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateTermRequest {
	pub dimension: Dimension,
	pub slug: String,
	pub name: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TermCreated {
	pub term_id: i64,
	pub dimension: Dimension,
	pub slug: String,
	pub name: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateRestaurantRequest {
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub term_ids: Vec<i64>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RestaurantCreated {
	pub restaurant_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AssignTermRequest {
	pub term_id: i64,
}

impl MeshiService {
	/// Register a taxonomy term. The stored slug is the sanitized form, so
	/// lookups through the resolver always compare like with like.
	pub async fn create_term(&self, req: CreateTermRequest) -> Result<TermCreated> {
		let cleaned = slug::sanitize_slug(&req.slug, self.cfg.search.max_slug_chars);

		if cleaned.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Slug contains no usable characters.".to_string(),
			});
		}

		let name = if req.name.trim().is_empty() { cleaned.clone() } else { req.name.trim().to_string() };
		let term = queries::insert_term(
			&self.db,
			req.dimension,
			&cleaned,
			&name,
			OffsetDateTime::now_utc(),
		)
		.await?;

		Ok(TermCreated {
			term_id: term.term_id,
			dimension: req.dimension,
			slug: term.slug,
			name: term.name,
		})
	}

	pub async fn create_restaurant(
		&self,
		req: CreateRestaurantRequest,
	) -> Result<RestaurantCreated> {
		let title = req.title.trim();

		if title.is_empty() {
			return Err(Error::InvalidRequest { message: "Title must be non-empty.".to_string() });
		}

		let now = OffsetDateTime::now_utc();
		let restaurant = Restaurant {
			restaurant_id: Uuid::new_v4(),
			title: title.to_string(),
			description: req.description.trim().to_string(),
			address: req.address.trim().to_string(),
			status: "publish".to_string(),
			created_at: now,
			updated_at: now,
		};

		queries::insert_restaurant(&self.db, &restaurant).await?;

		for term_id in req.term_ids {
			queries::assign_term(&self.db, restaurant.restaurant_id, term_id).await?;
		}

		Ok(RestaurantCreated { restaurant_id: restaurant.restaurant_id })
	}

	pub async fn assign_term(&self, restaurant_id: Uuid, req: AssignTermRequest) -> Result<()> {
		queries::assign_term(&self.db, restaurant_id, req.term_id).await?;

		Ok(())
	}
}
