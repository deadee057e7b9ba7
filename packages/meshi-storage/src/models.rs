use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Restaurant {
	pub restaurant_id: Uuid,
	pub title: String,
	pub description: String,
	pub address: String,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaxonomyTerm {
	pub term_id: i64,
	pub dimension: String,
	pub slug: String,
	pub name: String,
	pub created_at: OffsetDateTime,
}
