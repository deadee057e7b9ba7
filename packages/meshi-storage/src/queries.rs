use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use meshi_domain::{Dimension, filter::FilterSpec};

use crate::{
	Error, Result,
	db::Db,
	models::{Restaurant, TaxonomyTerm},
};

/// Point lookup: does a term with this slug exist in the given dimension?
pub async fn find_term(db: &Db, dimension: Dimension, slug: &str) -> Result<Option<TaxonomyTerm>> {
	let term = sqlx::query_as(
		"\
SELECT term_id, dimension, slug, name, created_at
FROM taxonomy_terms
WHERE dimension = $1
	AND slug = $2",
	)
	.bind(dimension.as_str())
	.bind(slug)
	.fetch_optional(&db.pool)
	.await?;

	Ok(term)
}

pub async fn insert_term(
	db: &Db,
	dimension: Dimension,
	slug: &str,
	name: &str,
	now: OffsetDateTime,
) -> Result<TaxonomyTerm> {
	let inserted: Option<TaxonomyTerm> = sqlx::query_as(
		"\
INSERT INTO taxonomy_terms (dimension, slug, name, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (dimension, slug) DO NOTHING
RETURNING term_id, dimension, slug, name, created_at",
	)
	.bind(dimension.as_str())
	.bind(slug)
	.bind(name)
	.bind(now)
	.fetch_optional(&db.pool)
	.await?;

	inserted.ok_or_else(|| {
		Error::Conflict(format!("Term '{slug}' already exists in {}.", dimension.as_str()))
	})
}

pub async fn insert_restaurant(db: &Db, restaurant: &Restaurant) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO restaurants (restaurant_id, title, description, address, status, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(restaurant.restaurant_id)
	.bind(restaurant.title.as_str())
	.bind(restaurant.description.as_str())
	.bind(restaurant.address.as_str())
	.bind(restaurant.status.as_str())
	.bind(restaurant.created_at)
	.bind(restaurant.updated_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn assign_term(db: &Db, restaurant_id: Uuid, term_id: i64) -> Result<()> {
	let result = sqlx::query(
		"\
INSERT INTO restaurant_terms (restaurant_id, term_id)
SELECT $1, term_id FROM taxonomy_terms WHERE term_id = $2
ON CONFLICT (restaurant_id, term_id) DO NOTHING",
	)
	.bind(restaurant_id)
	.bind(term_id)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		// Either the term id does not exist or the assignment was already there.
		let exists: Option<i64> =
			sqlx::query_scalar("SELECT term_id FROM taxonomy_terms WHERE term_id = $1")
				.bind(term_id)
				.fetch_optional(&db.pool)
				.await?;

		if exists.is_none() {
			return Err(Error::NotFound(format!("Term {term_id} does not exist.")));
		}
	}

	Ok(())
}

/// Count matches for a spec without retrieving rows. `COUNT(DISTINCT ...)`
/// plays the role of the row query's GROUP BY: term joins fan out and must not
/// inflate the count.
pub async fn count_restaurants(db: &Db, spec: &FilterSpec) -> Result<i64> {
	let mut builder: QueryBuilder<Postgres> =
		QueryBuilder::new("SELECT COUNT(DISTINCT r.restaurant_id) FROM restaurants r");

	push_scope(&mut builder, spec);

	let count: i64 = builder.build_query_scalar().fetch_one(&db.pool).await?;

	Ok(count)
}

/// Fetch a page of matches for a spec, newest first. Grouped by restaurant
/// identity so join fan-out cannot produce duplicate rows.
pub async fn search_restaurants(
	db: &Db,
	spec: &FilterSpec,
	limit: i64,
	offset: i64,
) -> Result<Vec<Restaurant>> {
	let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
		"SELECT r.restaurant_id, r.title, r.description, r.address, r.status, r.created_at, r.updated_at \
		 FROM restaurants r",
	);

	push_scope(&mut builder, spec);

	builder.push(" GROUP BY r.restaurant_id ORDER BY r.created_at DESC LIMIT ");
	builder.push_bind(limit);
	builder.push(" OFFSET ");
	builder.push_bind(offset);

	let restaurants = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(restaurants)
}

/// Append the joins and WHERE clauses for every predicate present in the spec.
/// All predicates are AND-combined.
fn push_scope<'a>(builder: &mut QueryBuilder<'a, Postgres>, spec: &'a FilterSpec) {
	let slug_filters = [
		(Dimension::Region, spec.region.as_deref()),
		(Dimension::Area, spec.area.as_deref()),
		(Dimension::Genre, spec.genre.as_deref()),
	];
	let id_filters = [
		(Dimension::Category, spec.category_id),
		(Dimension::Tag, spec.tag_id),
	];
	let mut idx = 0;

	for (dimension, slug) in slug_filters {
		let Some(slug) = slug else {
			continue;
		};

		push_term_join(builder, idx);
		builder.push(format!(" AND t{idx}.dimension = "));
		builder.push_bind(dimension.as_str());
		builder.push(format!(" AND t{idx}.slug = "));
		builder.push_bind(slug);

		idx += 1;
	}

	for (dimension, term_id) in id_filters {
		let Some(term_id) = term_id else {
			continue;
		};

		push_term_join(builder, idx);
		builder.push(format!(" AND t{idx}.dimension = "));
		builder.push_bind(dimension.as_str());
		builder.push(format!(" AND t{idx}.term_id = "));
		builder.push_bind(term_id);

		idx += 1;
	}

	builder.push(" WHERE r.status = ");
	builder.push_bind("publish");

	if let Some(keyword) = spec.keyword.as_deref() {
		let pattern = format!("%{}%", escape_like(keyword));

		builder.push(" AND (r.title ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR r.description ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR r.address ILIKE ");
		builder.push_bind(pattern);
		builder.push(")");
	}
}

fn push_term_join(builder: &mut QueryBuilder<'_, Postgres>, idx: usize) {
	builder.push(format!(
		" JOIN restaurant_terms rt{idx} ON rt{idx}.restaurant_id = r.restaurant_id \
		 JOIN taxonomy_terms t{idx} ON t{idx}.term_id = rt{idx}.term_id"
	));
}

/// Escape LIKE wildcards so a keyword matches literally.
fn escape_like(keyword: &str) -> String {
	keyword.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_like_wildcards() {
		assert_eq!(escape_like("50% off_deal"), "50\\% off\\_deal");
		assert_eq!(escape_like(r"back\slash"), r"back\\slash");
	}

	#[test]
	fn empty_spec_builds_bare_scope() {
		let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM restaurants r");
		let spec = FilterSpec::default();

		push_scope(&mut builder, &spec);

		let sql = builder.sql().to_string();

		assert!(!sql.contains("JOIN"));
		assert!(sql.contains("WHERE r.status ="));
	}

	#[test]
	fn every_filter_adds_one_join() {
		let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM restaurants r");
		let spec = FilterSpec {
			keyword: Some("ramen".to_string()),
			category_id: Some(3),
			tag_id: Some(9),
			region: Some("hokkaido".to_string()),
			area: Some("hakodate".to_string()),
			genre: Some("ramen".to_string()),
		};

		push_scope(&mut builder, &spec);

		let sql = builder.sql().to_string();

		assert_eq!(sql.matches("JOIN restaurant_terms").count(), 5);
		assert!(sql.contains("ILIKE"));
	}
}
