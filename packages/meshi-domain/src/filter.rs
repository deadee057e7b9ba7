use crate::{keyword, slug};

/// The resolved query intent for one request. Built once, immutable after
/// construction, consumed by the storage layer. All present fields are
/// AND-combined when the query runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FilterSpec {
	pub keyword: Option<String>,
	pub category_id: Option<i64>,
	pub tag_id: Option<i64>,
	pub region: Option<String>,
	pub area: Option<String>,
	pub genre: Option<String>,
}
impl FilterSpec {
	/// An empty spec is valid and means "match everything"; callers use it to
	/// fall through to the default listing instead of running a scoped query.
	pub fn is_empty(&self) -> bool {
		self.keyword.is_none()
			&& self.category_id.is_none()
			&& self.tag_id.is_none()
			&& self.region.is_none()
			&& self.area.is_none()
			&& self.genre.is_none()
	}
}

/// Raw request parameters feeding [`build_filter_spec`]. The taxonomy slugs
/// here are the resolver's output, i.e. only slugs that exist in their
/// dimension; unresolved segments must already have been dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterInput<'a> {
	pub keyword: Option<&'a str>,
	pub category: Option<&'a str>,
	pub tag: Option<&'a str>,
	pub region: Option<&'a str>,
	pub area: Option<&'a str>,
	pub genre: Option<&'a str>,
}

/// Build a [`FilterSpec`] from raw request parameters.
///
/// Pure and I/O-free: keyword sanitation and id coercion happen here, term
/// existence checks do not. Malformed category/tag values silently coerce to
/// absent rather than erroring.
pub fn build_filter_spec(
	input: FilterInput<'_>,
	max_keyword_chars: usize,
	max_slug_chars: usize,
) -> FilterSpec {
	let keyword = input
		.keyword
		.map(|raw| keyword::sanitize_keyword(raw, max_keyword_chars))
		.filter(|cleaned| !cleaned.is_empty());
	let non_empty_slug = |raw: Option<&str>| {
		raw.map(|value| slug::sanitize_slug(value, max_slug_chars))
			.filter(|cleaned| !cleaned.is_empty())
	};

	FilterSpec {
		keyword,
		category_id: input.category.and_then(parse_term_id),
		tag_id: input.tag.and_then(parse_term_id),
		region: non_empty_slug(input.region),
		area: non_empty_slug(input.area),
		genre: non_empty_slug(input.genre),
	}
}

/// Coerce a raw category/tag parameter to a term id. Anything that is not a
/// positive integer becomes `None` (absent filter), mirroring the lenient
/// handling of malformed identifiers.
pub fn parse_term_id(raw: &str) -> Option<i64> {
	raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
