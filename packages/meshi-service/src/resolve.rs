use meshi_domain::{Dimension, slug};
use meshi_storage::queries;

use crate::{MeshiService, Result};

/// Outcome of validating hierarchical path segments against the term store.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Resolution {
	/// Whether any segment was supplied at all. When false the request is not
	/// a taxonomy lookup and validity does not apply.
	pub supplied: bool,
	/// True iff at least one supplied segment names an existing term.
	pub valid: bool,
	pub region: Option<String>,
	pub area: Option<String>,
	pub genre: Option<String>,
}

impl MeshiService {
	/// Validate up to three hierarchical path segments.
	///
	/// Segments are sanitized, then checked for term existence in their own
	/// dimension. Validity is OR across dimensions: one good segment makes
	/// the request routable and the bad segments simply drop out of the
	/// resolved slugs. The three dimensions are independent filters; no
	/// parent/child relation between them is checked.
	pub async fn resolve_taxonomy_path(
		&self,
		region: Option<&str>,
		area: Option<&str>,
		genre: Option<&str>,
	) -> Result<Resolution> {
		let max_chars = self.cfg.search.max_slug_chars;
		let segments = Dimension::HIERARCHICAL.into_iter().zip([region, area, genre]);
		let mut supplied = false;
		let mut resolved: [Option<String>; 3] = [const { None }; 3];

		for (slot, (dimension, raw)) in resolved.iter_mut().zip(segments) {
			let Some(raw) = raw else {
				continue;
			};

			if raw.trim().is_empty() {
				continue;
			}

			// A segment that sanitizes to nothing still counts as supplied, so
			// garbage-only paths stay unroutable instead of degrading into the
			// default listing.
			supplied = true;

			let cleaned = slug::sanitize_slug(raw, max_chars);

			if cleaned.is_empty() {
				continue;
			}

			if queries::find_term(&self.db, dimension, &cleaned).await?.is_none() {
				tracing::debug!(
					dimension = dimension.as_str(),
					slug = cleaned.as_str(),
					"Path segment does not resolve to a term."
				);

				continue;
			}

			*slot = Some(cleaned);
		}

		let [region, area, genre] = resolved;
		let valid = region.is_some() || area.is_some() || genre.is_some();

		Ok(Resolution { supplied, valid, region, area, genre })
	}
}
