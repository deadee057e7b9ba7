use unicode_normalization::UnicodeNormalization;

/// Sanitize a taxonomy slug before term lookup.
///
/// NFKC-normalizes, lowercases, turns whitespace runs into single hyphens and
/// drops every character that is not alphanumeric (any script), a hyphen or an
/// underscore. Disallowed characters are rejected from the slug, not escaped.
/// The result is truncated to `max_chars` characters and may be empty.
pub fn sanitize_slug(raw: &str, max_chars: usize) -> String {
	let normalized: String = raw.nfkc().collect();
	let mut slug = String::with_capacity(normalized.len());
	let mut last_was_hyphen = false;

	for ch in normalized.chars() {
		if ch.is_whitespace() {
			if !last_was_hyphen && !slug.is_empty() {
				slug.push('-');
				last_was_hyphen = true;
			}
			continue;
		}
		if ch.is_alphanumeric() || ch == '-' || ch == '_' {
			for lowered in ch.to_lowercase() {
				slug.push(lowered);
			}
			last_was_hyphen = ch == '-';
		}
	}

	let trimmed: String = slug.chars().take(max_chars).collect();

	trimmed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_keeps_allowed_chars() {
		assert_eq!(sanitize_slug("Tokyo", 50), "tokyo");
		assert_eq!(sanitize_slug("shinjuku_3-chome", 50), "shinjuku_3-chome");
	}

	#[test]
	fn rejects_disallowed_chars() {
		assert_eq!(sanitize_slug("to/kyo?x=1", 50), "tokyox1");
		assert_eq!(sanitize_slug("a<script>b", 50), "ascriptb");
	}

	#[test]
	fn keeps_localized_word_chars() {
		assert_eq!(sanitize_slug("北海道", 50), "北海道");
	}

	#[test]
	fn hyphenates_whitespace() {
		assert_eq!(sanitize_slug("  sapporo  station ", 50), "sapporo-station");
	}

	#[test]
	fn truncates_to_limit() {
		let long = "a".repeat(80);

		assert_eq!(sanitize_slug(&long, 50).chars().count(), 50);
	}
}
