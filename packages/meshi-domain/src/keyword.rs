use regex::Regex;

/// Patterns removed from search keywords before they reach the query layer.
/// Matches are stripped rather than escaped, so a keyword consisting solely of
/// a forbidden pattern collapses to the empty string.
const DANGEROUS_PATTERNS: [&str; 4] = [
	r"(?i)\b(union|select|insert|update|delete|drop|create|alter|exec|execute)\b",
	r"(?is)<script\b[^>]*>.*?</script>",
	r"(?i)javascript:",
	r"(?i)on\w+\s*=",
];

/// Sanitize a free-text search keyword.
///
/// Applied in order: control characters removed and whitespace runs collapsed,
/// length capped at `max_chars` characters, denylist patterns stripped, then
/// trimmed. The result may be empty.
pub fn sanitize_keyword(raw: &str, max_chars: usize) -> String {
	let mut cleaned = String::with_capacity(raw.len());
	let mut last_was_space = false;

	for ch in raw.chars() {
		if ch.is_control() && !ch.is_whitespace() {
			continue;
		}
		if ch.is_whitespace() {
			if !last_was_space {
				cleaned.push(' ');
			}
			last_was_space = true;
		} else {
			cleaned.push(ch);
			last_was_space = false;
		}
	}

	let mut keyword: String = cleaned.trim().chars().take(max_chars).collect();

	for pattern in DANGEROUS_PATTERNS {
		if let Ok(re) = Regex::new(pattern) {
			keyword = re.replace_all(&keyword, "").into_owned();
		}
	}

	keyword.trim().to_string()
}
