use std::net::{IpAddr, Ipv4Addr};

/// Substitute for any client address that fails IP-syntax validation. Pooling
/// all invalid traffic into one shared rate-limit bucket is deliberate.
pub const FALLBACK_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Resolve the client IP for rate limiting.
///
/// Precedence: explicit `Client-IP` header, else the first comma-separated
/// entry of `X-Forwarded-For` (trimmed), else the direct connection address.
/// A candidate that does not parse as an IP address yields [`FALLBACK_IP`].
pub fn resolve_client_ip(
	client_ip_header: Option<&str>,
	forwarded_for: Option<&str>,
	remote_addr: Option<IpAddr>,
) -> IpAddr {
	let candidate = client_ip_header
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.or_else(|| {
			forwarded_for
				.and_then(|value| value.split(',').next())
				.map(str::trim)
				.filter(|value| !value.is_empty())
		});

	match candidate {
		Some(raw) => raw.parse().unwrap_or(FALLBACK_IP),
		None => remote_addr.unwrap_or(FALLBACK_IP),
	}
}
