use std::{
	net::IpAddr,
	sync::atomic::{AtomicI64, Ordering},
};

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};

/// Per-IP fixed-window request counter.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
	count: u32,
	started_at: OffsetDateTime,
}

/// Fixed-window admission control keyed by client IP.
///
/// A fresh window starts at the first request from an IP and admits up to
/// `max_requests` within `window`. Rejections do not mutate state, so a
/// hammering client cannot extend its own window. Expiry is passive: an
/// expired window is treated as absent and overwritten by the next request,
/// and entries from IPs that never return are swept opportunistically during
/// admission so the map stays bounded under distinct-IP traffic.
/// The quota is soft; concurrent requests from one IP racing on the counter
/// may land slightly off the boundary, which is acceptable here.
pub struct RateLimiter {
	max_requests: u32,
	window: Duration,
	windows: DashMap<IpAddr, RateWindow>,
	last_purge: AtomicI64,
}
impl RateLimiter {
	pub fn new(cfg: &meshi_config::RateLimit) -> Self {
		let window_secs = i64::try_from(cfg.window_secs).unwrap_or(i64::MAX);

		Self {
			max_requests: cfg.max_requests,
			window: Duration::seconds(window_secs),
			windows: DashMap::new(),
			last_purge: AtomicI64::new(OffsetDateTime::now_utc().unix_timestamp()),
		}
	}

	/// Admit or reject one request from `ip`.
	pub fn admit(&self, ip: IpAddr) -> bool {
		self.admit_at(ip, OffsetDateTime::now_utc())
	}

	/// Admission with an explicit timestamp; the clock is injected so tests
	/// can advance it past the window.
	pub fn admit_at(&self, ip: IpAddr, now: OffsetDateTime) -> bool {
		// Sweep before taking the entry guard; retain and the guard contend on
		// the same shard locks.
		self.maybe_purge(now);

		let mut entry = self
			.windows
			.entry(ip)
			.or_insert(RateWindow { count: 0, started_at: now });
		let window = entry.value_mut();

		if now - window.started_at >= self.window {
			// Previous window expired. Start over as if the entry were absent.
			*window = RateWindow { count: 1, started_at: now };

			return true;
		}
		if window.count >= self.max_requests {
			return false;
		}

		window.count += 1;

		true
	}

	/// Drop windows whose expiry has passed. Admission does not need this for
	/// correctness; it only bounds the map's memory on long-running processes.
	pub fn purge_expired(&self, now: OffsetDateTime) {
		self.windows.retain(|_, window| now - window.started_at < self.window);
	}

	/// Run `purge_expired` at most once per window interval, piggybacked on
	/// admission. The compare-exchange elects a single purger under
	/// concurrency.
	fn maybe_purge(&self, now: OffsetDateTime) {
		let stamp = now.unix_timestamp();
		let last = self.last_purge.load(Ordering::Relaxed);

		if stamp.saturating_sub(last) < self.window.whole_seconds() {
			return;
		}
		if self
			.last_purge
			.compare_exchange(last, stamp, Ordering::Relaxed, Ordering::Relaxed)
			.is_ok()
		{
			self.purge_expired(now);
		}
	}

	pub fn tracked_ips(&self) -> usize {
		self.windows.len()
	}
}
