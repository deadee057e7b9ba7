pub mod client_ip;
pub mod filter;
pub mod keyword;
pub mod slug;

/// One of the fixed classification dimensions a term can belong to.
///
/// `region`, `area` and `genre` are the hierarchical path dimensions;
/// `category` and `tag` are addressed by id rather than by slug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
	Region,
	Area,
	Genre,
	Category,
	Tag,
}
impl Dimension {
	/// The three dimensions addressable through hierarchical URL segments.
	pub const HIERARCHICAL: [Self; 3] = [Self::Region, Self::Area, Self::Genre];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Region => "region",
			Self::Area => "area",
			Self::Genre => "genre",
			Self::Category => "category",
			Self::Tag => "tag",
		}
	}
}
