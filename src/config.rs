//! Application configuration, fixed at build time.

/// Settings shared through Leptos context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Prefix of every backend route, e.g. `/api`.
	pub api_base: String,
	/// Chapter loaded on startup.
	pub default_chapter: String,
}

impl AppConfig {
	/// Reads `KG_API_BASE` and `KG_DEFAULT_CHAPTER` from the build environment.
	pub fn from_env() -> Self {
		Self::from_values(option_env!("KG_API_BASE"), option_env!("KG_DEFAULT_CHAPTER"))
	}

	fn from_values(api_base: Option<&str>, default_chapter: Option<&str>) -> Self {
		let defaults = Self::default();
		Self {
			api_base: api_base
				.filter(|s| !s.is_empty())
				.map(|s| s.trim_end_matches('/').to_string())
				.unwrap_or(defaults.api_base),
			default_chapter: default_chapter
				.filter(|s| !s.is_empty())
				.map(str::to_string)
				.unwrap_or(defaults.default_chapter),
		}
	}

	/// Absolute route below the API base.
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.api_base, path.trim_start_matches('/'))
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: "/api".into(),
			default_chapter: "chapter1".into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_when_unset() {
		assert_eq!(AppConfig::from_values(None, Some("")), AppConfig::default());
	}

	#[test]
	fn overrides_and_trims() {
		let config = AppConfig::from_values(Some("https://kg.example/api/"), Some("ch7"));
		assert_eq!(config.default_chapter, "ch7");
		assert_eq!(config.url("/graph/ch7"), "https://kg.example/api/graph/ch7");
	}
}
