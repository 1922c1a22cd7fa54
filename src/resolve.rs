use std::collections::HashMap;
use std::fmt;

use log::{trace, warn};

use super::fips::{fix_fips, MalformedFips};
use super::registry::{LocationCode, COUNTRY_REGISTRY, COUNTRY_OVERRIDES, CONGO_CODE, state_code};


/// Minimum jaro-winkler similarity for a registry name to count as a match.
static FUZZY_THRESHOLD: f64 = 0.85;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	Country,
	State,
	County,
}

impl fmt::Display for Kind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Country => f.write_str("country"),
			Self::State => f.write_str("state"),
			Self::County => f.write_str("county"),
		}
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
	/// State name absent from the exhaustive table.
	UnknownState(String),
	/// Nothing left of the name after stripping footnote markers.
	ScrubFailed(String),
	/// Best registry candidate fell below the similarity threshold.
	NoFuzzyMatch(String),
	/// County identifier that cannot be normalized to five digits.
	MalformedIdentifier(MalformedFips),
}

impl fmt::Display for ResolveError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnknownState(name) => write!(f, "unknown state name {:?}", name),
			Self::ScrubFailed(name) => write!(f, "nothing left of {:?} after scrubbing", name),
			Self::NoFuzzyMatch(name) => write!(f, "no registry entry close enough to {:?}", name),
			Self::MalformedIdentifier(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<MalformedFips> for ResolveError {
	fn from(other: MalformedFips) -> Self {
		Self::MalformedIdentifier(other)
	}
}

impl std::error::Error for ResolveError {}


#[derive(Debug, Clone, PartialEq, Eq)]
enum Cached {
	Code(LocationCode),
	Unmapped,
	ScrubFailed,
	NoMatch,
}

/// Memo table for country resolutions, keyed by the exact raw name. All
/// outcomes are cached, including failed ones, so re-resolving a name
/// reproduces the first result without touching the registry again.
#[derive(Debug, Clone, Default)]
pub struct ResolverCache {
	entries: HashMap<String, Cached>,
}

impl ResolverCache {
	pub fn new() -> Self {
		Self{entries: HashMap::new()}
	}

	pub fn reset(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	fn get(&self, raw: &str) -> Option<&Cached> {
		self.entries.get(raw)
	}

	fn insert(&mut self, raw: &str, outcome: Cached) {
		self.entries.insert(raw.into(), outcome);
	}
}


pub struct Resolver {
	registry: &'static [(&'static str, &'static str)],
	overrides: &'static [(&'static str, Option<&'static str>)],
	cache: ResolverCache,
}

impl Resolver {
	pub fn new() -> Self {
		Self::with_registry(COUNTRY_REGISTRY)
	}

	/// Resolver over a custom registry. Mainly useful for tests: with an
	/// empty registry, any resolution reaching the fuzzy stage fails, which
	/// makes accidental fuzzy lookups for overridden names observable.
	pub fn with_registry(registry: &'static [(&'static str, &'static str)]) -> Self {
		Self{
			registry,
			overrides: COUNTRY_OVERRIDES,
			cache: ResolverCache::new(),
		}
	}

	pub fn cache(&self) -> &ResolverCache {
		&self.cache
	}

	pub fn reset_cache(&mut self) {
		self.cache.reset();
	}

	/// Maps a raw location name to its normalized code.
	///
	/// `Ok(None)` means the name is intentionally unmapped (cruise ships and
	/// similar non-territories). Errors are per-row conditions; callers drop
	/// the row and keep going.
	pub fn resolve(&mut self, raw: &str, kind: Kind) -> Result<Option<LocationCode>, ResolveError> {
		match kind {
			Kind::State => match state_code(raw) {
				Some(code) => Ok(Some(code.into())),
				None => Err(ResolveError::UnknownState(raw.into())),
			},
			Kind::County => Ok(Some(fix_fips(raw)?.into())),
			Kind::Country => self.resolve_country(raw),
		}
	}

	fn resolve_country(&mut self, raw: &str) -> Result<Option<LocationCode>, ResolveError> {
		if let Some(cached) = self.cache.get(raw) {
			trace!("cache hit for {:?}: {:?}", raw, cached);
			return match cached {
				Cached::Code(code) => Ok(Some(code.clone())),
				Cached::Unmapped => Ok(None),
				Cached::ScrubFailed => Err(ResolveError::ScrubFailed(raw.into())),
				Cached::NoMatch => Err(ResolveError::NoFuzzyMatch(raw.into())),
			}
		}

		let outcome = self.resolve_country_uncached(raw);
		self.cache.insert(raw, match &outcome {
			Ok(Some(code)) => Cached::Code(code.clone()),
			Ok(None) => Cached::Unmapped,
			Err(ResolveError::ScrubFailed(_)) => Cached::ScrubFailed,
			Err(_) => Cached::NoMatch,
		});
		if let Err(e) = &outcome {
			warn!("unresolvable country name: {}", e);
		}
		outcome
	}

	fn resolve_country_uncached(&self, raw: &str) -> Result<Option<LocationCode>, ResolveError> {
		for &(name, code) in self.overrides {
			if name == raw {
				return Ok(code.map(|c| c.into()))
			}
		}

		// two differently-suffixed Congo entries exist in the source data
		// and fuzzy matching resolves them inconsistently
		if let Some(token) = raw.split_whitespace().next() {
			if token.trim_end_matches(|c: char| !c.is_alphabetic()) == "Congo" {
				return Ok(Some(CONGO_CODE.into()))
			}
		}

		let scrubbed = scrub(raw).ok_or_else(|| ResolveError::ScrubFailed(raw.into()))?;
		match self.fuzzy_match(&scrubbed) {
			Some(code) => Ok(Some(code.into())),
			None => Err(ResolveError::NoFuzzyMatch(raw.into())),
		}
	}

	fn fuzzy_match(&self, scrubbed: &str) -> Option<&'static str> {
		let needle = scrubbed.to_lowercase();
		let mut best: Option<(f64, &'static str)> = None;
		for &(name, code) in self.registry {
			let score = strsim::jaro_winkler(&needle, &name.to_lowercase());
			match best {
				Some((best_score, _)) if best_score >= score => (),
				_ => best = Some((score, code)),
			}
		}
		match best {
			Some((score, code)) if score >= FUZZY_THRESHOLD => Some(code),
			_ => None,
		}
	}
}


/// Strips footnote markers ("Taiwan*") and surrounding whitespace. Returns
/// None if nothing usable remains.
fn scrub(raw: &str) -> Option<String> {
	let scrubbed: String = raw.chars().filter(|c| *c != '*').collect();
	let scrubbed = scrubbed.trim();
	if scrubbed.len() == 0 {
		return None
	}
	Some(scrubbed.into())
}
