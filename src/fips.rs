use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

use smartstring::alias::{String as SmartString};


/// Zero-padded five digit county identifier. The upstream data stores these
/// as truncated decimal strings ("1001.0"), so parsing has to reconstruct
/// the canonical form.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FipsCode(SmartString);

impl FipsCode {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<FipsCode> for SmartString {
	fn from(other: FipsCode) -> Self {
		other.0
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedFips {
	Empty,
	NotNumeric(String),
	TooLong(String),
}

impl fmt::Display for MalformedFips {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("empty county identifier"),
			Self::NotNumeric(s) => write!(f, "county identifier {:?} is not numeric", s),
			Self::TooLong(s) => write!(f, "county identifier {:?} exceeds five digits", s),
		}
	}
}

impl std::error::Error for MalformedFips {}


impl FromStr for FipsCode {
	type Err = MalformedFips;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// everything after a decimal point is float-conversion residue
		let integral = match s.split_once('.') {
			Some((i, _)) => i,
			None => s,
		};
		let integral = integral.trim();
		if integral.len() == 0 {
			return Err(MalformedFips::Empty)
		}
		if !integral.bytes().all(|b| b.is_ascii_digit()) {
			return Err(MalformedFips::NotNumeric(s.into()))
		}
		if integral.len() > 5 {
			return Err(MalformedFips::TooLong(s.into()))
		}
		let mut code = SmartString::new();
		for _ in integral.len()..5 {
			code.push('0');
		}
		code.push_str(integral);
		Ok(FipsCode(code))
	}
}

impl fmt::Display for FipsCode {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for FipsCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}


/// Convenience wrapper matching the upstream helper's shape.
pub fn fix_fips(raw: &str) -> Result<FipsCode, MalformedFips> {
	raw.parse()
}
