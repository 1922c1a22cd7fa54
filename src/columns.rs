use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use serde::{de, Deserialize, Deserializer};


/// Reporting date in the upstream `M/D/YY` header format, no zero padding.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(pub NaiveDate);

impl From<ReportDate> for NaiveDate {
	fn from(other: ReportDate) -> Self {
		other.0
	}
}


#[derive(Debug, Clone)]
pub enum ParseReportDateError {
	WrongShape,
	InvalidDate,
}

impl fmt::Display for ParseReportDateError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::WrongShape => f.write_str("not shaped like M/D/YY"),
			Self::InvalidDate => f.write_str("no such calendar date"),
		}
	}
}

impl std::error::Error for ParseReportDateError {}


fn component(s: &str, max_len: usize) -> Option<u32> {
	if s.len() < 1 || s.len() > max_len {
		return None
	}
	if !s.bytes().all(|b| b.is_ascii_digit()) {
		return None
	}
	s.parse::<u32>().ok()
}

impl FromStr for ReportDate {
	type Err = ParseReportDateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(3, '/');
		let month = parts.next().and_then(|p| component(p, 2));
		let day = parts.next().and_then(|p| component(p, 2));
		// month and day come unpadded, but the year is always two digits
		let year = parts.next().filter(|p| p.len() == 2).and_then(|p| component(p, 2));
		let (month, day, year) = match (month, day, year) {
			(Some(m), Some(d), Some(y)) => (m, d, y),
			_ => return Err(ParseReportDateError::WrongShape),
		};
		// two-digit years in the data all live in the 2000s
		match NaiveDate::from_ymd_opt(2000 + year as i32, month, day) {
			Some(date) => Ok(ReportDate(date)),
			None => Err(ParseReportDateError::InvalidDate),
		}
	}
}

impl fmt::Display for ReportDate {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		use chrono::Datelike;
		write!(f, "{}/{}/{:02}", self.0.month(), self.0.day(), self.0.year() % 100)
	}
}

impl<'de> Deserialize<'de> for ReportDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}


#[derive(Debug, Clone)]
pub struct NoDateColumnFound;

impl fmt::Display for NoDateColumnFound {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str("no column header matches the M/D/YY date pattern")
	}
}

impl std::error::Error for NoDateColumnFound {}


/// All headers which parse as `M/D/YY`, with their positions.
pub fn date_columns<'x, I: IntoIterator<Item = &'x str>>(headers: I) -> Vec<(usize, ReportDate)> {
	headers.into_iter().enumerate().filter_map(|(i, h)| {
		h.parse::<ReportDate>().ok().map(|d| (i, d))
	}).collect()
}

/// Position and date of the most recent date column, by calendar order.
///
/// The upstream scripts sorted the header strings lexicographically, which
/// misorders two-digit months against one-digit ones ("9/1/21" > "12/1/21").
/// Selection here compares parsed dates instead.
pub fn latest_column<'x, I: IntoIterator<Item = &'x str>>(headers: I) -> Result<(usize, ReportDate), NoDateColumnFound> {
	date_columns(headers).into_iter()
		.max_by_key(|(_, d)| *d)
		.ok_or(NoDateColumnFound)
}
