use std::collections::HashSet;
use std::fmt;
use std::thread;
use std::time::Duration;

use log::warn;

use reqwest;

use serde::Deserialize;

use super::fips::FipsCode;
use super::registry::LocationCode;


/// Attempts per fetch; the boundary list is the sole network dependency and
/// the pipeline cannot render counties without it.
static FETCH_ATTEMPTS: u32 = 3;
static RETRY_DELAY: Duration = Duration::from_secs(2);


#[derive(Debug)]
pub enum Error {
	Request(reqwest::Error),
	Status(reqwest::StatusCode),
	Csv(csv::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Status(code) => write!(f, "boundary server replied {}", code),
			Self::Csv(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Request(err)
	}
}

impl From<csv::Error> for Error {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl std::error::Error for Error {}


#[derive(Debug, Clone, Deserialize)]
struct BoundaryRow {
	#[serde(rename = "FIPS")]
	fips: FipsCode,
}


pub struct BoundaryClient {
	client: reqwest::blocking::Client,
	url: String,
}

impl BoundaryClient {
	pub fn new(url: String) -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
			url,
		}
	}

	/// Downloads the county boundary identifier list and returns the full
	/// universe of county codes. Connection-level failures are retried a
	/// bounded number of times; HTTP error statuses are not, since they
	/// will not heal on their own.
	pub fn fetch_county_fips(&self) -> Result<Vec<FipsCode>, Error> {
		let body = self.fetch_with_retry()?;
		let mut result = Vec::new();
		let mut r = csv::Reader::from_reader(body.as_bytes());
		for row in r.deserialize() {
			let rec: BoundaryRow = row?;
			result.push(rec.fips);
		}
		Ok(result)
	}

	fn fetch_with_retry(&self) -> Result<String, Error> {
		let mut attempt = 0;
		loop {
			attempt += 1;
			match self.fetch_once() {
				Ok(body) => return Ok(body),
				Err(Error::Request(e)) if attempt < FETCH_ATTEMPTS => {
					warn!("boundary fetch attempt {}/{} failed: {}", attempt, FETCH_ATTEMPTS, e);
					thread::sleep(RETRY_DELAY);
				},
				Err(e) => return Err(e),
			}
		}
	}

	fn fetch_once(&self) -> Result<String, Error> {
		let resp = self.client.get(self.url.clone()).send()?;
		if !resp.status().is_success() {
			return Err(Error::Status(resp.status()))
		}
		Ok(resp.text()?)
	}
}


pub fn known_counties(fips: &[FipsCode]) -> HashSet<LocationCode> {
	fips.iter().map(|f| LocationCode::from(f.as_str())).collect()
}
