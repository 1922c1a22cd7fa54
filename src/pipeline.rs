use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use serde::Deserialize;

use super::aggregate::{aggregate, backfill, AggregatedRow, LocationRecord};
use super::columns::{latest_column, NoDateColumnFound, ReportDate};
use super::ioutil::magic_open;
use super::registry::LocationCode;
use super::resolve::{Kind, Resolver};


static COUNTRY_COLUMNS: &[&str] = &["Country/Region", "Country_Region"];
static STATE_COLUMNS: &[&str] = &["Province_State", "Province/State"];
static COUNTY_COLUMNS: &[&str] = &["FIPS"];


#[derive(Debug)]
pub enum FileError {
	Io(io::Error),
	Csv(csv::Error),
	NoDateColumn,
	NoLocationColumn(Kind),
}

impl fmt::Display for FileError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Csv(e) => fmt::Display::fmt(e, f),
			Self::NoDateColumn => fmt::Display::fmt(&NoDateColumnFound, f),
			Self::NoLocationColumn(kind) => write!(f, "no {} location column in header", kind),
		}
	}
}

impl From<io::Error> for FileError {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<csv::Error> for FileError {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl From<NoDateColumnFound> for FileError {
	fn from(_: NoDateColumnFound) -> Self {
		Self::NoDateColumn
	}
}

impl std::error::Error for FileError {}


/// Daily-report row shape, the other upstream file format. Fixed columns,
/// so serde can carry it directly.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRecord {
	#[serde(rename = "FIPS", default)]
	pub fips: Option<String>,
	#[serde(rename = "Province_State", default)]
	pub province_state: Option<String>,
	#[serde(rename = "Country_Region")]
	pub country_region: String,
	#[serde(rename = "Combined_Key", default)]
	pub combined_key: Option<String>,
	#[serde(rename = "Confirmed", default)]
	pub confirmed: Option<f64>,
	#[serde(rename = "Deaths", default)]
	pub deaths: Option<f64>,
	#[serde(rename = "Recovered", default)]
	pub recovered: Option<f64>,
	#[serde(rename = "Active", default)]
	pub active: Option<f64>,
}


fn location_column(headers: &csv::StringRecord, kind: Kind) -> Result<usize, FileError> {
	let candidates = match kind {
		Kind::Country => COUNTRY_COLUMNS,
		Kind::State => STATE_COLUMNS,
		Kind::County => COUNTY_COLUMNS,
	};
	headers.iter()
		.position(|h| candidates.contains(&h))
		.ok_or(FileError::NoLocationColumn(kind))
}

/// Reads a time-series file and turns each row into a resolved
/// `LocationRecord` carrying the most recent reported value under `metric`.
/// Rows that fail resolution or value parsing are dropped with a warning.
pub fn process_timeseries<R: io::Read>(
	r: R,
	kind: Kind,
	metric: &str,
	resolver: &mut Resolver,
) -> Result<(ReportDate, Vec<LocationRecord>), FileError> {
	let mut r = csv::Reader::from_reader(r);
	let headers = r.headers()?.clone();
	let loc_index = location_column(&headers, kind)?;
	let (value_index, date) = latest_column(headers.iter())?;

	let mut result = Vec::new();
	for row in r.records() {
		let row = row?;
		let raw_name = match row.get(loc_index) {
			Some(name) if name.len() > 0 => name.to_string(),
			_ => {
				warn!("row without a location name, dropped");
				continue
			},
		};
		let raw_value = row.get(value_index).unwrap_or("");
		let value = match raw_value.trim() {
			"" => 0.0,
			v => match v.parse::<f64>() {
				Ok(v) => v,
				Err(_) => {
					warn!("unparseable value {:?} for {:?}, row dropped", raw_value, raw_name);
					continue
				},
			},
		};
		let code = match resolver.resolve(&raw_name, kind) {
			Ok(code) => code,
			Err(e) => {
				// resolver has already logged country failures; state and
				// county misses surface here
				if kind != Kind::Country {
					warn!("dropping row: {}", e);
				}
				None
			},
		};
		result.push(LocationRecord::new(raw_name, code, kind).with_metric(metric, value));
	}
	Ok((date, result))
}

/// Full single-file pass: read, resolve, aggregate, backfill.
pub fn run_file<P: AsRef<Path>>(
	path: P,
	kind: Kind,
	metric: &str,
	resolver: &mut Resolver,
	known: &HashSet<LocationCode>,
) -> Result<Vec<AggregatedRow>, FileError> {
	let r = magic_open(path.as_ref())?;
	let (date, records) = process_timeseries(r, kind, metric, resolver)?;
	info!("{}: {} rows as of {}", path.as_ref().display(), records.len(), date);
	Ok(backfill(aggregate(records), known, metric))
}

/// Processes every file, keeping per-file failures local: a malformed file
/// is reported in its result slot and the rest of the batch continues.
pub fn run_batch(
	paths: &[PathBuf],
	kind: Kind,
	metric: &str,
	resolver: &mut Resolver,
	known: &HashSet<LocationCode>,
) -> Vec<(PathBuf, Result<Vec<AggregatedRow>, FileError>)> {
	let mut result = Vec::with_capacity(paths.len());
	for path in paths {
		let outcome = run_file(path, kind, metric, resolver, known);
		if let Err(e) = &outcome {
			warn!("{}: file skipped: {}", path.display(), e);
		}
		result.push((path.clone(), outcome));
	}
	result
}


#[cfg(test)]
mod tests {
	use super::*;
	use super::super::aggregate::BACKFILL_SENTINEL;

	fn known(codes: &[&str]) -> HashSet<LocationCode> {
		codes.iter().map(|c| LocationCode::from(*c)).collect()
	}

	fn find<'x>(rows: &'x [AggregatedRow], code: &str) -> &'x AggregatedRow {
		rows.iter().find(|r| r.code == code).unwrap()
	}

	#[test]
	fn end_to_end_country_backfill() {
		let data = "Country/Region,1/22/20,3/5/20\n\"Korea, South\",5,100\n";
		let mut resolver = Resolver::new();
		let (date, records) = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver).unwrap();
		assert_eq!(date.to_string(), "3/5/20");

		let aggregated = aggregate(records);
		assert_eq!(aggregated.len(), 1);
		assert_eq!(aggregated[0].code, "KOR");
		assert_eq!(aggregated[0].sums["confirmed"], 100.0);

		let rows = backfill(aggregated, &known(&["KOR", "USA", "FRA"]), "confirmed");
		assert_eq!(rows.len(), 3);
		assert_eq!(find(&rows, "KOR").sums["confirmed"], 100.0);
		assert_eq!(find(&rows, "USA").sums["confirmed"], BACKFILL_SENTINEL);
		assert_eq!(find(&rows, "FRA").sums["confirmed"], BACKFILL_SENTINEL);
	}

	#[test]
	fn rows_for_same_code_are_summed() {
		// two spellings resolving to the same country must merge
		let data = "Country/Region,3/5/20\nGermany,7\nGermany,5\n";
		let mut resolver = Resolver::new();
		let (_, records) = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver).unwrap();
		let rows = aggregate(records);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].sums["confirmed"], 12.0);
	}

	#[test]
	fn unresolvable_rows_do_not_abort_the_file() {
		let data = "Country/Region,3/5/20\nDiamond Princess,700\nXlqzv Wprt,3\nFrance,5\n";
		let mut resolver = Resolver::new();
		let (_, records) = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver).unwrap();
		assert_eq!(records.len(), 3);
		let rows = aggregate(records);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].code, "FRA");
	}

	#[test]
	fn state_timeseries_uses_exact_table() {
		let data = "Province_State,3/5/20\nNew York,44\nGuam,2\nGrand Princess,21\n";
		let mut resolver = Resolver::new();
		let (_, records) = process_timeseries(data.as_bytes(), Kind::State, "confirmed", &mut resolver).unwrap();
		let rows = aggregate(records);
		assert_eq!(rows.len(), 2);
		assert_eq!(find(&rows, "NY").sums["confirmed"], 44.0);
		assert_eq!(find(&rows, "GU").sums["confirmed"], 2.0);
	}

	#[test]
	fn county_timeseries_normalizes_fips() {
		let data = "FIPS,Admin2,3/5/20\n1001.0,Autauga,12\n36061.0,New York,80\nbad,Nowhere,1\n";
		let mut resolver = Resolver::new();
		let (_, records) = process_timeseries(data.as_bytes(), Kind::County, "confirmed", &mut resolver).unwrap();
		let rows = aggregate(records);
		assert_eq!(rows.len(), 2);
		assert_eq!(find(&rows, "01001").sums["confirmed"], 12.0);
		assert_eq!(find(&rows, "36061").sums["confirmed"], 80.0);
	}

	#[test]
	fn missing_date_column_is_fatal_for_the_file() {
		let data = "Country/Region,Lat,Long\nGermany,51.0,9.0\n";
		let mut resolver = Resolver::new();
		let res = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver);
		assert!(matches!(res, Err(FileError::NoDateColumn)));
	}

	#[test]
	fn missing_location_column_is_fatal_for_the_file() {
		let data = "Province_State,3/5/20\nNew York,44\n";
		let mut resolver = Resolver::new();
		let res = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver);
		assert!(matches!(res, Err(FileError::NoLocationColumn(Kind::Country))));
	}

	#[test]
	fn empty_values_count_as_zero_and_get_the_sentinel() {
		let data = "Country/Region,3/5/20\nGermany,\n";
		let mut resolver = Resolver::new();
		let (_, records) = process_timeseries(data.as_bytes(), Kind::Country, "confirmed", &mut resolver).unwrap();
		let rows = backfill(aggregate(records), &known(&["DEU"]), "confirmed");
		assert_eq!(find(&rows, "DEU").sums["confirmed"], BACKFILL_SENTINEL);
	}

	#[test]
	fn batch_continues_past_a_broken_file() {
		let dir = std::env::temp_dir().join(format!("covmap-batch-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let good = dir.join("good.csv");
		let bad = dir.join("bad.csv");
		std::fs::write(&good, "Country/Region,3/5/20\nGermany,7\n").unwrap();
		std::fs::write(&bad, "Country/Region,Lat,Long\nGermany,51.0,9.0\n").unwrap();

		let mut resolver = Resolver::new();
		let results = run_batch(
			&[bad.clone(), good.clone()],
			Kind::Country,
			"confirmed",
			&mut resolver,
			&known(&["DEU"]),
		);
		std::fs::remove_dir_all(&dir).ok();

		assert_eq!(results.len(), 2);
		// the bad file fails in its own slot only
		assert_eq!(results[0].0, bad);
		assert!(matches!(results[0].1, Err(FileError::NoDateColumn)));
		// the good file is unaffected, even though it came later
		assert_eq!(results[1].0, good);
		let rows = results[1].1.as_ref().unwrap();
		assert_eq!(find(rows, "DEU").sums["confirmed"], 7.0);
	}

	#[test]
	fn daily_record_deserializes_sparse_rows() {
		let data = "FIPS,Province_State,Country_Region,Confirmed,Deaths,Recovered,Active,Combined_Key\n\
			1001.0,Alabama,US,12,1,,11,\"Autauga, Alabama, US\"\n\
			,,France,100,2,30,68,France\n";
		let mut r = csv::Reader::from_reader(data.as_bytes());
		let rows: Vec<DailyRecord> = r.deserialize().collect::<Result<_, _>>().unwrap();
		assert_eq!(rows[0].fips.as_deref(), Some("1001.0"));
		assert_eq!(rows[0].recovered, None);
		assert_eq!(rows[1].province_state, None);
		assert_eq!(rows[1].confirmed, Some(100.0));
	}
}
