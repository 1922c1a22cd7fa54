use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::Path;

use log::warn;

use covmap::{magic_open, find_csv_files, CountMeter, DailyRecord, ProgressSink};


#[derive(Debug, Clone, Copy, Default)]
struct Totals {
	confirmed: f64,
	deaths: f64,
	recovered: f64,
	active: f64,
}

impl Totals {
	fn add(&mut self, rec: &DailyRecord) {
		self.confirmed += rec.confirmed.unwrap_or(0.0);
		self.deaths += rec.deaths.unwrap_or(0.0);
		self.recovered += rec.recovered.unwrap_or(0.0);
		self.active += rec.active.unwrap_or(0.0);
	}
}

#[derive(Debug, Default)]
struct Summary {
	by_country: BTreeMap<String, Totals>,
	by_state: BTreeMap<(String, String), Totals>,
	by_city: BTreeMap<String, Totals>,
	seen: HashSet<String>,
}

fn fingerprint(row: &csv::StringRecord) -> String {
	let mut s = String::new();
	for field in row.iter() {
		s.push_str(field);
		// unit separator, cannot occur inside a CSV field
		s.push('\x1f');
	}
	s
}

impl Summary {
	/// Repeated rows, within one file or across the batch, count once.
	fn mark_seen(&mut self, row: &csv::StringRecord) -> bool {
		self.seen.insert(fingerprint(row))
	}

	fn submit(&mut self, rec: &DailyRecord) {
		self.by_country.entry(rec.country_region.clone()).or_default().add(rec);
		if let Some(state) = &rec.province_state {
			self.by_state.entry((state.clone(), rec.country_region.clone())).or_default().add(rec);
		}
		if let Some(key) = &rec.combined_key {
			self.by_city.entry(key.clone()).or_default().add(rec);
		}
	}
}

fn load_reader<R: io::Read>(r: R, summary: &mut Summary) -> csv::Result<usize> {
	let mut r = csv::Reader::from_reader(r);
	let headers = r.headers()?.clone();
	let mut pm = CountMeter::new("rows");
	let mut n = 0;
	for (i, row) in r.records().enumerate() {
		let row = match row {
			Ok(row) => row,
			Err(e) => {
				warn!("malformed row, skipped: {}", e);
				continue
			},
		};
		if !summary.mark_seen(&row) {
			continue
		}
		let rec: DailyRecord = match row.deserialize(Some(&headers)) {
			Ok(rec) => rec,
			Err(e) => {
				warn!("malformed row, skipped: {}", e);
				continue
			},
		};
		summary.submit(&rec);
		if i % 10000 == 9999 {
			pm.update(i + 1);
		}
		n = i + 1;
	}
	pm.update(n);
	pm.finish();
	Ok(n)
}

fn load_file<P: AsRef<Path>>(path: P, summary: &mut Summary) -> Result<usize, Box<dyn std::error::Error>> {
	let r = magic_open(path)?;
	Ok(load_reader(r, summary)?)
}

fn print_section<K: std::fmt::Debug>(title: &str, rows: &BTreeMap<K, Totals>) {
	println!("{}", "-".repeat(80));
	println!("{}", title);
	println!("{}", "-".repeat(80));
	println!();
	for (key, t) in rows {
		println!("{:?}: confirmed={:.0} deaths={:.0} recovered={:.0} active={:.0}", key, t.confirmed, t.deaths, t.recovered, t.active);
	}
	println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() != 2 {
		eprintln!("USAGE: {} <path to data directory>", argv[0]);
		std::process::exit(1);
	}

	let files = find_csv_files(&argv[1])?;
	let mut summary = Summary::default();
	for path in files.iter() {
		println!("loading {} ...", path.display());
		// a malformed file must not take down the rest of the batch
		if let Err(e) = load_file(path, &mut summary) {
			warn!("{}: file skipped: {}", path.display(), e);
		}
	}

	print_section("Sums by Country", &summary.by_country);
	print_section("Sums by State/Province", &summary.by_state);
	print_section("Sums by City", &summary.by_city);
	Ok(())
}


#[cfg(test)]
mod tests {
	use super::*;

	static HEADER: &str = "FIPS,Province_State,Country_Region,Confirmed,Deaths,Recovered,Active,Combined_Key\n";

	#[test]
	fn duplicate_rows_count_once_across_files() {
		// daily files overlap; a byte-identical row must only be summed once
		let file_a = format!("{}1001.0,Alabama,US,12,1,0,11,\"Autauga, Alabama, US\"\n", HEADER);
		let file_b = format!("{}1001.0,Alabama,US,12,1,0,11,\"Autauga, Alabama, US\"\n,,France,100,2,30,68,France\n", HEADER);

		let mut summary = Summary::default();
		load_reader(file_a.as_bytes(), &mut summary).unwrap();
		load_reader(file_b.as_bytes(), &mut summary).unwrap();

		assert_eq!(summary.by_country["US"].confirmed, 12.0);
		assert_eq!(summary.by_country["France"].confirmed, 100.0);
	}

	#[test]
	fn duplicate_rows_count_once_within_a_file() {
		let data = format!("{}1001.0,Alabama,US,12,1,0,11,\"Autauga, Alabama, US\"\n1001.0,Alabama,US,12,1,0,11,\"Autauga, Alabama, US\"\n", HEADER);
		let mut summary = Summary::default();
		load_reader(data.as_bytes(), &mut summary).unwrap();
		assert_eq!(summary.by_country["US"].confirmed, 12.0);
		assert_eq!(summary.by_state[&("Alabama".to_string(), "US".to_string())].deaths, 1.0);
	}

	#[test]
	fn distinct_rows_still_sum() {
		let data = format!("{}1001.0,Alabama,US,12,1,0,11,\"Autauga, Alabama, US\"\n1003.0,Alabama,US,30,2,0,28,\"Baldwin, Alabama, US\"\n", HEADER);
		let mut summary = Summary::default();
		load_reader(data.as_bytes(), &mut summary).unwrap();
		assert_eq!(summary.by_country["US"].confirmed, 42.0);
		assert_eq!(summary.by_state[&("Alabama".to_string(), "US".to_string())].confirmed, 42.0);
	}
}
