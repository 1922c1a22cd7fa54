use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use covmap::boundaries::{self, BoundaryClient};
use covmap::{known_countries, known_states, run_batch, Kind, LocationCode, Resolver, StepMeter, ProgressSink};


static DEFAULT_BOUNDARY_URL: &'static str = "https://raw.githubusercontent.com/kjhealy/fips-codes/master/county_fips_master.csv";


fn parse_kind(s: &str) -> Option<Kind> {
	match s {
		"country" => Some(Kind::Country),
		"state" => Some(Kind::State),
		"county" => Some(Kind::County),
		_ => None,
	}
}

fn known_set(kind: Kind) -> Result<HashSet<LocationCode>, boundaries::Error> {
	match kind {
		Kind::Country => Ok(known_countries()),
		Kind::State => Ok(known_states()),
		Kind::County => {
			let url = env::var("COVMAP_BOUNDARY_URL").unwrap_or(DEFAULT_BOUNDARY_URL.into());
			let fips = BoundaryClient::new(url).fetch_county_fips()?;
			Ok(boundaries::known_counties(&fips))
		},
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() < 5 {
		eprintln!("USAGE: {} <country|state|county> <metric> <output.csv> <input.csv> [input.csv ...]", argv[0]);
		std::process::exit(1);
	}
	let kind = match parse_kind(&argv[1]) {
		Some(kind) => kind,
		None => {
			eprintln!("unknown location kind {:?}", argv[1]);
			std::process::exit(1);
		},
	};
	let metric = &argv[2];
	let outfile = &argv[3];
	let inputs: Vec<PathBuf> = argv[4..].iter().map(PathBuf::from).collect();

	let known = known_set(kind)?;
	let mut resolver = Resolver::new();

	let mut pm = StepMeter::new("files", inputs.len());
	let results = run_batch(&inputs, kind, metric, &mut resolver, &known);
	pm.update(inputs.len());
	pm.finish();

	let mut w = csv::Writer::from_path(outfile)?;
	w.write_record(&["file", "code", metric.as_str()])?;
	let mut failed = 0;
	for (path, outcome) in results {
		let mut rows = match outcome {
			Ok(rows) => rows,
			Err(_) => {
				// already logged by run_batch
				failed += 1;
				continue
			},
		};
		rows.sort_by(|a, b| a.code.cmp(&b.code));
		for row in rows {
			let value = row.sums.get(metric.as_str()).copied().unwrap_or(0.0);
			w.write_record(&[
				path.display().to_string(),
				row.code.to_string(),
				format!("{}", value),
			])?;
		}
	}
	w.flush()?;

	if failed > 0 {
		eprintln!("{} of {} files failed, see log output", failed, inputs.len());
	}
	Ok(())
}
