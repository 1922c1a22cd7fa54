use std::collections::{HashMap, HashSet};

use smartstring::alias::{String as SmartString};

use super::registry::LocationCode;
use super::resolve::Kind;


pub type MetricMap = HashMap<SmartString, f64>;

/// Rendering libraries suppress zero-valued regions from color-coded maps,
/// so backfilled and zero-reporting locations carry this small positive
/// value instead. Indistinguishable from zero at display precision.
pub static BACKFILL_SENTINEL: f64 = 0.1;


/// One input row with its resolution outcome attached. The raw name stays
/// around for diagnostics; the code is resolved exactly once.
#[derive(Debug, Clone)]
pub struct LocationRecord {
	pub raw_name: String,
	pub code: Option<LocationCode>,
	pub kind: Kind,
	pub counts: MetricMap,
}

impl LocationRecord {
	pub fn new(raw_name: String, code: Option<LocationCode>, kind: Kind) -> Self {
		Self{
			raw_name,
			code,
			kind,
			counts: MetricMap::new(),
		}
	}

	pub fn with_metric(mut self, metric: &str, value: f64) -> Self {
		self.counts.insert(metric.into(), value);
		self
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
	pub code: LocationCode,
	pub sums: MetricMap,
}


/// Groups records by resolved code and sums each metric. Records without a
/// code are dropped, not collected into an "unknown" bucket. Output order
/// is unspecified; sort by code if determinism is needed.
pub fn aggregate<I: IntoIterator<Item = LocationRecord>>(records: I) -> Vec<AggregatedRow> {
	let mut groups: HashMap<LocationCode, MetricMap> = HashMap::new();
	for rec in records {
		let code = match rec.code {
			Some(code) => code,
			None => continue,
		};
		let sums = groups.entry(code).or_insert_with(MetricMap::new);
		for (metric, value) in rec.counts {
			*sums.entry(metric).or_insert(0.0) += value;
		}
	}
	groups.into_iter().map(|(code, sums)| AggregatedRow{code, sums}).collect()
}


/// Ensures every known code appears in the output: synthesizes a sentinel
/// row per missing code and raises reported exact zeros of `metric` to the
/// sentinel as well. "Never reported" and "reported zero" deliberately
/// collapse into one display bucket here.
pub fn backfill(mut aggregated: Vec<AggregatedRow>, known: &HashSet<LocationCode>, metric: &str) -> Vec<AggregatedRow> {
	let mut missing: HashSet<&LocationCode> = known.iter().collect();
	for row in aggregated.iter_mut() {
		missing.remove(&row.code);
		match row.sums.get_mut(metric) {
			Some(v) if *v == 0.0 => *v = BACKFILL_SENTINEL,
			Some(_) => (),
			None => {
				row.sums.insert(metric.into(), BACKFILL_SENTINEL);
			},
		}
	}
	for code in missing {
		let mut sums = MetricMap::new();
		sums.insert(metric.into(), BACKFILL_SENTINEL);
		aggregated.push(AggregatedRow{
			code: code.clone(),
			sums,
		});
	}
	aggregated
}


#[cfg(test)]
mod tests {
	use super::*;

	fn rec(name: &str, code: Option<&str>, value: f64) -> LocationRecord {
		LocationRecord::new(name.into(), code.map(|c| c.into()), Kind::Country)
			.with_metric("confirmed", value)
	}

	fn known(codes: &[&str]) -> HashSet<LocationCode> {
		codes.iter().map(|c| LocationCode::from(*c)).collect()
	}

	fn find<'x>(rows: &'x [AggregatedRow], code: &str) -> &'x AggregatedRow {
		rows.iter().find(|r| r.code == code).unwrap()
	}

	#[test]
	fn aggregate_sums_per_code() {
		let rows = aggregate(vec![
			rec("Germany", Some("DEU"), 10.0),
			rec("Germany", Some("DEU"), 32.0),
			rec("France", Some("FRA"), 5.0),
		]);
		assert_eq!(rows.len(), 2);
		assert_eq!(find(&rows, "DEU").sums["confirmed"], 42.0);
		assert_eq!(find(&rows, "FRA").sums["confirmed"], 5.0);
	}

	#[test]
	fn aggregate_drops_unresolved_rows() {
		let rows = aggregate(vec![
			rec("Diamond Princess", None, 700.0),
			rec("France", Some("FRA"), 5.0),
		]);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].code, "FRA");
	}

	#[test]
	fn aggregate_sums_multiple_metrics() {
		let rows = aggregate(vec![
			rec("Germany", Some("DEU"), 10.0).with_metric("deaths", 1.0),
			rec("Germany", Some("DEU"), 2.0).with_metric("deaths", 3.0),
		]);
		let row = find(&rows, "DEU");
		assert_eq!(row.sums["confirmed"], 12.0);
		assert_eq!(row.sums["deaths"], 4.0);
	}

	#[test]
	fn backfill_is_complete_and_length_preserving() {
		let aggregated = aggregate(vec![rec("Korea, South", Some("KOR"), 100.0)]);
		let known = known(&["KOR", "USA", "FRA"]);
		let rows = backfill(aggregated, &known, "confirmed");
		assert_eq!(rows.len(), 3);
		for code in known.iter() {
			assert_eq!(rows.iter().filter(|r| &r.code == code).count(), 1);
		}
		assert_eq!(find(&rows, "KOR").sums["confirmed"], 100.0);
		assert_eq!(find(&rows, "USA").sums["confirmed"], BACKFILL_SENTINEL);
		assert_eq!(find(&rows, "FRA").sums["confirmed"], BACKFILL_SENTINEL);
	}

	#[test]
	fn backfill_raises_reported_zeros() {
		let aggregated = aggregate(vec![
			rec("Germany", Some("DEU"), 0.0),
			rec("France", Some("FRA"), 5.0),
		]);
		let rows = backfill(aggregated, &known(&["DEU", "FRA"]), "confirmed");
		for row in rows.iter() {
			assert!(row.sums["confirmed"] >= BACKFILL_SENTINEL, "{:?} kept a true zero", row.code);
		}
		assert_eq!(find(&rows, "FRA").sums["confirmed"], 5.0);
	}

	#[test]
	fn backfill_never_decreases_row_count() {
		let aggregated = aggregate(vec![rec("Germany", Some("DEU"), 7.0)]);
		let known = known(&["FRA", "ITA"]);
		let n_aggregated = aggregated.len();
		let rows = backfill(aggregated, &known, "confirmed");
		// DEU is not in the known set but survives; the two missing knowns
		// are appended
		assert_eq!(rows.len(), n_aggregated + 2);
	}
}
