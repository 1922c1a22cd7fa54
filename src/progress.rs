use std::io;
use std::io::Write;
use std::time;


pub trait ProgressSink {
	fn update(&mut self, inow: usize);
	fn finish(self);
}

/// Row counter for streams of unknown length.
pub struct CountMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
	label: &'static str,
}

impl CountMeter {
	pub fn new(label: &'static str) -> Self {
		let now = time::Instant::now();
		print!("{}: {:12} [{:8.2}/s]\r", label, 0, 0.0);
		io::stdout().flush().ok();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
			label,
		}
	}
}

impl ProgressSink for CountMeter {
	fn update(&mut self, inow: usize) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = (inow - self.iprev) as f64 / dt;
		print!("{}: {:12} [{:8.2}/s]\r", self.label, inow, rate);
		io::stdout().flush().ok();
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(self) {
		let dt = (time::Instant::now() - self.t0).as_secs_f64();
		let rate = self.iprev as f64 / dt;
		println!("{}: {:12} [{:8.2}/s]", self.label, self.iprev, rate);
	}
}

/// Percentage meter for batches with a known number of steps, one step per
/// input file.
pub struct StepMeter {
	n: usize,
	label: &'static str,
}

impl StepMeter {
	pub fn new(label: &'static str, n: usize) -> Self {
		print!("{}: {:6.0}%\r", label, 0.0);
		io::stdout().flush().ok();
		Self{n, label}
	}
}

impl ProgressSink for StepMeter {
	fn update(&mut self, inow: usize) {
		let done = (inow as f64) / (self.n as f64);
		print!("{}: {:6.0}%\r", self.label, done * 100.0);
		io::stdout().flush().ok();
	}

	fn finish(self) {
		println!("{}: {:6.0}%", self.label, 100.0);
	}
}
