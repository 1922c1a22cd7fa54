use std::fs;
use std::io;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2;


/// Opens a data file, transparently decompressing `.gz`.
pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			Ok(Box::new(flate2::read::GzDecoder::new(BufReader::new(fs::File::open(path)?))))
		},
		_ => Ok(Box::new(BufReader::new(fs::File::open(path)?))),
	}
}

fn is_data_file(path: &Path) -> bool {
	let name = match path.file_name().and_then(|n| n.to_str()) {
		Some(name) => name,
		None => return false,
	};
	name.ends_with(".csv") || name.ends_with(".csv.gz")
}

/// All CSV files in a data directory, sorted by name for a stable batch
/// order.
pub fn find_csv_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
	let mut result = Vec::new();
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		if entry.file_type()?.is_file() && is_data_file(&path) {
			result.push(path);
		}
	}
	result.sort();
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn data_file_detection() {
		assert!(is_data_file(Path::new("/data/03-05-2020.csv")));
		assert!(is_data_file(Path::new("/data/03-05-2020.csv.gz")));
		assert!(!is_data_file(Path::new("/data/notes.txt")));
		assert!(!is_data_file(Path::new("/data/archive.tar.gz")));
	}
}
