use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a corpus file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Preserves line order (training order affects the model)
pub fn read_lines<P: AsRef<Path>>(filename: P) -> std::io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}
