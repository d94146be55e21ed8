use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Extension of the binary model cached next to each corpus.
pub(crate) const CACHE_EXTENSION: &str = "bin";

/// Where a corpus file comes from and where its model is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CorpusPaths {
	/// File stem of the corpus, e.g. `tweets` for `data/tweets.txt`.
	pub name: String,
	/// Cache sitting next to the corpus, e.g. `data/tweets.bin`.
	pub cache: PathBuf,
}

impl CorpusPaths {
	pub(crate) fn of<P: AsRef<Path>>(corpus: P) -> io::Result<Self> {
		let corpus = corpus.as_ref();
		let name = corpus
			.file_stem()
			.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"))?
			.to_string_lossy()
			.into_owned();

		Ok(Self {
			name,
			cache: corpus.with_extension(CACHE_EXTENSION),
		})
	}
}

/// All lines of a corpus file, `\n` or `\r\n` terminated.
pub(crate) fn read_corpus_lines<P: AsRef<Path>>(corpus: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(corpus)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// `"."` and `"./"` resolve to the current working directory,
/// anything else is returned as-is (not canonicalized).
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists the files of `dir` carrying `extension`, sorted by name.
///
/// Returns file names only (no paths). Subdirectories are ignored.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn corpus_paths_name_and_cache() {
		let paths = CorpusPaths::of("data/tweets.txt").unwrap();
		assert_eq!(paths.name, "tweets");
		assert_eq!(paths.cache, PathBuf::from("data/tweets.bin"));

		let bare = CorpusPaths::of("tweets.txt").unwrap();
		assert_eq!(bare.cache, PathBuf::from("tweets.bin"));
	}

	#[test]
	fn corpus_paths_need_a_filename() {
		assert!(CorpusPaths::of("..").is_err());
	}

	#[test]
	fn list_files_filters_and_sorts() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "x").unwrap();
		fs::write(dir.path().join("a.txt"), "x").unwrap();
		fs::write(dir.path().join("a.bin"), "x").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		let files = list_files(dir.path(), "txt").unwrap();
		assert_eq!(files, vec!["a.txt".to_owned(), "b.txt".to_owned()]);
	}

	#[test]
	fn corpus_lines_accept_both_line_endings() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "one two three\r\nfour five six\n").unwrap();

		let lines = read_corpus_lines(&path).unwrap();
		assert_eq!(lines, vec!["one two three", "four five six"]);
	}
}
