use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "data";
pub const DEFAULT_OUTPUT_FILE: &str = "all_books_merged.txt";
pub const DEFAULT_SUFFIX: &str = "txt";
pub const DEFAULT_TARGET_BYTES: u64 = 300 * 1024 * 1024;

/// Everything the pipeline needs to know about where it reads and writes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// Extension without the dot, matched case-sensitively
    pub suffix: String,
    /// Advisory size goal, only used in the final report
    pub target_size_bytes: u64,
    /// Turn verification mismatches into a failed run
    pub strict: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::custom(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_FILE)
    }
}

impl MergeConfig {
    /// Custom configuration for tests
    pub fn custom(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            target_size_bytes: DEFAULT_TARGET_BYTES,
            strict: false,
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.trim_start_matches('.').to_string();
        self
    }

    pub fn with_target_size(mut self, bytes: u64) -> Self {
        self.target_size_bytes = bytes;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_fixed_paths() {
        let config = MergeConfig::default();
        assert_eq!(config.input_dir(), Path::new("data"));
        assert_eq!(config.output_path(), Path::new("all_books_merged.txt"));
        assert_eq!(config.suffix, "txt");
        assert_eq!(config.target_size_bytes, 300 * 1024 * 1024);
        assert!(!config.strict);
    }

    #[test]
    fn test_suffix_leading_dot_is_dropped() {
        let config = MergeConfig::default().with_suffix(".md");
        assert_eq!(config.suffix, "md");
    }

    #[test]
    fn test_builders_chain() {
        let config = MergeConfig::custom("in", "out.txt")
            .with_target_size(10)
            .with_strict(true);
        assert_eq!(config.target_size_bytes, 10);
        assert!(config.strict);
        assert_eq!(config.input_dir(), Path::new("in"));
    }
}
