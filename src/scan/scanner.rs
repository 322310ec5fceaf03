//! File-level entry point: pick a token source, tokenize, dispatch.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::{CancelToken, FileReport, FileScan, ScanError, ScanSummary};
use crate::ruleset::Ruleset;
use crate::tokenizer::{TokenSource, TokenSources, TokenizerId};

/// Scans files with one loaded ruleset.
pub struct Scanner<'r> {
    ruleset: &'r Ruleset,
    sources: TokenSources,
    cancel: CancelToken,
}

impl<'r> Scanner<'r> {
    /// Scanner using the token sources compiled into this build.
    pub fn new(ruleset: &'r Ruleset) -> Self {
        Self::with_sources(ruleset, TokenSources::builtin())
    }

    pub fn with_sources(ruleset: &'r Ruleset, sources: TokenSources) -> Self {
        Self {
            ruleset,
            sources,
            cancel: CancelToken::new(),
        }
    }

    /// Share an existing cancellation flag with this scanner.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn ruleset(&self) -> &Ruleset {
        self.ruleset
    }

    /// Scan a file on disk, choosing the tokenizer from its extension.
    pub fn scan_file(&self, path: &Path) -> Result<FileReport, ScanError> {
        let file = path.to_string_lossy().to_string();
        let source = self
            .sources
            .for_path(path)
            .ok_or_else(|| ScanError::UnsupportedFile(file.clone()))?;
        let bytes = fs::read(path).map_err(|source| ScanError::Io {
            path: file.clone(),
            source,
        })?;

        self.scan_with(&file, source, &bytes)
    }

    /// Scan in-memory content with a named tokenizer.
    pub fn scan_source(
        &self,
        file: &str,
        tokenizer: &str,
        content: &[u8],
    ) -> Result<FileReport, ScanError> {
        let source = self
            .sources
            .for_tokenizer(tokenizer)
            .ok_or_else(|| ScanError::UnknownTokenizer(tokenizer.to_string()))?;

        self.scan_with(file, source, content)
    }

    /// Scan several files. Files that cannot be scanned are recorded as skipped.
    pub fn scan_files<P: AsRef<Path>>(&self, paths: &[P]) -> ScanSummary {
        let mut summary = ScanSummary::new();

        for path in paths {
            if self.cancel.is_cancelled() {
                let done = summary.files.len() + summary.skipped.len();
                debug!("scan cancelled, {} files left", paths.len() - done);
                break;
            }

            let path = path.as_ref();
            match self.scan_file(path) {
                Ok(report) => summary.add(report),
                Err(err) => {
                    warn!(file = %path.display(), "skipping file: {}", err);
                    summary
                        .skipped
                        .push((path.to_string_lossy().to_string(), err.to_string()));
                }
            }
        }

        summary
    }

    fn scan_with(
        &self,
        file: &str,
        source: &dyn TokenSource,
        content: &[u8],
    ) -> Result<FileReport, ScanError> {
        let tokens = source.tokenize(content).map_err(|source| ScanError::Tokenize {
            path: file.to_string(),
            source,
        })?;

        let mut scan = FileScan::new(self.ruleset, file, TokenizerId::new(source.tokenizer()));
        scan.run(content, tokens, &self.cancel)
    }
}
