use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontResolveError {
    #[error("failed to create font cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write font to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download interrupted for {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{url} did not return a TrueType/OpenType font")]
    NotAFont { url: String },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve a label font by file name, checking local copies before downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Bundled directory, if given
/// 3. Download from `url` into the cache
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, FontResolveError> {
    resolve_in(&font_cache_dir()?, name, url, bundled_dir, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, FontResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Using cached font {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(dir) = bundled_dir {
        let bundled_path = dir.join(name);
        if bundled_path.exists() {
            log::debug!("Using bundled font {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    fs::create_dir_all(cache_dir).map_err(FontResolveError::CacheDir)?;
    log::info!("Downloading label font from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific font cache directory.
///
/// - macOS: `~/Library/Caches/faceframe/fonts/`
/// - Linux: `$XDG_CACHE_HOME/faceframe/fonts/` or `~/.cache/faceframe/fonts/`
/// - Windows: `%LOCALAPPDATA%/faceframe/fonts/`
pub fn font_cache_dir() -> Result<PathBuf, FontResolveError> {
    dirs::cache_dir()
        .map(|d| d.join("faceframe").join("fonts"))
        .ok_or(FontResolveError::NoCacheDir)
}

/// Leading tags of TrueType, OpenType/CFF, Apple TrueType and collection files.
const FONT_SIGNATURES: [[u8; 4]; 4] = [[0, 1, 0, 0], *b"OTTO", *b"true", *b"ttcf"];

fn is_font_signature(head: &[u8]) -> bool {
    head.len() >= 4 && FONT_SIGNATURES.iter().any(|sig| head[..4] == sig[..])
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), FontResolveError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| FontResolveError::Download {
            url: url.to_string(),
            source,
        })?;
    let total = response.content_length().unwrap_or(0);

    // The cache only ever sees a complete, plausible font file.
    let temp_path = dest.with_extension("part");
    let outcome = copy_font(&mut response, &temp_path, url, total, progress.as_deref())
        .and_then(|()| {
            fs::rename(&temp_path, dest).map_err(|source| FontResolveError::Write {
                path: dest.to_path_buf(),
                source,
            })
        });
    if outcome.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    outcome
}

/// Streams `reader` into `path`, reporting progress per buffer. Fails if
/// the stream does not start with an sfnt signature (e.g. an HTML error
/// page served with status 200).
fn copy_font(
    reader: &mut impl Read,
    path: &Path,
    url: &str,
    total: u64,
    progress: Option<&(dyn Fn(u64, u64) + Send)>,
) -> Result<(), FontResolveError> {
    let write_error = |source| FontResolveError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(path).map_err(write_error)?;

    let mut buf = vec![0u8; 64 * 1024];
    let mut head = Vec::with_capacity(4);
    let mut written: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FontResolveError::Transfer {
                    url: url.to_string(),
                    source,
                })
            }
        };
        if head.len() < 4 {
            let take = n.min(4 - head.len());
            head.extend_from_slice(&buf[..take]);
        }
        file.write_all(&buf[..n]).map_err(write_error)?;
        written += n as u64;
        if let Some(cb) = progress {
            cb(written, total);
        }
    }
    file.flush().map_err(write_error)?;

    if !is_font_signature(&head) {
        return Err(FontResolveError::NotAFont {
            url: url.to_string(),
        });
    }
    Ok(())
}
