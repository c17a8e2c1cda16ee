//! Scryfall bulk-data client
//!
//! Uses blocking reqwest: the tool runs one step at a time, so every request
//! simply holds the calling thread until it completes.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use mtg_common::{BulkData, BulkDataList, BulkDataType};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Scryfall API base URL
pub const SCRYFALL_URL: &str = "https://api.scryfall.com";

const USER_AGENT: &str = "D2D-Automations-ScryfallPrices/1.0";
const ACCEPT_ANY: &str = "*/*";

/// Download buffer size. Bulk files run to hundreds of megabytes.
pub const CHUNK_SIZE: usize = 8192;

/// Bytes between progress log lines
pub const PROGRESS_INTERVAL: u64 = 16 * 1024 * 1024;

/// Client for the Scryfall bulk-data registry and its download host
pub struct ScryfallClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ScryfallClient {
    /// Client against the public Scryfall API
    pub fn new() -> Result<Self> {
        Self::with_base_url(SCRYFALL_URL)
    }

    /// Client against another registry base URL (mirrors, mock servers)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full `/bulk-data` listing
    pub fn bulk_data(&self) -> Result<BulkDataList> {
        let url = format!("{}/bulk-data", self.base_url);
        log::debug!("Fetching bulk data listing: {}", url);

        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            log::error!(
                "Failed to retrieve bulk data listing. HTTP Status: {}",
                response.status()
            );
            return Err(Error::HttpStatus(response.status()));
        }

        let list: BulkDataList = response.json()?;
        log::debug!("Registry lists {} bulk datasets", list.data.len());
        Ok(list)
    }

    /// Resolve a dataset type to its current descriptor.
    ///
    /// `Ok(None)` means the registry answered but does not offer `wanted`.
    pub fn locate(&self, wanted: BulkDataType) -> Result<Option<BulkData>> {
        let found = self.bulk_data()?.find(wanted);
        match &found {
            Some(entry) => log::debug!("Located {}: {}", wanted, entry.download_uri),
            None => log::warn!("Bulk data type {} not listed by registry", wanted),
        }
        Ok(found)
    }

    /// Download `uri` to `destination`.
    ///
    /// With `check_cache` set, an existing file at `destination` is returned
    /// as-is without touching the network. Only existence is checked; a stale
    /// or truncated file from an earlier run counts as a hit.
    pub fn fetch(&self, uri: &str, destination: &Path, check_cache: bool) -> Result<PathBuf> {
        if check_cache && destination.exists() {
            log::info!("Cache hit, using existing file: {}", destination.display());
            return Ok(destination.to_path_buf());
        }

        log::info!("Download started: {} -> {}", uri, destination.display());
        let mut response = self.client.get(uri).send()?;

        if !response.status().is_success() {
            log::error!(
                "Failed to retrieve the file. HTTP Status: {}",
                response.status()
            );
            return Err(Error::HttpStatus(response.status()));
        }

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        let mut file = BufWriter::new(File::create(destination)?);
        let downloaded = copy_chunks(&mut response, &mut file)?;
        file.flush()?;

        log::info!(
            "Download completed: {} ({} bytes)",
            destination.display(),
            downloaded
        );
        Ok(destination.to_path_buf())
    }

    /// Locate `wanted` and fetch it to `destination`.
    ///
    /// A cache hit skips the registry query as well as the download.
    pub fn download(
        &self,
        wanted: BulkDataType,
        destination: &Path,
        check_cache: bool,
    ) -> Result<PathBuf> {
        if check_cache && destination.exists() {
            log::info!(
                "Cache hit for {}, using existing file: {}",
                wanted,
                destination.display()
            );
            return Ok(destination.to_path_buf());
        }

        let descriptor = self
            .locate(wanted)?
            .ok_or(Error::BulkDataNotFound(wanted))?;

        log::info!(
            "Downloading database {} (updated: {}, size: {} bytes) from {}",
            wanted,
            descriptor.updated_at.as_deref().unwrap_or("unknown"),
            descriptor
                .size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            descriptor.download_uri
        );

        self.fetch(&descriptor.download_uri, destination, false)
    }
}

/// Copy `reader` into `writer` in [`CHUNK_SIZE`] pieces, returning the byte
/// count. Progress is logged at debug level every [`PROGRESS_INTERVAL`] bytes.
pub fn copy_chunks<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> std::io::Result<u64> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    let mut next_report = PROGRESS_INTERVAL;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        copied += read as u64;

        if copied >= next_report {
            log::debug!("Downloaded {} MiB", copied / (1024 * 1024));
            next_report += PROGRESS_INTERVAL;
        }
    }

    Ok(copied)
}

/// Local path for a dataset downloaded on `date`.
///
/// Day granularity: every run on the same day resolves to the same file.
pub fn dataset_path(dir: &Path, kind: BulkDataType, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}_{}_scryfall.json", date.format("%Y-%m-%d"), kind))
}

/// [`dataset_path`] for today's local date
pub fn todays_dataset_path(dir: &Path, kind: BulkDataType) -> PathBuf {
    dataset_path(dir, kind, chrono::Local::now().date_naive())
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
