// Image sources: where stamp images come from.
// Loads run once, at startup, off the UI thread. Failures are logged, never shown.

use crate::error::Error;
use crate::types::ImageResource;
use clap::ValueEnum;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a load does when only some images come through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LoadPolicy {
    /// Keep whatever loaded
    Partial,
    /// Any failure discards the whole list
    Strict,
}

pub trait ImageSource: Send {
    /// Produce every image this source knows about. Single-shot.
    fn load(&self) -> Result<Vec<ImageResource>, Error>;

    fn describe(&self) -> String;
}

/// Run `source.load()` and turn any failure into an empty list.
pub fn load_or_degrade(source: &dyn ImageSource) -> Vec<ImageResource> {
    match source.load() {
        Ok(list) => {
            info!(source = %source.describe(), images = list.len(), "images loaded");
            list
        }
        Err(e) => {
            error!(source = %source.describe(), "Error preloading images: {e}");
            Vec::new()
        }
    }
}

/// Scale down so the longer edge is at most `max_edge`. Smaller images are left alone.
pub fn fit_to(img: DynamicImage, max_edge: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let longest = w.max(h);
    if max_edge == 0 || longest <= max_edge {
        return img.into_rgba8();
    }
    let scale = max_edge as f32 / longest as f32;
    let nw = ((w as f32 * scale).round() as u32).max(1);
    let nh = ((h as f32 * scale).round() as u32).max(1);
    image::imageops::resize(&img.into_rgba8(), nw, nh, FilterType::Triangle)
}

/// Apply the load policy to per-image outcomes, logging each failure.
fn collect(outcomes: Vec<Result<ImageResource, Error>>, policy: LoadPolicy) -> Result<Vec<ImageResource>, Error> {
    let total = outcomes.len();
    let mut loaded = Vec::with_capacity(total);
    let mut failed = 0;
    for outcome in outcomes {
        match outcome {
            Ok(res) => loaded.push(res),
            Err(e) => {
                warn!("{e}");
                failed += 1;
            }
        }
    }
    if failed > 0 && policy == LoadPolicy::Strict {
        return Err(Error::IncompleteLoad { failed, total });
    }
    if failed > 0 {
        warn!(failed, total, "continuing with a partial image list");
    }
    Ok(loaded)
}

/* ---------------------------------- local ---------------------------------- */

/// Fixed list of files inside one directory.
pub struct LocalSource {
    dir: PathBuf,
    filenames: Vec<String>,
    max_edge: u32,
    policy: LoadPolicy,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>, filenames: &[&str], max_edge: u32, policy: LoadPolicy) -> Self {
        Self {
            dir: dir.into(),
            filenames: filenames.iter().map(|s| s.to_string()).collect(),
            max_edge,
            policy,
        }
    }

    fn load_one(&self, filename: &str) -> Result<ImageResource, Error> {
        let path = self.dir.join(filename);
        let img = image::open(&path).map_err(|source| Error::ImageLoad {
            name: path.display().to_string(),
            source,
        })?;
        debug!(file = filename, w = img.width(), h = img.height(), "decoded stamp");
        Ok(ImageResource::new(filename, fit_to(img, self.max_edge)))
    }
}

impl ImageSource for LocalSource {
    fn load(&self) -> Result<Vec<ImageResource>, Error> {
        let outcomes = self.filenames.iter().map(|f| self.load_one(f)).collect();
        collect(outcomes, self.policy)
    }

    fn describe(&self) -> String {
        format!("local:{}", self.dir.display())
    }
}

/* ---------------------------------- remote --------------------------------- */

/// One entry of the remote listing. Only the download link matters to us.
#[derive(Debug, Deserialize)]
pub struct ListingEntry {
    pub id: Option<String>,
    pub download_url: String,
}

/// Parse a listing body and keep at most `limit` entries.
pub fn parse_listing(body: &[u8], limit: usize) -> Result<Vec<ListingEntry>, Error> {
    let mut entries: Vec<ListingEntry> = serde_json::from_slice(body)?;
    entries.truncate(limit);
    Ok(entries)
}

/// Photos from a paging image-listing API.
pub struct RemoteSource {
    listing_url: String,
    limit: usize,
    max_edge: u32,
    policy: LoadPolicy,
    client: reqwest::blocking::Client,
}

impl RemoteSource {
    pub fn new(listing_url: impl Into<String>, limit: usize, max_edge: u32, policy: LoadPolicy) -> Result<Self, Error> {
        let listing_url = listing_url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| Error::Fetch { url: listing_url.clone(), source })?;
        Ok(Self { listing_url, limit, max_edge, policy, client })
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, Error> {
        self.fetch(url, self.client.get(url))
    }

    /// The listing pages by `limit`, so ask for exactly as many entries as we keep.
    fn get_listing(&self) -> Result<Vec<u8>, Error> {
        let request = self.client.get(&self.listing_url).query(&[("limit", self.limit)]);
        self.fetch(&self.listing_url, request)
    }

    fn fetch(&self, url: &str, request: reqwest::blocking::RequestBuilder) -> Result<Vec<u8>, Error> {
        let fetch = |source: reqwest::Error| Error::Fetch { url: url.to_string(), source };
        let bytes = request
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(fetch)?;
        Ok(bytes.to_vec())
    }

    fn load_one(&self, entry: &ListingEntry) -> Result<ImageResource, Error> {
        let name = entry.id.clone().unwrap_or_else(|| entry.download_url.clone());
        let bytes = self.get(&entry.download_url)?;
        let img = image::load_from_memory(&bytes).map_err(|source| Error::ImageLoad {
            name: name.clone(),
            source,
        })?;
        Ok(ImageResource::new(name, fit_to(img, self.max_edge)))
    }
}

impl ImageSource for RemoteSource {
    fn load(&self) -> Result<Vec<ImageResource>, Error> {
        let body = self.get_listing()?;
        let entries = parse_listing(&body, self.limit)?;
        info!(entries = entries.len(), "listing fetched");
        let outcomes = entries.iter().map(|e| self.load_one(e)).collect();
        collect(outcomes, self.policy)
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.listing_url)
    }
}
