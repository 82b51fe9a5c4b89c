use std::time::Duration;

use reqwest::blocking::Client;

use super::catalog::ImageReference;
use super::resolver::DestinationImageResolver;
use crate::error::Error;
use crate::model::WatermarkImage;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_IMAGE_COUNT: usize = 3;

const VARIATION_QUERIES: [&str; 3] = [
    "landmark architecture",
    "skyline city view",
    "tourist attraction",
];

/// Byte fetch for a resolved image reference.
pub trait ImageFetcher {
    fn fetch(&self, reference: &ImageReference) -> Result<Vec<u8>, Error>;
}

fn read_local(path: &std::path::Path) -> Result<Vec<u8>, Error> {
    Ok(std::fs::read(path)?)
}

pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("itinerary-pdf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, reference: &ImageReference) -> Result<Vec<u8>, Error> {
        match reference {
            ImageReference::Url(url) => {
                let response = self.client.get(url).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Image(format!("HTTP {status} from {url}")));
                }
                Ok(response.bytes()?.to_vec())
            }
            ImageReference::LocalPath(path) => read_local(path),
        }
    }
}

/// Reads local files only; every URL fails without touching the network.
pub struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    fn fetch(&self, reference: &ImageReference) -> Result<Vec<u8>, Error> {
        match reference {
            ImageReference::Url(url) => Err(Error::Image(format!("offline, not fetching {url}"))),
            ImageReference::LocalPath(path) => read_local(path),
        }
    }
}

/// Search URL for an extra picture of `destination`; `sig` keeps the
/// variations from collapsing onto the same result.
pub fn variation_url(destination: &str, query: &str, sig: usize) -> String {
    format!(
        "https://source.unsplash.com/800x600/?{}&sig={sig}",
        urlencoding::encode(&format!("{destination} {query}"))
    )
}

pub struct FetchAttempt {
    pub label: String,
    pub reference: ImageReference,
    pub outcome: Result<WatermarkImage, Error>,
}

fn attempt(fetcher: &dyn ImageFetcher, label: String, reference: ImageReference) -> FetchAttempt {
    let outcome = fetcher
        .fetch(&reference)
        .and_then(|data| {
            if data.is_empty() {
                Err(Error::Image("empty response".into()))
            } else {
                Ok(data)
            }
        })
        .map(|data| WatermarkImage {
            data,
            source: reference.to_string(),
        });
    match &outcome {
        Ok(img) => log::info!("\u{2713} {label} image loaded ({} bytes)", img.data.len()),
        Err(e) => log::warn!("\u{2717} {label} image failed: {e}"),
    }
    FetchAttempt {
        label,
        reference,
        outcome,
    }
}

/// Try the catalog image first, then query variations until `count` images
/// are held. Every attempt is reported, successful or not.
pub fn fetch_attempts(
    resolver: &mut DestinationImageResolver,
    fetcher: &dyn ImageFetcher,
    destination: &str,
    count: usize,
) -> Vec<FetchAttempt> {
    let mut attempts = Vec::new();
    if count == 0 {
        return attempts;
    }

    log::info!("Fetching images for {destination}...");
    let primary = resolver.resolve(destination);
    attempts.push(attempt(fetcher, "Primary".to_string(), primary.reference));

    let destination = destination.trim();
    if destination.is_empty() {
        return attempts;
    }
    for (i, query) in VARIATION_QUERIES.iter().enumerate() {
        let loaded = attempts.iter().filter(|a| a.outcome.is_ok()).count();
        if loaded >= count {
            break;
        }
        let url = variation_url(destination, query, i + 1);
        attempts.push(attempt(
            fetcher,
            format!("Variation '{query}'"),
            ImageReference::Url(url),
        ));
    }
    attempts
}

/// Watermark images for an export. Failures only shrink the result; an empty
/// list is a valid outcome.
pub fn collect_destination_images(
    resolver: &mut DestinationImageResolver,
    fetcher: &dyn ImageFetcher,
    destination: &str,
    count: usize,
) -> Vec<WatermarkImage> {
    let t0 = std::time::Instant::now();
    let images: Vec<WatermarkImage> = fetch_attempts(resolver, fetcher, destination, count)
        .into_iter()
        .filter_map(|a| a.outcome.ok())
        .collect();
    if images.is_empty() {
        log::info!("No images loaded for watermarks");
    } else {
        log::info!("Total images loaded: {}", images.len());
    }
    log::info!(
        "Timing: fetch={:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );
    images
}
