mod catalog;
mod fetch;
mod resolver;

pub use catalog::{Catalog, GENERIC_IMAGE_URL, GENERIC_LOCAL_BACKGROUND, ImageReference};
pub use fetch::{
    DEFAULT_IMAGE_COUNT, FETCH_TIMEOUT, FetchAttempt, HttpImageFetcher, ImageFetcher,
    OfflineFetcher, collect_destination_images, fetch_attempts, variation_url,
};
pub use resolver::{
    DestinationImage, DestinationImageResolver, ResolutionTier, normalize_destination,
};
