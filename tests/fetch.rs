mod common;

use std::fs;

use common::MockFetcher;
use itinerary_pdf::images::{
    DestinationImageResolver, GENERIC_IMAGE_URL, ImageFetcher, ImageReference, OfflineFetcher,
    collect_destination_images, fetch_attempts, variation_url,
};

#[test]
fn primary_catalog_image_comes_first() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::serving_all();
    let images = collect_destination_images(&mut resolver, &fetcher, "Paris", 3);

    assert_eq!(images.len(), 3);
    let paris = resolver.catalog().get("paris").unwrap().to_string();
    assert_eq!(images[0].source, paris);
    assert!(images[1].source.starts_with("https://source.unsplash.com/"));
}

#[test]
fn stops_once_enough_images_are_loaded() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::serving_all();
    let images = collect_destination_images(&mut resolver, &fetcher, "Paris", 1);

    assert_eq!(images.len(), 1);
    assert_eq!(fetcher.requests.borrow().len(), 1);
}

#[test]
fn failed_fetches_are_left_out() {
    let mut resolver = DestinationImageResolver::default();
    let second_variation = variation_url("Paris", "skyline city view", 2);
    let fetcher = MockFetcher::default().with(&second_variation, common::png_bytes(2, 2));

    let attempts = fetch_attempts(&mut resolver, &fetcher, "Paris", 3);
    assert_eq!(attempts.len(), 4);
    let loaded: Vec<&str> = attempts
        .iter()
        .filter(|a| a.outcome.is_ok())
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(loaded, vec!["Variation 'skyline city view'"]);

    let mut resolver = DestinationImageResolver::default();
    let images = collect_destination_images(&mut resolver, &fetcher, "Paris", 3);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].source, second_variation);
}

#[test]
fn all_failures_yield_no_images() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::default();
    let images = collect_destination_images(&mut resolver, &fetcher, "Paris", 3);
    assert!(images.is_empty());
}

#[test]
fn empty_payload_counts_as_failure() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::default().with(GENERIC_IMAGE_URL, Vec::new());
    let attempts = fetch_attempts(&mut resolver, &fetcher, "Atlantis", 1);
    assert!(attempts[0].outcome.is_err());
}

#[test]
fn blank_destination_only_tries_the_generic_image() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::serving_all();
    let attempts = fetch_attempts(&mut resolver, &fetcher, "  ", 3);

    assert_eq!(attempts.len(), 1);
    assert_eq!(
        attempts[0].reference,
        ImageReference::Url(GENERIC_IMAGE_URL.to_string())
    );
}

#[test]
fn zero_count_fetches_nothing() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::serving_all();
    assert!(fetch_attempts(&mut resolver, &fetcher, "Paris", 0).is_empty());
    assert!(fetcher.requests.borrow().is_empty());
}

#[test]
fn primary_lookup_goes_through_the_resolver_cache() {
    let mut resolver = DestinationImageResolver::default();
    let fetcher = MockFetcher::serving_all();
    collect_destination_images(&mut resolver, &fetcher, "Tokyo", 1);
    collect_destination_images(&mut resolver, &fetcher, "tokyo", 1);
    assert_eq!(resolver.catalog_scans(), 1);
}

#[test]
fn variation_urls_are_query_encoded() {
    assert_eq!(
        variation_url("New York", "tourist attraction", 3),
        "https://source.unsplash.com/800x600/?New%20York%20tourist%20attraction&sig=3"
    );
}

#[test]
fn offline_fetcher_reads_local_files_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bg.png");
    fs::write(&path, common::png_bytes(2, 2)).unwrap();

    let fetcher = OfflineFetcher;
    assert!(fetcher.fetch(&ImageReference::LocalPath(path)).is_ok());
    assert!(
        fetcher
            .fetch(&ImageReference::Url(GENERIC_IMAGE_URL.to_string()))
            .is_err()
    );
    assert!(
        fetcher
            .fetch(&ImageReference::LocalPath(dir.path().join("missing.jpg")))
            .is_err()
    );
}
