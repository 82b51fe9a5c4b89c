mod common;

use common::{MockFetcher, ScriptedGenerator, date};
use itinerary_pdf::images::{GENERIC_IMAGE_URL, ImageReference, ResolutionTier};
use itinerary_pdf::session::TravelSession;
use itinerary_pdf::trip::TripRequest;
use itinerary_pdf::Error;

fn paris_request() -> TripRequest {
    TripRequest {
        source_city: "Dallas, Texas".into(),
        destination: "Paris".into(),
        start_date: date(2025, 3, 10),
        end_date: date(2025, 3, 12),
        interests: "museums".into(),
        guardrails: String::new(),
    }
}

#[test]
fn submit_stores_the_generated_itinerary() {
    let generator = ScriptedGenerator::new(vec![Ok(common::SAMPLE_ITINERARY.to_string())]);
    let mut session = TravelSession::new(&generator);

    let doc = session.submit(&paris_request()).unwrap();
    assert_eq!(doc.raw_text, common::SAMPLE_ITINERARY);
    assert_eq!(doc.trip_meta.destination, "Paris");
    assert_eq!(doc.trip_meta.day_count, 3);

    let prompts = generator.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].1.contains("Special interests: museums"));
}

#[test]
fn invalid_request_never_reaches_the_generator() {
    let generator = ScriptedGenerator::new(vec![Ok("unused".into())]);
    let mut session = TravelSession::new(&generator);

    let mut request = paris_request();
    request.end_date = date(2025, 3, 1);
    assert!(matches!(
        session.submit(&request),
        Err(Error::Validation(_))
    ));
    assert!(generator.prompts.borrow().is_empty());
    assert!(session.itinerary().is_none());
}

#[test]
fn failed_generation_keeps_the_previous_itinerary() {
    let generator = ScriptedGenerator::new(vec![
        Ok("## Day 1\n- First plan".into()),
        Err(Error::Generation("rate limited".into())),
    ]);
    let mut session = TravelSession::new(&generator);
    session.submit(&paris_request()).unwrap();

    let mut tokyo = paris_request();
    tokyo.destination = "Tokyo".into();
    let err = session.submit(&tokyo).unwrap_err();
    assert_eq!(err.to_string(), "Error generating plan: rate limited");

    let kept = session.itinerary().unwrap();
    assert_eq!(kept.raw_text, "## Day 1\n- First plan");
    assert_eq!(kept.trip_meta.destination, "Paris");
}

#[test]
fn successful_generation_replaces_the_itinerary() {
    let generator = ScriptedGenerator::new(vec![Ok("first".into()), Ok("second".into())]);
    let mut session = TravelSession::new(&generator);
    session.submit(&paris_request()).unwrap();
    session.submit(&paris_request()).unwrap();
    assert_eq!(session.itinerary().unwrap().raw_text, "second");
}

#[test]
fn export_requires_an_itinerary() {
    let generator = ScriptedGenerator::new(Vec::new());
    let mut session = TravelSession::new(&generator);
    let fetcher = MockFetcher::serving_all();
    assert!(matches!(
        session.export(&fetcher),
        Err(Error::Validation(_))
    ));
    assert!(fetcher.requests.borrow().is_empty());
}

#[test]
fn export_builds_a_watermarked_pdf() {
    let generator = ScriptedGenerator::new(vec![Ok(common::SAMPLE_ITINERARY.to_string())]);
    let mut session = TravelSession::new(&generator);
    session.submit(&paris_request()).unwrap();

    let fetcher = MockFetcher::serving_all();
    let exported = session.export(&fetcher).unwrap();
    assert!(exported.file_name.starts_with("travel_plan_Paris_"));
    assert!(exported.bytes.starts_with(b"%PDF"));
    assert_eq!(fetcher.requests.borrow().len(), 3);

    // The itinerary survives export and can be exported again.
    assert!(session.itinerary().is_some());
    session.set_image_count(1);
    let fetcher = MockFetcher::serving_all();
    session.export(&fetcher).unwrap();
    assert_eq!(fetcher.requests.borrow().len(), 1);
    assert_eq!(session.resolver().catalog_scans(), 1);
}

#[test]
fn export_succeeds_without_any_images() {
    let generator = ScriptedGenerator::new(vec![Ok(common::SAMPLE_ITINERARY.to_string())]);
    let mut session = TravelSession::new(&generator);
    session.submit(&paris_request()).unwrap();

    let exported = session.export(&MockFetcher::default()).unwrap();
    assert!(exported.bytes.starts_with(b"%PDF"));
}

#[test]
fn background_follows_the_current_destination() {
    let generator = ScriptedGenerator::new(vec![Ok("plan".into())]);
    let mut session = TravelSession::new(&generator);

    let generic = session.background_image();
    assert_eq!(generic.tier, ResolutionTier::Generic);
    assert_eq!(
        generic.reference,
        ImageReference::Url(GENERIC_IMAGE_URL.to_string())
    );

    session.submit(&paris_request()).unwrap();
    assert_eq!(session.background_image().tier, ResolutionTier::Exact);

    session.reset();
    assert!(session.itinerary().is_none());
    assert_eq!(session.background_image().tier, ResolutionTier::Generic);
}
