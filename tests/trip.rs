mod common;

use chrono::NaiveDate;
use common::date;
use itinerary_pdf::generate::{GeneratorConfig, SYSTEM_PROMPT, build_user_prompt};
use itinerary_pdf::trip::{DEFAULT_SOURCE_CITY, TripRequest, day_count, display_date};
use itinerary_pdf::{Error, export_file_name};

fn request(start: NaiveDate, end: NaiveDate) -> TripRequest {
    TripRequest {
        source_city: " Dallas, Texas ".into(),
        destination: " Lisbon ".into(),
        start_date: start,
        end_date: end,
        interests: String::new(),
        guardrails: String::new(),
    }
}

#[test]
fn valid_request_yields_trimmed_meta() {
    let meta = request(date(2025, 6, 1), date(2025, 6, 5)).validate().unwrap();
    assert_eq!(meta.source_city, "Dallas, Texas");
    assert_eq!(meta.destination, "Lisbon");
    assert_eq!(meta.day_count, 5);
}

#[test]
fn same_day_trip_is_one_day() {
    let meta = request(date(2025, 6, 1), date(2025, 6, 1)).validate().unwrap();
    assert_eq!(meta.day_count, 1);
}

#[test]
fn reversed_dates_are_rejected() {
    let err = request(date(2025, 6, 5), date(2025, 6, 1))
        .validate()
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Please select valid travel dates (end date must be on or after start date)."
    );
    assert_eq!(day_count(date(2025, 6, 5), date(2025, 6, 1)), None);
}

#[test]
fn blank_cities_are_rejected() {
    let mut req = request(date(2025, 6, 1), date(2025, 6, 2));
    req.source_city = "   ".into();
    assert_eq!(
        req.validate().unwrap_err().to_string(),
        "Please enter your source city."
    );

    let mut req = request(date(2025, 6, 1), date(2025, 6, 2));
    req.destination = String::new();
    assert_eq!(
        req.validate().unwrap_err().to_string(),
        "Please enter a destination."
    );
}

#[test]
fn default_request_spans_four_days_from_dallas() {
    let req = TripRequest::default();
    assert_eq!(req.source_city, DEFAULT_SOURCE_CITY);
    assert_eq!(day_count(req.start_date, req.end_date), Some(4));
}

#[test]
fn dates_display_long_form() {
    assert_eq!(display_date(date(2025, 3, 9)), "March 09, 2025");
    assert_eq!(
        request(date(2025, 3, 9), date(2025, 3, 12)).date_range(),
        "March 09, 2025 to March 12, 2025"
    );
}

#[test]
fn user_prompt_carries_trip_details_and_defaults() {
    let req = request(date(2025, 6, 1), date(2025, 6, 3));
    let prompt = build_user_prompt(&req, 3);
    assert!(prompt.contains("Traveling FROM: Dallas, Texas"));
    assert!(prompt.contains("Traveling TO: Lisbon"));
    assert!(prompt.contains("Number of days: 3"));
    assert!(prompt.contains("Special interests: General sightseeing, culture, and local experiences"));
    assert!(prompt.contains("Guardrails/Restrictions: None"));
    assert!(prompt.contains("**Travel Dates:** June 01, 2025 to June 03, 2025"));

    let mut req = req;
    req.interests = "food, fado".into();
    req.guardrails = "no early mornings".into();
    let prompt = build_user_prompt(&req, 3);
    assert!(prompt.contains("Special interests: food, fado"));
    assert!(prompt.contains("Guardrails/Restrictions: no early mornings"));
}

#[test]
fn system_prompt_asks_for_day_headers_and_airlines() {
    assert!(SYSTEM_PROMPT.contains("## for day headers"));
    assert!(SYSTEM_PROMPT.contains("Recommended Airlines"));
}

#[test]
fn missing_api_key_is_a_config_error() {
    for key in [None, Some(String::new()), Some("  ".to_string())] {
        let err = GeneratorConfig::new(key).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
    let config = GeneratorConfig::new(Some("sk-test".into())).unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.base_url, "https://api.openai.com/v1");
}

#[test]
fn export_file_name_is_sanitized_and_timestamped() {
    let at = date(2025, 1, 2).and_hms_opt(3, 4, 5).unwrap();
    assert_eq!(
        export_file_name("New York", at),
        "travel_plan_New_York_20250102_030405.pdf"
    );
    assert_eq!(
        export_file_name(" Rio de Janeiro / Brazil ", at),
        "travel_plan_Rio_de_Janeiro___Brazil_20250102_030405.pdf"
    );
}
