#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;

use chrono::NaiveDate;
use itinerary_pdf::generate::TextGenerator;
use itinerary_pdf::images::{ImageFetcher, ImageReference};
use itinerary_pdf::{Error, TripMeta, WatermarkImage};

pub const SAMPLE_ITINERARY: &str = "\
**Travel Dates:** March 10, 2025 to March 12, 2025
**Expected Temperature:** 8-15\u{b0}C / 46-59\u{b0}F
**Weather:** Mild with occasional showers
**What to Wear:** Light layers and a waterproof jacket

## Day 1: Arrival in Paris
**Morning:**
- Check in at the hotel in Le Marais
- Coffee at **Caf\u{e9} de Flore**

**Afternoon:**
- Louvre Museum \u{2192} Tuileries Garden
- Seine river walk \u{1f6b6}

**Evening:**
- Dinner at Le Comptoir du Relais

## Day 2: Montmartre
**Morning:**
- Sacr\u{e9}-C\u{153}ur at sunrise

## \u{2708}\u{fe0f} Recommended Airlines
**Air France**
- Direct flights from Dallas, Texas
";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn trip_meta(source: &str, destination: &str) -> TripMeta {
    TripMeta {
        source_city: source.to_string(),
        destination: destination.to_string(),
        start_date: date(2025, 3, 10),
        end_date: date(2025, 3, 12),
        day_count: 3,
    }
}

/// A small opaque PNG, decodable by the renderer.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn watermark(source: &str) -> WatermarkImage {
    WatermarkImage {
        data: png_bytes(4, 3),
        source: source.to_string(),
    }
}

/// Enough day sections to overflow a single Letter page several times.
pub fn long_itinerary(days: usize) -> String {
    let mut text = String::from("**Travel Dates:** March 10, 2025 to March 30, 2025\n\n");
    for day in 1..=days {
        text.push_str(&format!("## Day {day}\n**Morning:**\n"));
        for i in 0..6 {
            text.push_str(&format!(
                "- Stop {i} on day {day}: a long walk through the old town with plenty of time for photos and coffee\n"
            ));
        }
        text.push_str("Plain paragraph describing the evening plans in some detail.\n\n");
    }
    text
}

/// Serves canned bytes per reference and records every request.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    pub requests: RefCell<Vec<String>>,
    pub succeed_all: bool,
}

impl MockFetcher {
    pub fn serving_all() -> Self {
        Self {
            succeed_all: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, reference: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(reference.to_string(), bytes);
        self
    }
}

impl ImageFetcher for MockFetcher {
    fn fetch(&self, reference: &ImageReference) -> Result<Vec<u8>, Error> {
        let key = reference.to_string();
        self.requests.borrow_mut().push(key.clone());
        if let Some(bytes) = self.responses.get(&key) {
            return Ok(bytes.clone());
        }
        if self.succeed_all {
            return Ok(png_bytes(4, 3));
        }
        Err(Error::Image(format!("no response for {key}")))
    }
}

/// Returns queued results in order and records the prompts it was given.
pub struct ScriptedGenerator {
    results: RefCell<Vec<Result<String, Error>>>,
    pub prompts: RefCell<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<Result<String, Error>>) -> Self {
        let mut results = results;
        results.reverse();
        Self {
            results: RefCell::new(results),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, Error> {
        self.prompts
            .borrow_mut()
            .push((system.to_string(), user.to_string()));
        self.results
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Err(Error::Generation("no scripted result left".into())))
    }
}

impl TextGenerator for &ScriptedGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, Error> {
        (**self).generate(system, user)
    }
}
