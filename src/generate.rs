use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::trip::TripRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const DEFAULT_INTERESTS: &str = "General sightseeing, culture, and local experiences";

pub const SYSTEM_PROMPT: &str = "\
You are an expert travel planner with deep knowledge of destinations worldwide and airline services.

Rules:
- Generate a realistic, well-paced day-by-day itinerary
- Each day must include Morning, Afternoon, and Evening activities
- Respect all user guardrails strictly
- Optimize pacing (no rushing, allow time for meals and rest)
- Include specific landmark names, restaurants, and practical tips
- Use clear Markdown formatting with ## for day headers
- IMPORTANT: After providing the date range, include expected temperature, weather, and clothing advice in this exact format:
  **Expected Temperature:** [temperature range] (e.g., 15-25\u{b0}C / 59-77\u{b0}F)
  **Weather:** [typical weather conditions] (e.g., Mild and sunny, occasional rain)
  **What to Wear:** [specific clothing recommendations based on weather and local customs] (e.g., Light layers, comfortable walking shoes, sun hat. Modest clothing recommended for religious sites.)
- At the END of your itinerary, add a section titled \"## \u{2708}\u{fe0f} Recommended Airlines\" with 2-3 best airline options for this route, including why they're good choices (direct flights, price, comfort, etc.)

Output format:

**Travel Dates:** [dates]
**Expected Temperature:** [temp range in both Celsius and Fahrenheit]
**Weather:** [weather description]
**What to Wear:** [clothing advice considering weather, activities, and local customs]

## Day 1
**Morning:**
- Activity with details

**Afternoon:**
- Activity with details

**Evening:**
- Activity with details

...

## \u{2708}\u{fe0f} Recommended Airlines
**[Airline Name 1]**
- Why it's a good choice (direct flights, service quality, typical price range)

**[Airline Name 2]**
- Why it's a good choice";

pub fn build_user_prompt(request: &TripRequest, day_count: u32) -> String {
    let date_range = request.date_range();
    let source = request.source_city.trim();
    let destination = request.destination.trim();
    let interests = match request.interests.trim() {
        "" => DEFAULT_INTERESTS,
        s => s,
    };
    let guardrails = match request.guardrails.trim() {
        "" => "None",
        s => s,
    };

    format!(
        "Traveling FROM: {source}
Traveling TO: {destination}
Travel dates: {date_range}
Number of days: {day_count}
Special interests: {interests}
Guardrails/Restrictions: {guardrails}

Create a detailed travel itinerary that makes the most of the time available.

IMPORTANT: Start your response with:
**Travel Dates:** {date_range}
**Expected Temperature:** [provide temperature range in both \u{b0}C and \u{b0}F for {destination} during these dates]
**Weather:** [describe typical weather conditions]
**What to Wear:** [provide specific clothing recommendations based on the weather, planned activities, and local customs/culture]

Then provide the day-by-day itinerary with specific recommendations and practical tips.

At the end, recommend 2-3 best airlines for flights from {source} to {destination}, considering factors like direct flights, service quality, and typical pricing."
    )
}

/// The text-generation collaborator: instructions in, free-text markdown out.
pub trait TextGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, Error>;
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Fails when the credential is missing; nothing else is usable without it.
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "OPENAI_API_KEY not found. Please set it in your environment.".into(),
                )
            })?;
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(120),
        })
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI and API-compatible servers.
pub struct OpenAiGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, Error> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
        };

        let t0 = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::Generation(format!("HTTP {status}: {}", detail.trim())));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::Generation(format!("malformed response: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Generation("response contained no itinerary text".into()))?;

        log::info!(
            "Generated itinerary with {} in {:.1}s ({} chars)",
            self.config.model,
            t0.elapsed().as_secs_f64(),
            content.len()
        );
        Ok(content)
    }
}
