// src/lookup.rs
use crate::config::LookupConfig;
use crate::event::{AppEvent, LookupOutcome};
use reqwest::Url;
use serde::Deserialize;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No reference topic known for '{0}'")]
    NoTopic(String),
    #[error("Invalid lookup endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("Lookup request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("No summary available for '{0}'")]
    EmptySummary(String),
    #[error("Reference lookups unavailable: {0}")]
    Unavailable(String),
}

/// Encyclopedia article names for the default exercises.
const TOPICS: [(&str, &str); 9] = [
    ("Squats", "Squat (exercise)"),
    ("Deadlifts", "Deadlift"),
    ("Rows", "Bent-over row"),
    ("Overhead Press", "Overhead press"),
    ("Bench Press", "Bench press"),
    ("Tricep Dips", "Dip (exercise)"),
    ("Dips", "Dip (exercise)"),
    ("Pullups", "Pull-up (exercise)"),
    ("Bicep Curls", "Biceps curl"),
];

/// Maps an exercise display name to its article topic.
pub fn topic_for(exercise: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|(name, _)| *name == exercise)
        .map(|(_, topic)| *topic)
}

/// The text up to and including the first full stop.
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    match text.find('.') {
        Some(end) => &text[..=end],
        None => text,
    }
}

/// Something that can summarise a topic in a sentence.
pub trait ReferenceSource: Send + Sync {
    fn summary(&self, topic: &str) -> Result<String, LookupError>;
}

#[derive(Deserialize, Debug)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
}

/// Queries a Wikipedia-style REST summary endpoint.
pub struct WikipediaClient {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl WikipediaClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|_| LookupError::InvalidEndpoint(config.endpoint.clone()))?;
        if endpoint.cannot_be_a_base() {
            return Err(LookupError::InvalidEndpoint(config.endpoint.clone()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gym-log/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    fn topic_url(&self, topic: &str) -> Url {
        let mut url = self.endpoint.clone();
        // Checked in new(), a base URL always has path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&topic.replace(' ', "_"));
        }
        url
    }
}

impl ReferenceSource for WikipediaClient {
    fn summary(&self, topic: &str) -> Result<String, LookupError> {
        let url = self.topic_url(topic);
        debug!(%url, "requesting summary");
        let response: SummaryResponse = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json()?;
        let sentence = first_sentence(&response.extract);
        if sentence.is_empty() {
            return Err(LookupError::EmptySummary(topic.to_string()));
        }
        Ok(sentence.to_string())
    }
}

/// Runs lookups off the main loop and posts the outcome back as an event.
#[derive(Clone)]
pub struct Lookups {
    source: Arc<dyn ReferenceSource>,
    events: Sender<AppEvent>,
}

impl Lookups {
    pub fn new(source: Arc<dyn ReferenceSource>, events: Sender<AppEvent>) -> Self {
        Self { source, events }
    }

    /// Starts a background lookup for `exercise`. Never blocks.
    pub fn request(&self, exercise: &str) {
        let exercise = exercise.to_string();
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        thread::spawn(move || {
            let text = match topic_for(&exercise) {
                Some(topic) => source.summary(topic),
                None => Err(LookupError::NoTopic(exercise.clone())),
            }
            .unwrap_or_else(|e| {
                warn!(exercise = %exercise, "lookup failed: {e}");
                e.to_string()
            });
            info!(exercise = %exercise, "lookup finished");
            // The loop may already have quit
            let _ = events.send(AppEvent::Lookup(LookupOutcome { exercise, text }));
        });
    }
}

/// Used when the HTTP client cannot be built, every lookup reports why.
pub struct Unavailable(pub String);

impl ReferenceSource for Unavailable {
    fn summary(&self, _topic: &str) -> Result<String, LookupError> {
        Err(LookupError::Unavailable(self.0.clone()))
    }
}
