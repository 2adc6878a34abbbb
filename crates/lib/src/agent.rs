//! AQI agent turn: find the location in the message (or remember it), fetch the
//! reading, and describe it. This is the [`Handler`] the gateway serves.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::aqi::{self, AqiSource};
use crate::handler::{Handler, HandlerError, HandlerResult};
use crate::llm::LocationModel;
use crate::session::SessionStore;

pub const NO_LOCATION: &str = "Sorry, I couldn't determine the location from your message.";

fn in_location() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"in\s+([A-Za-z\s]+)[\?\.]?").expect("static regex"))
}

/// Regex fallback: the words after "in", minus filler words.
pub fn location_after_in(text: &str) -> Option<String> {
    let caps = in_location().captures(text)?;
    let raw = caps.get(1)?.as_str().trim();
    aqi::validate_location(Some(&aqi::strip_filler_words(raw)))
}

fn is_single_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphabetic())
}

/// Air-quality agent over a location model (optional) and an AQI source.
pub struct AqiAgent {
    locator: Option<Arc<dyn LocationModel>>,
    source: Arc<dyn AqiSource>,
    sessions: SessionStore,
}

impl AqiAgent {
    pub fn new(locator: Option<Arc<dyn LocationModel>>, source: Arc<dyn AqiSource>) -> Self {
        Self {
            locator,
            source,
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Single word → taken as-is; otherwise ask the model, then fall back to the regex.
    pub async fn extract_location(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if is_single_word(text) {
            return aqi::validate_location(Some(text));
        }

        let mut location = None;
        if let Some(ref locator) = self.locator {
            match locator.extract_location(text).await {
                Ok(raw) => {
                    location = aqi::validate_location(Some(&raw));
                    log::info!("agent: model extracted location: {:?}", location);
                }
                Err(e) => log::warn!("agent: location model failed: {}", e),
            }
        }
        if location.is_none() {
            location = location_after_in(text);
            if location.is_some() {
                log::info!("agent: regex fallback extracted: {:?}", location);
            }
        }
        location
    }

    async fn run_turn(&self, text: &str, session_id: Option<&str>) -> HandlerResult {
        let location = match self.extract_location(text).await {
            Some(l) => l,
            None => match self.sessions.last_location(session_id).await {
                Some(last) => {
                    log::info!("agent: using remembered location: {}", last);
                    last
                }
                None => {
                    log::warn!("agent: {}", NO_LOCATION);
                    return HandlerResult::summary(NO_LOCATION);
                }
            },
        };
        self.sessions.remember_location(session_id, &location).await;

        let reading = match self.source.fetch_aqi(&location).await {
            Ok(v) => aqi::validate_aqi(Some(v)),
            Err(e) => {
                log::warn!("agent: aqi fetch failed for {}: {}", location, e);
                None
            }
        };
        let summary = match reading {
            Some(v) => aqi::describe(&location, v),
            None => format!("Sorry, I couldn't fetch the air quality for {}.", location),
        };
        log::info!("agent: summary: {}", summary);

        HandlerResult {
            location: aqi::validate_location(Some(&location)),
            aqi: reading,
            summary: Some(aqi::validate_summary(Some(&summary))),
        }
    }
}

#[async_trait]
impl Handler for AqiAgent {
    async fn process(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<HandlerResult, HandlerError> {
        Ok(self.run_turn(text, session_id).await)
    }
}
