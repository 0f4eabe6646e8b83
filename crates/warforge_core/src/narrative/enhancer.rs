//! Optional rewrite of mission descriptions by an external text model.
//!
//! Enhancement only ever replaces descriptions. Any failure, timeout or
//! malformed reply leaves the procedural text in place.

use crate::config::EnhancerConfig;
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use warforge_data::{Narrative, World};

const SEED_MODULUS: u64 = 2_147_483_647;
const PROMPT_LOCATIONS: usize = 5;

/// Context handed to an enhancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingRequest {
    /// `"Name (alignment)"` per faction.
    pub factions: Vec<String>,
    pub locations: Vec<String>,
    /// `(name, mission type)` per mission, in order.
    pub missions: Vec<(String, String)>,
    pub seed: u64,
}

impl BriefingRequest {
    pub fn new(narrative: &Narrative, world: &World) -> Self {
        let prefix = &narrative.seed[..narrative.seed.len().min(8)];
        let seed = u64::from_str_radix(prefix, 16).unwrap_or(0) % SEED_MODULUS;

        Self {
            factions: narrative
                .factions
                .iter()
                .map(|f| format!("{} ({})", f.name, f.alignment))
                .collect(),
            locations: world
                .pois
                .iter()
                .take(PROMPT_LOCATIONS)
                .map(|p| p.name.clone())
                .collect(),
            missions: narrative
                .missions
                .iter()
                .map(|m| (m.name.clone(), m.kind.to_string()))
                .collect(),
            seed,
        }
    }

    pub fn prompt(&self) -> String {
        let missions = self
            .missions
            .iter()
            .enumerate()
            .map(|(i, (name, kind))| format!("{}. {name} ({kind})", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are a military scenario writer. Given these factions: {}, and locations: {}, \
             generate a brief tactical briefing (2-3 sentences) for each of these missions:\n\n\
             {missions}\n\n\
             Keep responses concise and militaristic. Use NATO phonetic alphabet where appropriate. \
             Respond in JSON format: {{\"briefings\": [\"briefing1\", \"briefing2\", ...]}}",
            self.factions.join(", "),
            self.locations.join(", "),
        )
    }
}

#[async_trait]
pub trait NarrativeEnhancer: Send + Sync {
    /// One briefing per requested mission, in order. Shorter replies are allowed.
    async fn briefings(&self, request: &BriefingRequest) -> Result<Vec<String>>;
}

/// Always fails, so callers keep procedural text.
pub struct DisabledEnhancer;

#[async_trait]
impl NarrativeEnhancer for DisabledEnhancer {
    async fn briefings(&self, _request: &BriefingRequest) -> Result<Vec<String>> {
        Err(EngineError::enhancer("enhancer disabled"))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    seed: u64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct BriefingReply {
    briefings: Vec<String>,
}

/// OpenAI-compatible chat-completions client.
pub struct HttpEnhancer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl HttpEnhancer {
    pub fn new(api_url: &str, api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        }
    }

    /// Reads the key from the environment variable named in `config`.
    pub fn from_config(config: &EnhancerConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            EngineError::enhancer(format!("{} is not set", config.api_key_env))
        })?;
        Ok(Self::new(&config.api_url, &api_key, &config.model, config.max_tokens))
    }
}

#[async_trait]
impl NarrativeEnhancer for HttpEnhancer {
    async fn briefings(&self, request: &BriefingRequest) -> Result<Vec<String>> {
        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.7,
            seed: request.seed,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::enhancer(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(EngineError::enhancer(format!("API error {status}: {text}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::enhancer(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EngineError::enhancer("empty response"))?;

        parse_briefings(&content)
    }
}

/// Slice from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a `{"briefings": [...]}` reply, tolerating prose around the object.
pub fn parse_briefings(content: &str) -> Result<Vec<String>> {
    let json = extract_json(content).ok_or_else(|| EngineError::enhancer("no JSON object in reply"))?;
    let reply: BriefingReply = serde_json::from_str(json)?;
    Ok(reply.briefings)
}

/// Mask `sk-...` keys and `Bearer ...` tokens.
pub fn redact_credentials(message: &str) -> String {
    fn redact_after(text: &str, marker: &str, replacement: &str, keep: fn(char) -> bool) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find(marker) {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + marker.len()..];
            let secret_len = after.find(|c: char| !keep(c)).unwrap_or(after.len());
            if secret_len == 0 {
                out.push_str(marker);
            } else {
                out.push_str(replacement);
            }
            rest = &after[secret_len..];
        }
        out.push_str(rest);
        out
    }

    let masked = redact_after(message, "sk-", "sk-***REDACTED***", |c| c.is_ascii_alphanumeric());
    redact_after(&masked, "Bearer ", "Bearer ***REDACTED***", |c| {
        !c.is_whitespace() && c != '"' && c != '\''
    })
}

/// Ask `enhancer` for briefings, bounded by `timeout`.
///
/// Returns `true` when at least one description was replaced.
pub async fn enhance_with_fallback(
    enhancer: &dyn NarrativeEnhancer,
    narrative: &mut Narrative,
    world: &World,
    timeout: Duration,
) -> bool {
    if narrative.missions.is_empty() {
        return false;
    }
    let request = BriefingRequest::new(narrative, world);

    let briefings = match tokio::time::timeout(timeout, enhancer.briefings(&request)).await {
        Ok(Ok(briefings)) => briefings,
        Ok(Err(e)) => {
            tracing::warn!(
                error = %redact_credentials(&e.to_string()),
                "Narrative enhancement failed (using procedural fallback)"
            );
            return false;
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Narrative enhancement timed out (using procedural fallback)"
            );
            return false;
        }
    };

    let mut replaced = 0;
    for (mission, briefing) in narrative.missions.iter_mut().zip(briefings) {
        if !briefing.trim().is_empty() {
            mission.description = briefing;
            replaced += 1;
        }
    }
    tracing::debug!(replaced, "Mission briefings enhanced");
    replaced > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{generate_narrative, NarrativeOptions};
    use crate::rng::SeededRng;
    use crate::world::{generate_world, WorldOptions};

    struct Canned(Vec<String>);

    #[async_trait]
    impl NarrativeEnhancer for Canned {
        async fn briefings(&self, _request: &BriefingRequest) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct Stalled;

    #[async_trait]
    impl NarrativeEnhancer for Stalled {
        async fn briefings(&self, _request: &BriefingRequest) -> Result<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["too late".to_string()])
        }
    }

    fn fixture() -> (World, Narrative) {
        let world = generate_world(&mut SeededRng::new(31), &WorldOptions::default()).unwrap();
        let narrative =
            generate_narrative(&mut SeededRng::new(32), &world, &NarrativeOptions::default());
        (world, narrative)
    }

    #[test]
    fn test_extract_json_ignores_prose() {
        let text = "Sure! {\"briefings\": [\"a\"]} Hope that helps.";
        assert_eq!(extract_json(text), Some("{\"briefings\": [\"a\"]}"));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(parse_briefings(text).unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_briefings_rejects_wrong_shape() {
        assert!(parse_briefings("{\"text\": \"hello\"}").is_err());
        assert!(parse_briefings("{\"briefings\": \"hello\"}").is_err());
    }

    #[test]
    fn test_redact_credentials() {
        let msg = "401 for key sk-abc123XYZ with header Bearer tok.en-1 rejected";
        let redacted = redact_credentials(msg);
        assert!(!redacted.contains("abc123XYZ"));
        assert!(!redacted.contains("tok.en-1"));
        assert!(redacted.contains("sk-***REDACTED***"));
        assert!(redacted.contains("Bearer ***REDACTED***"));
        assert!(redacted.ends_with("rejected"));
    }

    #[test]
    fn test_prompt_lists_missions() {
        let (world, narrative) = fixture();
        let request = BriefingRequest::new(&narrative, &world);
        let prompt = request.prompt();
        assert!(prompt.contains(&format!("1. {}", narrative.missions[0].name)));
        assert!(prompt.contains("\"briefings\""));
        assert!(request.seed < SEED_MODULUS);
        assert!(request.locations.len() <= PROMPT_LOCATIONS);
    }

    #[tokio::test]
    async fn test_briefings_replace_descriptions() {
        let (world, mut narrative) = fixture();
        let enhancer = Canned(vec!["Alpha moves at dawn.".to_string(), String::new()]);
        let second = narrative.missions[1].description.clone();

        assert!(enhance_with_fallback(&enhancer, &mut narrative, &world, Duration::from_secs(1)).await);
        assert_eq!(narrative.missions[0].description, "Alpha moves at dawn.");
        assert_eq!(narrative.missions[1].description, second);
    }

    #[tokio::test]
    async fn test_failure_keeps_procedural_text() {
        let (world, mut narrative) = fixture();
        let before = narrative.clone();
        assert!(!enhance_with_fallback(&DisabledEnhancer, &mut narrative, &world, Duration::from_secs(1)).await);
        assert_eq!(narrative, before);
    }

    #[tokio::test]
    async fn test_timeout_keeps_procedural_text() {
        let (world, mut narrative) = fixture();
        let before = narrative.clone();
        assert!(!enhance_with_fallback(&Stalled, &mut narrative, &world, Duration::from_millis(20)).await);
        assert_eq!(narrative, before);
    }
}
