use super::{create_llm, ChatMessage, LLMConfig, LLMProvider, LLM};
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a creative assistant for music producers that specializes in creating catchy beat titles. Only respond with the rephrased title and nothing else. Keep titles short and marketable.";

/// Synonyms used by the offline rephraser, keyed by exact word
const SUBSTITUTIONS: &[(&str, [&str; 5])] = &[
    ("Dark", ["Deep", "Shadowy", "Midnight", "Obscure", "Murky"]),
    ("City", ["Urban", "Metro", "Downtown", "Metropolis", "Concrete"]),
    ("Night", ["Twilight", "Evening", "Dusk", "Nocturnal", "Midnight"]),
    ("Dreams", ["Visions", "Fantasies", "Illusions", "Reveries", "Imagination"]),
    ("Soul", ["Spirit", "Heart", "Essence", "Core", "Feeling"]),
    ("Light", ["Glow", "Shine", "Radiance", "Beam", "Glimmer"]),
    ("Street", ["Road", "Avenue", "Block", "Hood", "Corner"]),
    ("Flow", ["Wave", "Stream", "Current", "Movement", "Rhythm"]),
    ("Cold", ["Icy", "Frozen", "Chilled", "Frosty", "Arctic"]),
    ("Smooth", ["Silky", "Sleek", "Velvety", "Fluid", "Polished"]),
    ("Wave", ["Ripple", "Surge", "Tide", "Swell", "Undulation"]),
    ("Fire", ["Flame", "Blaze", "Inferno", "Heat", "Burn"]),
    ("Money", ["Cash", "Currency", "Paper", "Wealth", "Fortune"]),
    ("Beat", ["Rhythm", "Pulse", "Tempo", "Cadence", "Groove"]),
    ("Energy", ["Power", "Force", "Vigor", "Dynamism", "Intensity"]),
    ("Life", ["Existence", "Living", "Vitality", "Journey", "Experience"]),
    ("Love", ["Passion", "Affection", "Adoration", "Devotion", "Emotion"]),
];

const PREFIXES: &[&str] = &[
    "Eternal", "Cosmic", "Golden", "Crystal", "Royal", "Epic", "Divine", "Sonic", "Electric",
];

static QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["']"#).expect("quote pattern must compile"));

static REPLY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(rephrased( title)?:?\s*|new title:?\s*|title:?\s*)")
        .expect("reply label pattern must compile")
});

/// Rephrases beat titles through an LLM, falling back to local word play
pub struct TitleRephraser {
    llm: Option<Box<dyn LLM>>,
}

impl TitleRephraser {
    /// Build from configuration. Without a key (or a local LMStudio endpoint) the
    /// rephraser runs offline.
    pub fn new(config: &LLMConfig) -> Self {
        if config.provider == LLMProvider::OpenAI && !config.has_api_key() {
            info!("🔑 No OpenAI API key configured, using offline rephrasing");
            return Self::offline();
        }

        match create_llm(config) {
            Ok(llm) => {
                info!("✅ Title rephraser initialized with {:?} provider", config.provider);
                Self { llm: Some(llm) }
            }
            Err(e) => {
                warn!("Failed to initialize LLM, using offline rephrasing: {}", e);
                Self::offline()
            }
        }
    }

    pub fn offline() -> Self {
        Self { llm: None }
    }

    pub fn with_llm(llm: Box<dyn LLM>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn is_online(&self) -> bool {
        self.llm.is_some()
    }

    /// Rephrase `title` for `genre`. Never fails.
    pub async fn rephrase(&self, title: &str, genre: &str) -> String {
        let Some(llm) = &self.llm else {
            debug!("Rephrasing '{}' offline", title);
            return Self::offline_rephrase(title);
        };

        match llm.chat(Self::build_messages(title, genre)).await {
            Ok(response) => clean_reply(&response.content, title),
            Err(e) => {
                warn!("LLM rephrasing failed, falling back to offline rephrasing: {}", e);
                Self::offline_rephrase(title)
            }
        }
    }

    fn offline_rephrase(title: &str) -> String {
        fallback_rephrase(title, &mut rand::rng())
    }

    fn build_messages(title: &str, genre: &str) -> Vec<ChatMessage> {
        let prompt = format!(
            "Rephrase the following beat title so that its original meaning is fully preserved but expressed in a fresh, creative style. \
            Do not change the core meaning and do not chain extra words together. Generate a completely reworded title with comparable content: '{title}'\n\n\
            Rules:\n\
            - Keep the meaning and the feeling intact\n\
            - Use entirely new wording or synonyms\n\
            - The title should fit the {genre} genre\n\
            - Keep it short, about the length of the original\n\
            - No additions such as \"Type Beat\" or \"Instrumental\"\n\
            - Return ONLY the rephrased title, without explanations\n\
            - Always start from the original title"
        );

        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
    }
}

/// Strip quotes and leading labels from a model reply. Empty replies yield `original`.
pub fn clean_reply(reply: &str, original: &str) -> String {
    let unquoted = QUOTES.replace_all(reply.trim(), "");
    let cleaned = REPLY_LABEL.replace(&unquoted, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        original.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Rephrase without a model: swap known words for synonyms, and when nothing changed
/// (or on a 30% chance) reverse the word order or prepend an epithet.
pub fn fallback_rephrase<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let words: Vec<&str> = title.split(' ').collect();

    let mut rephrased = words
        .iter()
        .map(|&word| {
            let synonyms = SUBSTITUTIONS
                .iter()
                .find(|(key, _)| *key == word)
                .map(|(_, synonyms)| synonyms);

            match synonyms {
                Some(synonyms) if rng.random_bool(0.5) => synonyms.choose(rng).copied().unwrap_or(word),
                _ => word,
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if rephrased == title || rng.random_bool(0.3) {
        rephrased = if words.len() > 1 && rng.random_bool(0.5) {
            words.iter().rev().copied().collect::<Vec<_>>().join(" ")
        } else {
            let prefix = PREFIXES.choose(rng).copied().unwrap_or("Epic");
            format!("{} {}", prefix, title)
        };
    }

    rephrased
}
