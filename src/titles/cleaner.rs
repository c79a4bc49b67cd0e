//! Beat title normalization
//!
//! Scraped marketplace titles are stuffed with SEO boilerplate ("Free Drake Type Beat
//! 2024 - Midnight (Prod. X) 140 BPM"). The cleaner runs an ordered table of regex
//! rewrites over the raw text, title-cases what is left and, when that wipes out a
//! short but legitimate title, retries with a lighter rule set.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Returned when a non-trivial input cannot be reduced to a usable title
pub const SENTINEL_TITLE: &str = "Beat";

/// Minimum number of characters in a usable title
pub const MIN_TITLE_CHARS: usize = 3;

/// A single ordered rewrite in the cleanup pipeline
#[derive(Debug)]
pub struct CleanupRule {
    /// Short label used in debug logs and tests
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl CleanupRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("cleanup rule pattern must compile"),
            replacement,
        }
    }

    /// Apply this rule to every match in `text`
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }

    /// Whether the rule would change `text`
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Full cleanup pipeline. Order is part of the contract: later rules see the output
/// of earlier ones.
pub static CLEANUP_RULES: Lazy<Vec<CleanupRule>> = Lazy::new(|| {
    vec![
        // Marketing and metadata phrases
        CleanupRule::new("free_type_beat", r"(?i)\bfree\s+type\s+beat\b", ""),
        CleanupRule::new("type_beat", r"(?i)\btype\s+beat\b", ""),
        CleanupRule::new("free_beat", r"(?i)\bfree\s+beat\b", ""),
        CleanupRule::new("free_tag", r"(?i)[(\[]\s*free\s*[)\]]", ""),
        CleanupRule::new("royalty_free", r"(?i)\broyalty[\s-]*free\b", ""),
        CleanupRule::new("leading_free", r"(?i)^\s*free\b", ""),
        CleanupRule::new("instrumental", r"(?i)\binstrumental\b", ""),
        CleanupRule::new("produced_by", r"(?i)\bprod(?:\.|uced)?\s+by\b[^()\[\]]*", ""),
        CleanupRule::new("prod_credit", r"(?i)\bprod\.\s*[^()\[\]]*", ""),
        CleanupRule::new("lease_buy", r"(?i)\b(?:lease|buy)\s+this\b(?:\s+beat)?", ""),
        CleanupRule::new("for_sale", r"(?i)\bfor\s+sale\b", ""),
        CleanupRule::new("bpm_marker", r"(?i)\b\d+\s*(?:bpm|k)\b", ""),
        CleanupRule::new("price", r"\$\d+(?:[.,]\d+)?", ""),
        CleanupRule::new("exclusive", r"(?i)\bexclusive\b", ""),
        CleanupRule::new("premium", r"(?i)\bpremium\b", ""),
        CleanupRule::new("year", r"\b\d{4}\b", ""),
        CleanupRule::new("inspired_by", r"(?i)\binspired\s+by\b", ""),
        CleanupRule::new("style_of", r"(?i)\bstyle\s+of\b", ""),
        CleanupRule::new("similar_to", r"(?i)\bsimilar\s+to\b", ""),
        CleanupRule::new("call_to_action", r"(?i)\b(?:youtube|listen\s+now|download\s+now)\b", ""),
        CleanupRule::new("superlative", r"(?i)\b(?:trending|viral|hot|new|best|top)\b", ""),
        CleanupRule::new("featuring", r"(?i)\b(?:feat|ft)\.", ""),
        // "Artist1 x Artist2 [type] beat" prefixes and trailing " x Artist2"
        CleanupRule::new("collab_prefix", r"(?i)^.+?\s+x\s+.+?\s+(?:type\s+)?beat\b", ""),
        CleanupRule::new("collab_suffix", r"(?i)\s+x\s+.+$", ""),
        // Asides are dropped with their contents
        CleanupRule::new("parenthetical", r"\([^)]*\)", ""),
        CleanupRule::new("bracketed", r"\[[^\]]*\]", ""),
        // Quotes and SEO symbols
        CleanupRule::new("quotes", r#"["'‘’“”]"#, ""),
        CleanupRule::new("seo_symbols", r"[*|<>\[\]{}`\\()#^~!@%&;:,.?]", ""),
        CleanupRule::new("dash_separator", r"\s+[-–—]+\s+", " "),
        CleanupRule::new("dangling_dash", r"^[\s\-–—]+|[\s\-–—]+$", ""),
        CleanupRule::new("whitespace", r"\s+", " "),
        CleanupRule::new("trim", r"^\s+|\s+$", ""),
        // Generic noun suffixes
        CleanupRule::new(
            "generic_suffix",
            r"(?i)\s+(?:beat|loop|sample|track|audio|music|sound|theme|melody|rhythm)$",
            "",
        ),
    ]
});

/// Lighter pass used when the full pipeline over-strips a title
pub static LIGHT_RULES: Lazy<Vec<CleanupRule>> = Lazy::new(|| {
    vec![
        CleanupRule::new("type_beat", r"(?i)\btype\s+beat\b", ""),
        CleanupRule::new("parenthetical", r"\([^)]*\)", ""),
        CleanupRule::new("bracketed", r"\[[^\]]*\]", ""),
        CleanupRule::new("whitespace", r"\s+", " "),
        CleanupRule::new("trim", r"^\s+|\s+$", ""),
    ]
});

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\S*").expect("word pattern must compile"));

/// Run `rules` in order over `input`
pub fn apply_rules(input: &str, rules: &[CleanupRule]) -> String {
    rules.iter().fold(input.to_string(), |text, rule| rule.apply(&text))
}

/// Upper-case the first letter of every word and lower-case the rest
pub fn title_case(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures| {
        let mut chars = caps[0].chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect::<String>(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Clean a raw scraped title.
///
/// Returns an empty string when the raw input, whitespace included, is shorter than
/// [`MIN_TITLE_CHARS`]. Any longer input yields a title of at least that many
/// characters, or [`SENTINEL_TITLE`] when both passes strip it down to nothing.
pub fn clean_title(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let cleaned = title_case(&apply_rules(raw, &CLEANUP_RULES));
    if cleaned.chars().count() >= MIN_TITLE_CHARS {
        return cleaned;
    }

    if raw.chars().count() < MIN_TITLE_CHARS {
        return String::new();
    }

    debug!("Full cleanup over-stripped '{}', retrying with light pass", raw);
    let lighter = apply_rules(raw, &LIGHT_RULES);
    if lighter.chars().count() >= MIN_TITLE_CHARS {
        title_case(&lighter)
    } else {
        SENTINEL_TITLE.to_string()
    }
}
