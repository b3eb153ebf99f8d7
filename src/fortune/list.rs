//! The fortune list: an ordered, read-only sequence of strings.
//!
//! A list is loaded once at startup and never mutated afterwards. Index `i` is
//! only meaningful together with the list it came from; the deterministic mode
//! maps an identifier to `hash % len()`, so editing the list file remaps every
//! tag.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Fortunes shipped with the binary, used when no list file is configured.
const BUILTIN: [&str; 48] = [
    // Classic cookie
    "A pleasant surprise is waiting for you.",
    "Your hard work is about to pay off.",
    "You will find what you are looking for in an unexpected place.",
    "A new friendship will brighten your week.",
    "Good news will come to you by mail.",
    "Now is the time to try something new.",
    "An old friend is thinking of you right now.",
    "Your smile will open a door that words could not.",
    "Patience is a key that fits many locks.",
    "The greatest risk is not taking one.",
    "You are braver than you believe.",
    "Adventure can be real happiness.",
    // Playful
    "Help! I'm being held prisoner in a fortune cookie factory.",
    "You will be hungry again in one hour.",
    "That wasn't chicken.",
    "Ignore the previous cookie.",
    "The fortune you seek is in another cookie.",
    "You love cookies. This is not a prediction, it is an observation.",
    "Error 404: fortune not found. Try again tomorrow.",
    "Someone nearby is about to ask for a bite.",
    "A tap a day keeps the boredom away.",
    "Your lucky number is the one you are thinking of.",
    // Reflective
    "The best time to plant a tree was twenty years ago. The second best time is now.",
    "Small steps every day add up to big journeys.",
    "Kindness is free. Spend it often.",
    "Listen more than you speak today.",
    "What you seek is also seeking you.",
    "A quiet mind hears the answer first.",
    "Do one thing today your future self will thank you for.",
    "Rest is part of the work.",
    "Every expert was once a beginner.",
    "Curiosity will lead you somewhere wonderful.",
    // Maker & tech
    "The bug you are hunting is one line above where you are looking.",
    "Your next build will pass on the first try.",
    "Commit early, commit often, sleep well.",
    "A well-named variable saves an hour of debugging.",
    "Today is a good day to write the test first.",
    "The tag you tapped chose you as much as you chose it.",
    "Simplicity is the ultimate sophistication.",
    "Measure twice, solder once.",
    // Encouragement
    "Your persistence will soon be rewarded.",
    "You are on the right path. Keep walking.",
    "A bold idea you have been holding back deserves a chance.",
    "Someone is grateful you exist.",
    "The stars favor your next decision.",
    "Luck is what happens when preparation meets opportunity.",
    "Today you will make someone laugh.",
    "The answer is yes, but ask again later.",
];

/// Errors raised while loading a list file.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read fortune list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fortune list {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered, immutable list of fortunes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FortuneList {
    entries: Vec<String>,
}

impl FortuneList {
    /// The built-in list.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN)
    }

    /// Build a list from any ordered sequence of strings. Order and duplicates are kept.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a list file.
    ///
    /// Accepted formats:
    /// - a JSON array of strings (`.json` extension, or any file whose content
    ///   parses as one)
    /// - a Unix `fortune` file, entries separated by lines holding only `%`
    /// - plain text, one fortune per non-blank line
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ListError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ListError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            return Self::parse_json(&content).map_err(|source| ListError::Json {
                path: path.display().to_string(),
                source,
            });
        }
        // Text fortunes may open with `[`; only a clean JSON parse wins.
        if content.trim_start().starts_with('[') {
            if let Ok(list) = Self::parse_json(&content) {
                return Ok(list);
            }
        }
        Ok(Self::parse_text(&content))
    }

    fn parse_json(content: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<String> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    fn parse_text(content: &str) -> Self {
        let has_separators = content.lines().any(|l| l.trim_end() == "%");
        if has_separators {
            let mut entries = Vec::new();
            let mut current: Vec<&str> = Vec::new();
            for line in content.lines() {
                if line.trim_end() == "%" {
                    push_block(&mut entries, &current);
                    current.clear();
                } else {
                    current.push(line.trim_end());
                }
            }
            push_block(&mut entries, &current);
            return Self { entries };
        }
        Self::from_entries(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty()),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Length in bytes of the longest entry, 0 for an empty list.
    pub fn max_entry_len(&self) -> usize {
        self.entries.iter().map(String::len).max().unwrap_or(0)
    }
}

// Multi-line fortunes keep their inner line breaks; blank blocks are dropped.
fn push_block(entries: &mut Vec<String>, lines: &[&str]) {
    let block = lines.join("\n");
    let block = block.trim();
    if !block.is_empty() {
        entries.push(block.to_string());
    }
}
