use regex::Regex;

use crate::error::Result;
use crate::models::{OtherSentinel, Vocabularies, Vocabulary};

/// Decoded multi-valued categorical field.
///
/// Tokens are unique and keep insertion order for encoding, but equality
/// ignores order. The free text only carries meaning while the "other"
/// token is present.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    tokens: Vec<String>,
    free_text: Option<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for token in tokens {
            set.insert(token.as_ref());
        }
        set
    }

    pub fn with_free_text(mut self, free_text: impl Into<String>) -> Self {
        self.free_text = Some(free_text.into());
        self
    }

    /// Add a token; returns false when it was already present.
    pub fn insert(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn free_text(&self) -> Option<&str> {
        self.free_text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn intersects(&self, other: &TagSet) -> bool {
        self.tokens.iter().any(|t| other.contains(t))
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.tokens.len() == other.tokens.len()
            && self.tokens.iter().all(|t| other.contains(t))
            && self.free_text == other.free_text
    }
}

impl Eq for TagSet {}

/// Encoder/decoder between delimited text and [`TagSet`].
#[derive(Debug, Clone)]
pub struct TagCodec {
    vocabulary: Vocabulary,
    other: OtherSentinel,
    marker: Regex,
}

impl TagCodec {
    /// Build a codec over the areas vocabulary.
    pub fn new(vocabularies: &Vocabularies) -> Result<Self> {
        Self::with_vocabulary(vocabularies.areas.clone(), vocabularies.other.clone())
    }

    pub fn with_vocabulary(vocabulary: Vocabulary, other: OtherSentinel) -> Result<Self> {
        let marker = Regex::new(&format!(
            "(?i)(?:{}|{}):",
            regex::escape(&other.token),
            regex::escape(&other.label)
        ))?;
        Ok(Self {
            vocabulary,
            other,
            marker,
        })
    }

    pub fn other_token(&self) -> &str {
        &self.other.token
    }

    /// Decode a stored field. Never fails.
    ///
    /// Text from the first "other:" marker onward is kept verbatim as free
    /// text. Tokens before it are matched by token, then by label; anything
    /// unrecognised is appended to the explicit free text, or folded into a
    /// synthesized one when none was written.
    pub fn decode(&self, raw: &str) -> TagSet {
        let raw = raw.trim();
        let (head, explicit) = match self.marker.find(raw) {
            Some(m) => (&raw[..m.start()], Some(raw[m.start()..].trim())),
            None => (raw, None),
        };

        let mut set = TagSet::new();
        let mut unknown: Vec<&str> = Vec::new();
        for piece in head.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match self.vocabulary.canonicalize(piece) {
                Some(token) => {
                    set.insert(token);
                }
                None if !unknown.contains(&piece) => unknown.push(piece),
                None => {}
            }
        }

        set.free_text = match explicit {
            Some(text) if !unknown.is_empty() => {
                tracing::debug!(?unknown, "appending unknown tags to explicit free text");
                Some(format!("{}, {}", text, unknown.join(", ")))
            }
            Some(text) => Some(text.to_string()),
            None if !unknown.is_empty() => {
                tracing::debug!(?unknown, "folding unknown tags into free text");
                Some(format!("{}: {}", self.other.label, unknown.join(", ")))
            }
            None => None,
        };

        if set.free_text.is_some() {
            set.insert(self.other_token());
        }
        set
    }

    /// Serialize a tag set for storage.
    pub fn encode(&self, tags: &TagSet) -> String {
        self.encode_parts(tags.tokens().iter().map(String::as_str), tags.free_text())
    }

    /// Join unique tokens with `", "`, appending the free text when the
    /// "other" token is among them.
    pub fn encode_parts<'a, I>(&self, tokens: I, free_text: Option<&str>) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = TagSet::from_tokens(tokens.into_iter().map(str::trim).filter(|t| !t.is_empty()));
        let mut out = set.tokens().join(", ");

        let free_text = free_text.map(str::trim).filter(|t| !t.is_empty());
        if let Some(text) = free_text {
            if set.contains(&self.other.token) {
                out.push_str(", ");
                out.push_str(text);
            }
        }
        out
    }
}

/// Whether the serialized field `raw` holds any of `query` as a whole token.
///
/// Matches a token only at delimiter boundaries: the whole field, a
/// `token,` prefix, a `, token,` infix or a `, token` suffix. Case-insensitive.
pub fn contains_any<I, S>(raw: &str, query: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let haystack = raw.trim().to_lowercase();
    if haystack.is_empty() {
        return false;
    }

    query.into_iter().any(|token| {
        let token = token.as_ref().trim().to_lowercase();
        !token.is_empty()
            && (haystack == token
                || haystack.starts_with(&format!("{},", token))
                || haystack.contains(&format!(", {},", token))
                || haystack.ends_with(&format!(", {}", token)))
    })
}
