//! Deterministic text normalization.
//!
//! `TextNormalizer` performs the fixed cleaning sequence (lowercase, strip
//! URLs / e-mail addresses / digit runs / non-letter characters), tokenizes,
//! removes stop-words, tags each token with a coarse part-of-speech category
//! and lemmatizes with that category. Output depends only on the input text
//! and the `LanguageResources` snapshot: no randomness, no process-wide
//! state. Resources are injected at construction rather than cached in a
//! hidden singleton.
use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;

use crate::error::PipelineError;

/// Placeholder emitted when every token of a message is filtered out.
/// Callers must treat it as a valid feature input, not an error.
pub const EMPTY_PLACEHOLDER: &str = "<empty>";

/// English stop-word snapshot (NLTK word list).
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Irregular verb forms mapped to their base form.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("was", "be"), ("were", "be"), ("been", "be"), ("being", "be"),
    ("has", "have"), ("had", "have"), ("having", "have"),
    ("went", "go"), ("gone", "go"),
    ("did", "do"), ("done", "do"),
    ("said", "say"), ("made", "make"), ("got", "get"), ("gotten", "get"),
    ("took", "take"), ("taken", "take"), ("came", "come"),
    ("saw", "see"), ("seen", "see"), ("gave", "give"), ("given", "give"),
    ("found", "find"), ("told", "tell"), ("thought", "think"),
    ("sent", "send"), ("ran", "run"), ("knew", "know"), ("known", "know"),
    ("left", "leave"), ("felt", "feel"), ("kept", "keep"), ("met", "meet"),
    ("paid", "pay"), ("brought", "bring"), ("bought", "buy"),
    ("caught", "catch"), ("taught", "teach"), ("sold", "sell"),
    ("heard", "hear"), ("held", "hold"), ("stood", "stand"),
    ("lost", "lose"), ("meant", "mean"), ("sat", "sit"),
    ("spoke", "speak"), ("spoken", "speak"), ("wrote", "write"),
    ("written", "write"), ("woke", "wake"), ("chose", "choose"),
    ("chosen", "choose"),
];

/// Irregular plural nouns mapped to their singular form.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"),
    ("feet", "foot"), ("teeth", "tooth"), ("geese", "goose"),
    ("mice", "mouse"),
];

/// Irregular comparative/superlative adjectives.
const IRREGULAR_ADJECTIVES: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
];

/// Coarse part-of-speech category used to pick lemmatization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Adjective,
    Verb,
    Noun,
    Adverb,
}

/// Immutable lemma tables and suffix rules.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular_verbs: HashMap<String, String>,
    irregular_nouns: HashMap<String, String>,
    irregular_adjectives: HashMap<String, String>,
}

impl Lemmatizer {
    fn from_pairs(
        verbs: &[(&str, &str)],
        nouns: &[(&str, &str)],
        adjectives: &[(&str, &str)],
    ) -> Self {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        Lemmatizer {
            irregular_verbs: to_map(verbs),
            irregular_nouns: to_map(nouns),
            irregular_adjectives: to_map(adjectives),
        }
    }

    /// Lemmatize one lowercase token using the given category.
    pub fn lemmatize(&self, token: &str, tag: PosTag) -> String {
        match tag {
            PosTag::Noun => self.lemmatize_noun(token),
            PosTag::Verb => self.lemmatize_verb(token),
            PosTag::Adjective => self.lemmatize_adjective(token),
            // Adverbs rarely inflect; the few irregular cases are not worth
            // the table.
            PosTag::Adverb => token.to_string(),
        }
    }

    fn lemmatize_noun(&self, token: &str) -> String {
        if let Some(base) = self.irregular_nouns.get(token) {
            return base.clone();
        }
        if token.len() > 4 && token.ends_with("ies") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if token.len() > 4
            && (token.ends_with("sses")
                || token.ends_with("shes")
                || token.ends_with("ches")
                || token.ends_with("xes")
                || token.ends_with("zes"))
        {
            return token[..token.len() - 2].to_string();
        }
        if token.len() > 3
            && token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return token[..token.len() - 1].to_string();
        }
        token.to_string()
    }

    fn lemmatize_verb(&self, token: &str) -> String {
        if let Some(base) = self.irregular_verbs.get(token) {
            return base.clone();
        }
        if token.len() > 4 && token.ends_with("ies") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if token.len() > 4 && token.ends_with("ied") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if token.len() > 4 && token.ends_with("ing") {
            let stem = &token[..token.len() - 3];
            if has_vowel(stem) && stem.len() >= 2 {
                return finalize_stem(stem);
            }
        }
        if token.len() > 3 && token.ends_with("ed") {
            let stem = &token[..token.len() - 2];
            if has_vowel(stem) && stem.len() >= 2 {
                return finalize_stem(stem);
            }
        }
        if token.len() > 4
            && (token.ends_with("sses")
                || token.ends_with("shes")
                || token.ends_with("ches")
                || token.ends_with("xes")
                || token.ends_with("zes"))
        {
            return token[..token.len() - 2].to_string();
        }
        if token.len() > 3
            && token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return token[..token.len() - 1].to_string();
        }
        token.to_string()
    }

    fn lemmatize_adjective(&self, token: &str) -> String {
        if let Some(base) = self.irregular_adjectives.get(token) {
            return base.clone();
        }
        if token.len() > 4 && token.ends_with("iest") {
            return format!("{}y", &token[..token.len() - 4]);
        }
        if token.len() > 4 && token.ends_with("ier") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if token.len() > 4 && token.ends_with("est") {
            let stem = &token[..token.len() - 3];
            if has_vowel(stem) && stem.len() >= 3 {
                return finalize_stem(stem);
            }
        }
        token.to_string()
    }
}

/// Undouble a trailing consonant (except l/s/z) and restore a final 'e'
/// after a short consonant-vowel-consonant stem, in the manner of the
/// Porter stemmer's cleanup steps.
fn finalize_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !is_vowel(bytes[n - 1]) {
        let last = bytes[n - 1];
        if last != b'l' && last != b's' && last != b'z' {
            return stem[..n - 1].to_string();
        }
        return stem.to_string();
    }
    if ends_cvc(stem) {
        return format!("{}e", stem);
    }
    stem.to_string()
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(s: &str) -> bool {
    s.bytes().any(is_vowel)
}

/// Consonant-vowel-consonant ending where the final consonant is not
/// w, x or y. Marks stems like "mak" that lost a silent 'e'.
fn ends_cvc(s: &str) -> bool {
    let b = s.as_bytes();
    let n = b.len();
    if n < 3 {
        return false;
    }
    !is_vowel(b[n - 3])
        && is_vowel(b[n - 2])
        && !is_vowel(b[n - 1])
        && !matches!(b[n - 1], b'w' | b'x' | b'y')
}

/// One-time-initialized resource bundle passed by reference into the
/// normalizer.
#[derive(Debug, Clone)]
pub struct LanguageResources {
    stop_words: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl LanguageResources {
    /// Build from the snapshot embedded in the crate. Infallible.
    pub fn embedded() -> Self {
        LanguageResources {
            stop_words: STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            lemmatizer: Lemmatizer::from_pairs(
                IRREGULAR_VERBS,
                IRREGULAR_NOUNS,
                IRREGULAR_ADJECTIVES,
            ),
        }
    }

    /// Load a stop-word list from a file (one word per line), retrying the
    /// read once before giving up. Lemma tables come from the embedded
    /// snapshot.
    pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).or_else(|first| {
            log::warn!(
                "Failed to read stop-word list {} ({}), retrying once",
                path.display(),
                first
            );
            std::fs::read_to_string(path)
        });
        let content = content.map_err(|_| PipelineError::ResourceUnavailable {
            resource: path.display().to_string(),
        })?;

        let stop_words: HashSet<String> = content
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        if stop_words.is_empty() {
            return Err(PipelineError::ResourceUnavailable {
                resource: format!("{} (empty stop-word list)", path.display()),
            });
        }

        Ok(LanguageResources {
            stop_words,
            lemmatizer: Lemmatizer::from_pairs(
                IRREGULAR_VERBS,
                IRREGULAR_NOUNS,
                IRREGULAR_ADJECTIVES,
            ),
        })
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}

/// Tag a lowercase token with a coarse category from suffix shape.
/// Defaults to noun, matching the fallback of a WordNet-style tagger.
pub fn tag_token(token: &str) -> PosTag {
    if token.len() > 3 && token.ends_with("ly") {
        return PosTag::Adverb;
    }
    if token.len() > 4 && (token.ends_with("ing") || token.ends_with("ied")) {
        return PosTag::Verb;
    }
    if token.len() > 4 && token.ends_with("ed") {
        return PosTag::Verb;
    }
    if token.len() > 4
        && (token.ends_with("ous")
            || token.ends_with("ful")
            || token.ends_with("ive")
            || token.ends_with("less")
            || token.ends_with("able")
            || token.ends_with("ible")
            || token.ends_with("est")
            || token.ends_with("ier")
            || token.ends_with("iest"))
    {
        return PosTag::Adjective;
    }
    PosTag::Noun
}

/// Cleaning, tokenization, stop-word removal and POS-aware lemmatization
/// for one message at a time.
pub struct TextNormalizer {
    resources: LanguageResources,
    url_pattern: Regex,
    email_pattern: Regex,
    digit_pattern: Regex,
    non_alpha_pattern: Regex,
    whitespace_pattern: Regex,
}

impl TextNormalizer {
    pub fn new(resources: LanguageResources) -> Self {
        TextNormalizer {
            resources,
            url_pattern: Regex::new(r"(https?://\S+|www\.\S+)").unwrap(),
            email_pattern: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
            digit_pattern: Regex::new(r"\d+").unwrap(),
            non_alpha_pattern: Regex::new(r"[^a-zA-Z\s]").unwrap(),
            whitespace_pattern: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Full cleaning, tokenization and lemmatization of one raw message.
    ///
    /// Never returns an empty string: if every token is filtered out the
    /// reserved placeholder is returned instead.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = raw.to_lowercase();
        let cleaned = self.url_pattern.replace_all(&cleaned, " ");
        let cleaned = self.email_pattern.replace_all(&cleaned, " ");
        let cleaned = self.digit_pattern.replace_all(&cleaned, " ");
        let cleaned = self.non_alpha_pattern.replace_all(&cleaned, " ");
        let cleaned = self.whitespace_pattern.replace_all(&cleaned, " ");
        let cleaned = cleaned.trim();

        let tokens: Vec<&str> = cleaned
            .split(' ')
            .filter(|t| t.len() > 1 && !self.resources.is_stop_word(t))
            .collect();
        if tokens.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        // Lemmatization can produce new stop-word forms ("was" -> "be"),
        // hence the second filter pass.
        let lemmatizer = self.resources.lemmatizer();
        let normalized: Vec<String> = tokens
            .iter()
            .map(|t| lemmatizer.lemmatize(t, tag_token(t)))
            .filter(|t| !self.resources.is_stop_word(t))
            .collect();

        if normalized.is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            normalized.join(" ")
        }
    }
}
