//! Integration tests for the text normalizer.

use spamsieve::error::PipelineError;
use spamsieve::normalize::{LanguageResources, TextNormalizer, EMPTY_PLACEHOLDER};

fn normalizer() -> TextNormalizer {
    TextNormalizer::new(LanguageResources::embedded())
}

// ---------------------------------------------------------------------------
// Cleaning steps
// ---------------------------------------------------------------------------

#[test]
fn normalize_lowercases_and_strips_noise() {
    let n = normalizer();
    let out = n.normalize("URGENT!! Verify at http://fake.link or www.scam.example, mail help@scam.example, code 09061");
    assert!(!out.contains("http"), "urls should be stripped: {}", out);
    assert!(!out.contains("www"), "urls should be stripped: {}", out);
    assert!(!out.contains('@'), "emails should be stripped: {}", out);
    assert!(
        !out.chars().any(|c| c.is_ascii_digit()),
        "digits should be stripped: {}",
        out
    );
    assert_eq!(out, out.to_lowercase());
    assert!(out.contains("urgent"));
    assert!(out.contains("verify"));
}

#[test]
fn normalize_collapses_whitespace_and_trims() {
    let n = normalizer();
    let out = n.normalize("  win\t\tprize   money  ");
    assert_eq!(out, "win prize money");
}

#[test]
fn normalize_drops_stop_words_and_short_tokens() {
    let n = normalizer();
    let out = n.normalize("I am a winner of x prizes");
    // "i", "am", "a", "of" are stop-words; "x" is too short
    assert_eq!(out, "winner prize");
}

// ---------------------------------------------------------------------------
// Sentinel placeholder
// ---------------------------------------------------------------------------

#[test]
fn normalize_never_returns_empty_string() {
    let n = normalizer();
    for text in ["", " ", "!!!", "12345", "a I the", ":-) :-("] {
        let out = n.normalize(text);
        assert!(!out.is_empty(), "empty output for input {:?}", text);
        assert_eq!(out, EMPTY_PLACEHOLDER, "input {:?}", text);
    }
}

#[test]
fn placeholder_survives_when_lemmas_become_stop_words() {
    let n = normalizer();
    // "was" is a stop-word and never reaches lemmatization; "been" likewise.
    // A message of only such forms collapses to the placeholder.
    assert_eq!(n.normalize("was been being"), EMPTY_PLACEHOLDER);
}

// ---------------------------------------------------------------------------
// Lemmatization and idempotence
// ---------------------------------------------------------------------------

#[test]
fn normalize_lemmatizes_with_pos_categories() {
    let n = normalizer();
    let out = n.normalize("winning prizes quickly");
    assert_eq!(out, "win prize quickly");
}

#[test]
fn normalize_is_idempotent_on_its_own_output() {
    let n = normalizer();
    for text in [
        "Call me when free",
        "WIN a FREE prize call now 09061",
        "Congratulations! You have won a $500 voucher. Claim now!",
        "stopped running to the shops yesterday",
    ] {
        let once = n.normalize(text);
        let twice = n.normalize(&once);
        assert_eq!(once, twice, "normalize not a fixed point for {:?}", text);
    }
}

// ---------------------------------------------------------------------------
// External stop-word resources
// ---------------------------------------------------------------------------

#[test]
fn stop_words_load_from_a_file() {
    let path = std::env::temp_dir().join("spamsieve_stopwords_test.txt");
    std::fs::write(&path, "foo\nBar\n\nbaz\n").unwrap();

    let resources = LanguageResources::load_stop_words(&path).unwrap();
    assert!(resources.is_stop_word("foo"));
    assert!(resources.is_stop_word("bar"), "entries are lowercased");
    assert!(!resources.is_stop_word("prize"));

    let n = TextNormalizer::new(resources);
    assert_eq!(n.normalize("foo wins baz prizes"), "win prize");

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_stop_word_file_is_resource_unavailable() {
    let err = LanguageResources::load_stop_words("/nonexistent/stopwords.txt").unwrap_err();
    match err {
        PipelineError::ResourceUnavailable { resource } => {
            assert!(
                resource.contains("stopwords.txt"),
                "error should name the resource: {}",
                resource
            );
        }
        other => panic!("expected ResourceUnavailable, got {:?}", other),
    }
}

#[test]
fn empty_stop_word_file_is_resource_unavailable() {
    let path = std::env::temp_dir().join("spamsieve_stopwords_empty_test.txt");
    std::fs::write(&path, "\n   \n").unwrap();

    let err = LanguageResources::load_stop_words(&path).unwrap_err();
    assert!(matches!(err, PipelineError::ResourceUnavailable { .. }));

    std::fs::remove_file(&path).ok();
}

#[test]
fn normalize_is_deterministic() {
    let n = normalizer();
    let text = "URGENT! Your account has been compromised. Verify immediately at http://fake.link";
    let first = n.normalize(text);
    for _ in 0..5 {
        assert_eq!(n.normalize(text), first);
    }
}
