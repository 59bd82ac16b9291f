use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // The stop-word set documentation generators apply to English text.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into",
            "is", "it", "near", "no", "not", "of", "on", "or", "such", "that", "the",
            "their", "then", "there", "these", "they", "this", "to", "was", "will", "with",
        ];
        words.iter().copied().collect()
    };
}

/// Normalize text into index terms: NFKC fold, lowercase, word extraction
/// (a letter followed by letters/digits/underscore/apostrophe), stop-word
/// removal, Snowball stemming. Indexing and query parsing share this
/// pipeline so stored and queried terms agree.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|token| !STOPWORDS.contains(token))
        .map(|token| STEMMER.stem(token).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_and_drops_stopwords() {
        let terms = tokenize("Computing the NDVI of masked tiles");
        assert_eq!(terms, vec!["comput", "ndvi", "mask", "tile"]);
    }

    #[test]
    fn folds_compatibility_forms_and_case() {
        // fullwidth letters fold to ASCII under NFKC
        let terms = tokenize("ＮＤＶＩ Raster");
        assert_eq!(terms, vec!["ndvi", "raster"]);
    }

    #[test]
    fn possessives_collapse_to_the_stem() {
        let terms = tokenize("RasterFrames-Scala's documentation");
        assert_eq!(terms, vec!["rasterfram", "scala", "document"]);
    }

    #[test]
    fn purely_numeric_tokens_are_skipped() {
        assert!(tokenize("42 2048 3.14").is_empty());
    }
}
