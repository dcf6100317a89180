// src/matching/name.rs - Display name normalization
//
// Names are canonicalized through an ordered rule pipeline. Legal-form
// suffixes carry no signal and are dropped; descriptors such as
// "productions" are shortened to a token so "Foo Productions" and
// "Foo Entertainment" stay distinguishable.
use once_cell::sync::Lazy;
use regex::Regex;

/// One rewrite step in the normalization pipeline.
#[derive(Debug)]
pub struct NormalizationRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl NormalizationRule {
    /// Matches `word` only as a whole word preceded by whitespace, so the
    /// first word of a name is never rewritten.
    fn trailing_word(name: &'static str, word: &str, replacement: &'static str) -> Self {
        let pattern = Regex::new(&format!(r"\s+(?:{})\b", word)).expect("normalization rule regex");
        Self {
            name,
            pattern,
            replacement,
        }
    }

    pub fn apply(&self, input: &str) -> String {
        self.pattern.replace_all(input, self.replacement).into_owned()
    }
}

/// Legal-form suffixes removed outright.
const LEGAL_SUFFIXES: [&str; 5] = ["ltd", "limited", "gmbh", "inc", "llc"];

/// Descriptors shortened to a distinguishing token.
const DESCRIPTOR_TOKENS: [(&str, &str); 4] = [
    ("productions?", " prod"),
    ("international", " intl"),
    ("corporation", " corp"),
    ("entertainment", " enm"),
];

pub static NORMALIZATION_RULES: Lazy<Vec<NormalizationRule>> = Lazy::new(|| {
    let mut rules = Vec::with_capacity(LEGAL_SUFFIXES.len() + DESCRIPTOR_TOKENS.len());
    for suffix in LEGAL_SUFFIXES {
        rules.push(NormalizationRule::trailing_word(suffix, suffix, ""));
    }
    for (word, token) in DESCRIPTOR_TOKENS {
        rules.push(NormalizationRule::trailing_word(word, word, token));
    }
    rules
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

pub fn normalize_name(name: &str) -> String {
    let mut normalized = name.to_lowercase().replace('.', "");
    for rule in NORMALIZATION_RULES.iter() {
        normalized = rule.apply(&normalized);
    }
    WHITESPACE_RUN
        .replace_all(normalized.trim(), " ")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_legal_suffixes_are_dropped() {
        assert_eq!(normalize_name("Working Title Films Ltd."), "working title films");
        assert_eq!(normalize_name("Constantin Film GmbH"), "constantin film");
        assert_eq!(normalize_name("Hammer Film Limited"), "hammer film");
        assert_eq!(normalize_name("A24 Films LLC"), "a24 films");
    }

    #[test]
    fn test_descriptors_become_tokens() {
        assert_eq!(normalize_name("Amblin Entertainment"), "amblin enm");
        assert_eq!(normalize_name("Carolco International"), "carolco intl");
        assert_eq!(normalize_name("Orion Pictures Corporation"), "orion pictures corp");
        assert_eq!(normalize_name("Toho Production"), "toho prod");
        assert_eq!(normalize_name("Jim Henson Productions"), "jim henson prod");
    }

    #[test]
    fn test_descriptor_variants_collapse_together() {
        assert_eq!(
            normalize_name("Gaumont Productions Ltd"),
            normalize_name("Gaumont Production")
        );
        assert_ne!(normalize_name("Gaumont Productions"), normalize_name("Gaumont"));
    }

    #[test]
    fn test_periods_and_case() {
        assert_eq!(normalize_name("M.G.M."), "mgm");
        assert_eq!(normalize_name("  Studio   Canal  "), "studio canal");
        assert_eq!(normalize_name("Universal Pictures"), "universal pictures");
    }

    #[test]
    fn test_only_whole_trailing_words_match() {
        // first word is kept, partial words are kept
        assert_eq!(normalize_name("Limited Run Films"), "limited run films");
        assert_eq!(normalize_name("Globo Ltda"), "globo ltda");
        assert_eq!(normalize_name("Interscope Communications"), "interscope communications");
        assert_eq!(normalize_name("Foo ltdltd"), "foo ltdltd");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let names = [
            "Working Title Films Ltd.",
            "Foo ltd ltd",
            "Foo Ltd.Ltd",
            "Bar Entertainment International Corporation",
            "Baz Productions Production",
            "Limited",
            "X . GmbH",
            "",
            "   ",
            "ÉCLAIR PRODUCTIONS",
            "Walt Disney Pictures",
        ];
        for name in names {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_rules_are_ordered_and_named() {
        let names: Vec<&str> = NORMALIZATION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.first(), Some(&"ltd"));
        assert_eq!(names.last(), Some(&"entertainment"));
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_random_names_normalize_idempotently() {
        const WORDS: [&str; 18] = [
            "Ltd", "Limited", "GmbH", "Inc.", "LLC", "Production", "Productions", "International",
            "Corporation", "Entertainment", "Pixar", "Walt", "Disney", "Films", "M.G.M.", "Éclair",
            "Co.,", "",
        ];
        const SEPARATORS: [&str; 5] = [" ", "  ", ".", ". ", "\t"];

        let mut rng = StdRng::seed_from_u64(3);
        for round in 0..500 {
            let count = rng.gen_range(1..7);
            let mut name = String::new();
            for i in 0..count {
                if i > 0 {
                    name.push_str(SEPARATORS.choose(&mut rng).unwrap());
                }
                name.push_str(WORDS.choose(&mut rng).unwrap());
            }

            let once = normalize_name(&name);
            assert_eq!(normalize_name(&once), once, "round {}: {:?}", round, name);
        }
    }
}
