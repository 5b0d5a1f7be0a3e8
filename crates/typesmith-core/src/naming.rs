//! Naming convention utilities for code generation.
//!
//! This module turns raw labels from a schema (JSON keys, enum case
//! strings, proposed type names) into style-correct identifier
//! candidates. Collision handling lives in [`crate::namer`]; this
//! module is purely string-in, string-out.
//!
//! # Pipeline
//!
//! | Stage | Function | Example |
//! |-------|----------|---------|
//! | split | [`split_into_words`] | `"next_evolution"` → `next`, `evolution` |
//! | style | [`WordStyle::apply`] | `NextEvolution` / `next_evolution` |
//! | legalize | [`Legalizer::legalize`] | `"10KM"` → `"The10KM"` |

/// One word extracted from a raw label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Acronym words keep their casing intact under styles that
    /// request it (`HTTPResponse` → `HTTP` + `Response`).
    pub is_acronym: bool,
}

impl Word {
    fn plain(text: impl Into<String>) -> Word {
        Word {
            text: text.into(),
            is_acronym: false,
        }
    }

    fn acronym(text: impl Into<String>) -> Word {
        Word {
            text: text.into(),
            is_acronym: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_ascii_digit() {
        CharClass::Digit
    } else {
        CharClass::Other
    }
}

/// Split a raw label into words.
///
/// Word boundaries are: runs of non-identifier characters, a
/// lowercase-to-uppercase transition, and the acronym boundary (in an
/// uppercase run followed by lowercase, the last uppercase letter
/// starts the next word). An all-uppercase run of two or more letters
/// is an acronym; so is a digit run, and so is a lowercase run
/// directly following a digit run (`"10 km"` → `10`, `KM`-styled
/// `km`).
///
/// An input with no identifier characters at all yields the single
/// placeholder word `empty`.
pub fn split_into_words(label: &str) -> Vec<Word> {
    // Maximal runs of one character class.
    let mut runs: Vec<(CharClass, String)> = Vec::new();
    for c in label.chars() {
        let class = classify(c);
        match runs.last_mut() {
            Some((last, text)) if *last == class => text.push(c),
            _ => runs.push((class, c.to_string())),
        }
    }

    let mut words: Vec<Word> = Vec::new();
    let mut previous_digit_run = false;
    let mut i = 0;
    while i < runs.len() {
        let (class, text) = &runs[i];
        match class {
            CharClass::Other => {
                i += 1;
                continue;
            }
            CharClass::Digit => {
                words.push(Word::acronym(text.clone()));
                previous_digit_run = true;
                i += 1;
                continue;
            }
            CharClass::Lower => {
                // A bare unit suffix after a number reads as an
                // acronym: "10 km" styles to The10KM.
                if previous_digit_run {
                    words.push(Word::acronym(text.clone()));
                } else {
                    words.push(Word::plain(text.clone()));
                }
            }
            CharClass::Upper => {
                let followed_by_lower = matches!(runs.get(i + 1), Some((CharClass::Lower, _)));
                let letters: Vec<char> = text.chars().collect();
                if followed_by_lower {
                    // The last uppercase letter starts the next word.
                    if letters.len() > 1 {
                        let head: String = letters[..letters.len() - 1].iter().collect();
                        words.push(Word::acronym(head));
                    }
                    let (_, lower) = &runs[i + 1];
                    let mut tail = letters[letters.len() - 1].to_string();
                    tail.push_str(lower);
                    words.push(Word::plain(tail));
                    previous_digit_run = false;
                    i += 2;
                    continue;
                }
                if letters.len() > 1 {
                    words.push(Word::acronym(text.clone()));
                } else {
                    words.push(Word::plain(text.clone()));
                }
            }
        }
        previous_digit_run = false;
        i += 1;
    }

    if words.is_empty() {
        words.push(Word::plain("empty"));
    }
    words
}

/// Casing applied to a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCase {
    AllLower,
    AllUpper,
    Capitalized,
}

impl WordCase {
    fn apply(self, word: &str) -> String {
        match self {
            WordCase::AllLower => word.to_lowercase(),
            WordCase::AllUpper => word.to_uppercase(),
            WordCase::Capitalized => {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                }
            }
        }
    }
}

/// A word-joining style: per-slot casing plus a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordStyle {
    pub first_word: WordCase,
    pub rest_words: WordCase,
    /// Casing for words classified as acronyms, in any position.
    pub acronyms: WordCase,
    pub separator: &'static str,
}

impl WordStyle {
    pub fn pascal() -> WordStyle {
        WordStyle {
            first_word: WordCase::Capitalized,
            rest_words: WordCase::Capitalized,
            acronyms: WordCase::AllUpper,
            separator: "",
        }
    }

    pub fn camel() -> WordStyle {
        WordStyle {
            first_word: WordCase::AllLower,
            rest_words: WordCase::Capitalized,
            acronyms: WordCase::AllUpper,
            separator: "",
        }
    }

    pub fn snake() -> WordStyle {
        WordStyle {
            first_word: WordCase::AllLower,
            rest_words: WordCase::AllLower,
            acronyms: WordCase::AllLower,
            separator: "_",
        }
    }

    pub fn screaming_snake() -> WordStyle {
        WordStyle {
            first_word: WordCase::AllUpper,
            rest_words: WordCase::AllUpper,
            acronyms: WordCase::AllUpper,
            separator: "_",
        }
    }

    /// Whether styled output leads with an uppercase letter; decides
    /// the casing of escape prefixes and fallback words.
    pub fn is_upper(&self) -> bool {
        matches!(self.first_word, WordCase::AllUpper | WordCase::Capitalized)
    }

    pub fn apply(&self, words: &[Word]) -> String {
        let mut styled: Vec<String> = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let case = if word.is_acronym {
                self.acronyms
            } else if i == 0 {
                self.first_word
            } else {
                self.rest_words
            };
            styled.push(case.apply(&word.text));
        }
        styled.join(self.separator)
    }

    /// Split, style, and legalize a raw label in one step.
    pub fn name_from(&self, label: &str, legal: &Legalizer) -> String {
        legal.legalize(&self.apply(&split_into_words(label)), self.is_upper())
    }
}

/// Target-language identifier legality rules.
#[derive(Debug, Clone, Copy)]
pub struct Legalizer {
    /// Whether a codepoint may start an identifier.
    pub is_start: fn(char) -> bool,
    /// Whether a codepoint may appear after the first position.
    pub is_part: fn(char) -> bool,
}

impl Legalizer {
    /// ASCII letters and underscore to start; letters, digits, and
    /// underscore afterwards. Fits Ruby, and most curly-brace targets.
    pub fn ascii() -> Legalizer {
        Legalizer {
            is_start: |c| c.is_ascii_alphabetic() || c == '_',
            is_part: |c| c.is_ascii_alphanumeric() || c == '_',
        }
    }

    /// Replace illegal characters, escape an illegal start with a
    /// `the`/`The` prefix, and fall back to `empty` for a blank
    /// result.
    pub fn legalize(&self, styled: &str, upper: bool) -> String {
        let cleaned: String = styled
            .chars()
            .map(|c| if (self.is_part)(c) { c } else { '_' })
            .collect();
        if cleaned.is_empty() {
            return if upper { "Empty".to_string() } else { "empty".to_string() };
        }
        let first = cleaned.chars().next().unwrap_or('_');
        if (self.is_start)(first) {
            cleaned
        } else if upper {
            format!("The{cleaned}")
        } else {
            format!("the_{cleaned}")
        }
    }
}
