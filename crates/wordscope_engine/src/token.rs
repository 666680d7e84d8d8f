use std::sync::Once;

use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// UAX #29 word segmentation; punctuation and whitespace never become tokens.
///
/// Han text segments into single ideographs, which the default length policy
/// then drops; [`HanSegmentingTokenizer`] handles it.
#[derive(Debug, Clone, Copy)]
pub struct UnicodeWordTokenizer {
    lowercase: bool,
}

impl UnicodeWordTokenizer {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }
}

impl Default for UnicodeWordTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| fold_case(word, self.lowercase))
            .collect()
    }
}

static SEGMENTER_DICTIONARY: Once = Once::new();

/// UAX #29 words, except that runs of Han ideographs go through the
/// `chinese_segmenter` dictionary so `文本分析` yields `文本`, `分析`.
#[derive(Debug, Clone, Copy)]
pub struct HanSegmentingTokenizer {
    lowercase: bool,
}

impl HanSegmentingTokenizer {
    pub fn new(lowercase: bool) -> Self {
        SEGMENTER_DICTIONARY.call_once(|| {
            chinese_segmenter::initialize();
        });
        Self { lowercase }
    }

    fn flush_han(run: &mut String, tokens: &mut Vec<String>) {
        if run.is_empty() {
            return;
        }
        tokens.extend(
            chinese_segmenter::tokenize(run.as_str())
                .into_iter()
                .map(|word| word.to_string()),
        );
        run.clear();
    }
}

impl Default for HanSegmentingTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for HanSegmentingTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut han_run = String::new();
        for segment in text.split_word_bounds() {
            if segment.chars().all(is_han) {
                han_run.push_str(segment);
                continue;
            }
            // Punctuation and spaces end a run, so words never span sentences.
            Self::flush_han(&mut han_run, &mut tokens);
            if segment.chars().any(char::is_alphanumeric) {
                tokens.push(fold_case(segment, self.lowercase));
            }
        }
        Self::flush_han(&mut han_run, &mut tokens);
        tokens
    }
}

/// CJK Unified Ideographs, extensions A and B, and the compatibility block.
fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{F900}'..='\u{FAFF}'
    )
}

fn fold_case(word: &str, lowercase: bool) -> String {
    if lowercase {
        word.to_lowercase()
    } else {
        word.to_string()
    }
}

/// Splits on whitespace only; punctuation stays attached to words.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}
