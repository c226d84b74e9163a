//! Offline extractive answering by keyword overlap.

use crate::extract::AnswerExtractor;
use faqbot_core::{AppError, AppResult};
use std::collections::HashSet;

/// Question words that carry no topic.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "was", "were", "how", "what", "when", "where", "which", "who",
    "why", "does", "can", "could", "would", "should", "will", "your", "you", "our", "have", "has",
    "this", "that", "with", "from", "about", "into", "there", "their", "please", "provide",
    "more", "details", "tell",
];

/// Line prefixes that label FAQ entries.
const LABELS: &[&str] = &["q", "a", "question", "answer"];

/// Picks the context sentence that shares the most question terms.
///
/// Terms are weighted by length so specific words ("password") outrank short
/// generic ones. Sentences that are themselves questions are only used when
/// the context has nothing else, which keeps "Q: ..." lines of an FAQ from
/// being echoed back as the answer.
#[derive(Debug, Default, Clone)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    fn best_sentence<'c>(&self, question: &str, context: &'c str) -> Option<&'c str> {
        let terms = key_terms(question);
        let sentences = split_sentences(context);

        let statements: Vec<&str> = sentences
            .iter()
            .copied()
            .filter(|s| !s.ends_with('?'))
            .collect();
        let candidates = if statements.is_empty() {
            sentences
        } else {
            statements
        };

        let mut best: Option<(&str, usize)> = None;
        for sentence in candidates {
            let score = overlap_score(&terms, sentence);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((sentence, score)),
            }
        }

        best.map(|(sentence, _)| sentence)
    }
}

#[async_trait::async_trait]
impl AnswerExtractor for KeywordExtractor {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn extract(&self, question: &str, context: &str) -> AppResult<String> {
        self.best_sentence(question, context)
            .map(str::to_string)
            .ok_or_else(|| AppError::Extraction("Context contains no sentences".to_string()))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn key_terms(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(question)
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

fn overlap_score(terms: &[String], sentence: &str) -> usize {
    let sentence_words: HashSet<String> = words(sentence).collect();
    terms
        .iter()
        .filter(|term| sentence_words.contains(*term))
        .map(|term| term.chars().count())
        .sum()
}

fn strip_label(line: &str) -> &str {
    match line.split_once(':') {
        Some((label, rest)) if LABELS.contains(&label.trim().to_lowercase().as_str()) => rest.trim(),
        _ => line,
    }
}

/// Split context into sentences, one line at a time.
fn split_sentences(context: &str) -> Vec<&str> {
    let mut sentences = Vec::new();

    for line in context.lines() {
        let line = strip_label(line.trim());
        let mut start = 0;
        let mut chars = line.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                let sentence = line[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }

        let rest = line[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
    }

    sentences
}
