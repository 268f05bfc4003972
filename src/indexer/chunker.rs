use std::collections::VecDeque;

/// Boundaries tried in order: paragraph, line, sentence, word
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Recursive character splitter producing overlapping windows
///
/// Lengths are measured in characters. Every produced chunk is at most
/// `chunk_size` characters long and consecutive chunks share up to
/// `chunk_overlap` characters of trailing context.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter; `chunk_size` is clamped to at least 1 and the overlap
    /// to strictly less than the chunk size
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into chunks; whitespace-only input yields no chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        if char_len(text) <= self.chunk_size {
            return vec![text.trim().to_string()];
        }

        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some(position) = separators.iter().position(|sep| text.contains(sep)) else {
            return self.split_by_chars(text);
        };
        let separator = separators[position];
        let remaining = &separators[position + 1..];

        let mut chunks = Vec::new();
        let mut fitting: Vec<(&str, usize)> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            let len = char_len(piece);
            if len <= self.chunk_size {
                fitting.push((piece, len));
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            chunks.extend(self.split_recursive(piece, remaining));
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }

        chunks
    }

    /// Greedily pack pieces into windows, carrying up to `chunk_overlap`
    /// characters of trailing pieces into the next window
    fn merge(&self, pieces: &[(&str, usize)]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0;

        for &(piece, len) in pieces {
            if total + len > self.chunk_size && !window.is_empty() {
                push_joined(&mut chunks, &window);

                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        push_joined(&mut chunks, &window);
        chunks
    }

    /// Last resort for text without any separator
    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<(&str, usize)>) {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split text at a separator while keeping the separator attached to the preceding piece
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        pieces.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(count: usize) -> String {
        (0..count)
            .map(|i| format!("Sentence number {} talks about squats.", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n ").is_empty());
    }

    #[test]
    fn test_short_input_is_single_chunk() {
        let splitter = TextSplitter::new(100, 20);
        assert_eq!(splitter.split("Deadlifts build the posterior chain."), vec![
            "Deadlifts build the posterior chain."
        ]);
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let text = sentences(200);
        for (size, overlap) in [(1000, 200), (120, 30), (50, 10), (17, 5)] {
            let splitter = TextSplitter::new(size, overlap);
            let chunks = splitter.split(&text);
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(
                    chunk.chars().count() <= size,
                    "chunk of {} chars exceeds {}",
                    chunk.chars().count(),
                    size
                );
            }
        }
    }

    #[test]
    fn test_prefers_sentence_boundaries() {
        let splitter = TextSplitter::new(80, 0);
        let text = "Warm up for ten minutes. Then do five sets of five. Finish with mobility work.";
        let chunks = splitter.split(&format!("{} {}", text, text));
        assert!(chunks.len() >= 2);
        assert!(chunks[0].ends_with('.'));
    }

    #[test]
    fn test_overlap_carries_trailing_context() {
        let splitter = TextSplitter::new(60, 30);
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike november oscar papa";
        let chunks = splitter.split(text);
        assert!(chunks.len() >= 2);

        let last_word_of_first = chunks[0].split(' ').last().unwrap();
        assert!(
            chunks[1].contains(last_word_of_first),
            "expected {:?} to start with context from {:?}",
            chunks[1],
            chunks[0]
        );
    }

    #[test]
    fn test_hard_split_without_separators() {
        let splitter = TextSplitter::new(10, 2);
        let text = "a".repeat(35);
        let chunks = splitter.split(&text);

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks[0].len(), 10);
        let covered: usize = chunks.len() * 8 + 2;
        assert!(covered >= 35);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let splitter = TextSplitter::new(5, 0);
        let chunks = splitter.split("\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}");
        assert_eq!(chunks, vec!["\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}", "\u{e9}\u{e9}"]);
    }

    #[test]
    fn test_overlap_is_clamped_below_chunk_size() {
        let splitter = TextSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap(), 9);
        assert!(!splitter.split(&"word ".repeat(20)).is_empty());
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(split_keeping_separator("a. b. c", ". "), vec!["a. ", "b. ", "c"]);
        assert_eq!(split_keeping_separator("a b ", " "), vec!["a ", "b "]);
    }
}
