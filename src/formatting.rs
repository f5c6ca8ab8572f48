/*!
 * Line-break formatting for in-game display strings.
 *
 * Inserts the target platform's literal in-string newline sequence after
 * sentence-terminating punctuation so long strings wrap at sentence
 * boundaries, with a lookahead exception for quoted clauses.
 */

/// Punctuation and escape rules for a target language/platform pair.
#[derive(Debug, Clone)]
pub struct BreakRules {
    /// Sentence-terminating punctuation mark
    pub terminator: char,

    /// Character that suppresses a break when it immediately follows the
    /// terminator (the sentence closes a quoted clause)
    pub quote: char,

    /// Literal sequence the target runtime renders as a line break
    pub escape: String,
}

impl BreakRules {
    /// Rules for a target language, with the platform's escape sequence
    pub fn for_language(code: &str, escape: impl Into<String>) -> Self {
        let terminator = if crate::language_utils::uses_ideographic_punctuation(code) {
            '。'
        } else {
            '.'
        };
        Self {
            terminator,
            quote: '"',
            escape: escape.into(),
        }
    }
}

/// Applies `BreakRules` to display strings.
#[derive(Debug, Clone)]
pub struct BreakFormatter {
    rules: BreakRules,
}

impl BreakFormatter {
    /// Create a formatter with the given rules
    pub fn new(rules: BreakRules) -> Self {
        Self { rules }
    }

    /// Insert the escape sequence after every sentence terminator, except
    /// when the next character is a double quote. A terminator at the end of
    /// the string inserts normally. Re-running on already-formatted text is
    /// a no-op: an escape already in place is never doubled.
    pub fn format_breaks(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            rest = &rest[c.len_utf8()..];
            out.push(c);

            if c != self.rules.terminator {
                continue;
            }
            if rest.starts_with(self.rules.quote) {
                continue;
            }
            if rest.starts_with(self.rules.escape.as_str()) {
                continue;
            }
            out.push_str(&self.rules.escape);
        }

        out
    }
}
