//! A module implementing lexical analysis (tokenization) for the babble language.

use std::fmt;

/// Reserved words of the language.
///
/// Keywords are recognized by exact text match before a word is ever
/// considered as a loop variable or a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Opens a loop, `for`.
    For,
    /// Separates the loop variable from its bound, `to`.
    To,
    /// Opens the loop body, `do`.
    Do,
    /// Closes the loop body, `end`.
    End,
    /// Pauses for a number of milliseconds, `sleep`.
    Sleep,
    /// Prints a random pseudo-word, `random`.
    Random,
}

impl Keyword {
    /// Returns the keyword spelled by `word`, if any.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "for" => Some(Keyword::For),
            "to" => Some(Keyword::To),
            "do" => Some(Keyword::Do),
            "end" => Some(Keyword::End),
            "sleep" => Some(Keyword::Sleep),
            "random" => Some(Keyword::Random),
            _ => None,
        }
    }

    /// The source spelling of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::For => "for",
            Keyword::To => "to",
            Keyword::Do => "do",
            Keyword::End => "end",
            Keyword::Sleep => "sleep",
            Keyword::Random => "random",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// One of the reserved words.
    Keyword(Keyword),
    /// Any other word: a loop variable, a number or literal text.
    Word(String),
}

impl Token {
    /// Classifies a single lowercase word.
    pub fn from_word(word: &str) -> Self {
        match Keyword::from_word(word) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Word(word.to_string()),
        }
    }

    /// The source text of the token.
    pub fn text(&self) -> &str {
        match self {
            Token::Keyword(keyword) => keyword.as_str(),
            Token::Word(word) => word,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Splits `line` into tokens.
///
/// The input is case-folded to lowercase and split on any run of whitespace.
/// There are no quotes or escapes, so lexing cannot fail.
pub fn split_into_tokens(line: &str) -> Vec<Token> {
    line.to_lowercase()
        .split_whitespace()
        .map(Token::from_word)
        .collect()
}

/// Joins command-line arguments into one program line.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| arg.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_keywords_and_words() {
        let tokens = split_into_tokens("for i to 3 do i end");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::For),
                word("i"),
                Token::Keyword(Keyword::To),
                word("3"),
                Token::Keyword(Keyword::Do),
                word("i"),
                Token::Keyword(Keyword::End),
            ]
        );
    }

    #[test]
    fn test_case_folding() {
        let tokens = split_into_tokens("SLEEP 10 Random HeLLo");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Sleep),
                word("10"),
                Token::Keyword(Keyword::Random),
                word("hello"),
            ]
        );
    }

    #[test]
    fn test_whitespace_runs_and_empty_input() {
        assert_eq!(split_into_tokens("  abc \t\n def  "), vec![word("abc"), word("def")]);
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens("   \t ").is_empty());
    }

    #[test]
    fn test_keyword_prefix_is_a_word() {
        // only exact matches are keywords
        assert_eq!(split_into_tokens("format ending"), vec![word("format"), word("ending")]);
    }

    #[test]
    fn test_join_args() {
        assert_eq!(join_args(&["for", "i", "to", "2"]), "for i to 2");
        assert_eq!(join_args::<&str>(&[]), "");
    }

    #[test]
    fn test_keyword_round_trip_spelling() {
        for keyword in [
            Keyword::For,
            Keyword::To,
            Keyword::Do,
            Keyword::End,
            Keyword::Sleep,
            Keyword::Random,
        ] {
            assert_eq!(Keyword::from_word(keyword.as_str()), Some(keyword));
        }
    }
}
