use crate::error::ParserError;
use std::{iter::Peekable, str::CharIndices};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Token<'input> {
    Identifier(&'input str),
    Integer(i64),
    Float(f64),
    String(&'input str),
    And,
    Or,
    Not,
    In,
    One,
    None,
    All,
    Of,
    WithinFrequencyCap,
    SegmentWithin,
    SegmentBefore,
    GeoWithinRadius,
    Contains,
    StartsWith,
    EndsWith,
    LeftParenthesis,
    RightParenthesis,
    LeftBracket,
    RightBracket,
    Comma,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equal,
    NotEqual,
}

pub type Spanned<'input> = Result<(usize, Token<'input>, usize), ParserError>;

/// Hand-written lexer feeding the generated parser with spanned tokens.
pub struct Lexer<'input> {
    input: &'input str,
    chars: Peekable<CharIndices<'input>>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn string(&mut self, start: usize, quote: char) -> Spanned<'input> {
        for (position, character) in self.chars.by_ref() {
            if character == quote {
                return Ok((start, Token::String(&self.input[start + 1..position]), position + 1));
            }
        }
        Err(ParserError::UnterminatedString { position: start })
    }

    fn number(&mut self, start: usize) -> Spanned<'input> {
        let mut end = start + 1;
        let mut is_float = false;
        while let Some((position, character)) = self.chars.peek().copied() {
            if character.is_ascii_digit() || (character == '.' && !is_float) {
                is_float |= character == '.';
                self.chars.next();
                end = position + character.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.input[start..end];
        if is_float {
            text.parse()
                .map(|value| (start, Token::Float(value), end))
                .map_err(|_| ParserError::InvalidNumber { position: start })
        } else {
            text.parse()
                .map(|value| (start, Token::Integer(value), end))
                .map_err(|_| ParserError::InvalidNumber { position: start })
        }
    }

    fn identifier(&mut self, start: usize) -> Spanned<'input> {
        let mut end = start + 1;
        while let Some((position, character)) = self.chars.peek().copied() {
            if character.is_ascii_alphanumeric() || character == '_' {
                self.chars.next();
                end = position + character.len_utf8();
            } else {
                break;
            }
        }
        let token = match &self.input[start..end] {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "in" => Token::In,
            "one" => Token::One,
            "none" => Token::None,
            "all" => Token::All,
            "of" => Token::Of,
            "within_frequency_cap" => Token::WithinFrequencyCap,
            "segment_within" => Token::SegmentWithin,
            "segment_before" => Token::SegmentBefore,
            "geo_within_radius" => Token::GeoWithinRadius,
            "contains" => Token::Contains,
            "starts_with" => Token::StartsWith,
            "ends_with" => Token::EndsWith,
            identifier => Token::Identifier(identifier),
        };
        Ok((start, token, end))
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (position, character) = self.chars.next()?;
            let simple = |token| Some(Ok((position, token, position + 1)));
            return match character {
                character if character.is_whitespace() => continue,
                '(' => simple(Token::LeftParenthesis),
                ')' => simple(Token::RightParenthesis),
                '[' => simple(Token::LeftBracket),
                ']' => simple(Token::RightBracket),
                ',' => simple(Token::Comma),
                '=' => simple(Token::Equal),
                '<' => match self.chars.peek() {
                    Some((_, '=')) => {
                        self.chars.next();
                        Some(Ok((position, Token::LessThanEqual, position + 2)))
                    }
                    Some((_, '>')) => {
                        self.chars.next();
                        Some(Ok((position, Token::NotEqual, position + 2)))
                    }
                    _ => simple(Token::LessThan),
                },
                '>' => match self.chars.peek() {
                    Some((_, '=')) => {
                        self.chars.next();
                        Some(Ok((position, Token::GreaterThanEqual, position + 2)))
                    }
                    _ => simple(Token::GreaterThan),
                },
                '"' | '\'' => Some(self.string(position, character)),
                '-' => match self.chars.peek() {
                    Some((_, character)) if character.is_ascii_digit() => {
                        Some(self.number(position))
                    }
                    _ => Some(Err(ParserError::InvalidToken { position })),
                },
                character if character.is_ascii_digit() => Some(self.number(position)),
                character if character.is_ascii_alphabetic() || character == '_' => {
                    Some(self.identifier(position))
                }
                _ => Some(Err(ParserError::InvalidToken { position })),
            };
        }
    }
}
