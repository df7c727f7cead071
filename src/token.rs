use std::fmt;

/// Symbols a token digit can take, in counting order.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A short substitute string standing in for one rule, e.g. `<1f>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Returns the token text, brackets included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for allocated tokens.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Allocates unique tokens in sequence, never reusing one.
///
/// Works as a mixed-radix counter over a 62-symbol alphabet of digits, then
/// lowercase, then uppercase letters: `<0>` .. `<Z>`, then `<00>` .. `<ZZ>`,
/// then `<000>` and so on. The digit vector grows whenever a carry runs off
/// the most significant digit, so allocation never exhausts.
#[derive(Debug, Clone)]
pub struct TokenAllocator {
    /// Alphabet positions, least significant digit first.
    digits: Vec<u8>,
}

impl TokenAllocator {
    /// Creates an allocator whose current token is `<0>`.
    pub fn new() -> Self {
        Self { digits: vec![0] }
    }

    /// Returns the most recently issued token without advancing.
    pub fn current(&self) -> Token {
        let mut text = String::with_capacity(self.digits.len() + 2);
        text.push('<');
        text.extend(self.digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
        text.push('>');
        Token(text)
    }

    /// Advances the counter and returns the new token.
    pub fn allocate(&mut self) -> Token {
        let radix = ALPHABET.len() as u8;
        let mut position = 0;
        loop {
            if position == self.digits.len() {
                // Carry ran past the most significant digit
                self.digits.push(0);
                break;
            }
            self.digits[position] += 1;
            if self.digits[position] < radix {
                break;
            }
            self.digits[position] = 0;
            position += 1;
        }
        self.current()
    }

    /// Number of digits in the current token.
    pub fn width(&self) -> usize {
        self.digits.len()
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for TokenAllocator {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        Some(self.allocate())
    }
}
