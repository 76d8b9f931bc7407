//! Lexical scanner for C# source.
//!
//! Produces a typed token stream that the heuristic evidence extractor and
//! the overlays pattern-match over token windows. Comments, string literals
//! (including verbatim and interpolated forms) and char literals are
//! consumed so their contents never produce spurious identifiers.

/// A single token with the 1-indexed line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str,
    Number,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Dot,
    Comma,
    Colon,
    Semi,
    Question,
    /// `=>`
    Arrow,
    /// `=` (never `==`)
    Assign,
    /// Any other operator character
    Op(char),
}

impl Token {
    /// The identifier text, if this is an identifier token.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.ident() == Some(text)
    }
}

/// C# reserved words. Identifiers in this set never resolve to a declared
/// symbol and are skipped when collecting usage references.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "record", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc",
    "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint",
    "ulong", "unchecked", "unsafe", "ushort", "using", "var", "virtual", "void", "volatile",
    "while", "yield", "async", "await", "get", "set", "init", "value", "where", "when", "nameof",
    "partial", "dynamic", "global", "required",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Scan a source text into a token stream.
pub fn scan(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c == '\n' {
            line += 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Line comment
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comment
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() {
                if chars[i] == '\n' {
                    line += 1;
                }
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    i += 2;
                    break;
                }
                i += 1;
            }
            continue;
        }

        // String literals: "...", @"...", $"...", $@"..." / @$"..."
        if c == '"'
            || (c == '@' && chars.get(i + 1) == Some(&'"'))
            || (c == '$' && chars.get(i + 1) == Some(&'"'))
            || (c == '$' && chars.get(i + 1) == Some(&'@') && chars.get(i + 2) == Some(&'"'))
            || (c == '@' && chars.get(i + 1) == Some(&'$') && chars.get(i + 2) == Some(&'"'))
        {
            let start_line = line;
            let mut verbatim = false;
            while i < chars.len() && chars[i] != '"' {
                if chars[i] == '@' {
                    verbatim = true;
                }
                i += 1;
            }
            i += 1; // consume opening quote
            while i < chars.len() {
                let sc = chars[i];
                if sc == '\n' {
                    line += 1;
                }
                if verbatim {
                    // "" escapes a quote in verbatim strings
                    if sc == '"' {
                        if chars.get(i + 1) == Some(&'"') {
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                } else {
                    if sc == '\\' {
                        i += 2;
                        continue;
                    }
                    if sc == '"' {
                        i += 1;
                        break;
                    }
                }
                i += 1;
            }
            tokens.push(Token { kind: TokenKind::Str, line: start_line });
            continue;
        }

        // Char literal
        if c == '\'' {
            i += 1;
            while i < chars.len() {
                if chars[i] == '\\' {
                    i += 2;
                    continue;
                }
                if chars[i] == '\'' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            tokens.push(Token { kind: TokenKind::Str, line });
            continue;
        }

        // Identifier (a leading @ makes a verbatim identifier)
        if c.is_alphabetic() || c == '_' || (c == '@' && matches!(chars.get(i + 1), Some(n) if n.is_alphabetic() || *n == '_')) {
            if c == '@' {
                i += 1;
            }
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token { kind: TokenKind::Ident(text), line });
            continue;
        }

        // Number
        if c.is_ascii_digit() {
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_')
            {
                // Trailing dot belongs to a member access, not the number
                if chars[i] == '.' && !matches!(chars.get(i + 1), Some(n) if n.is_ascii_digit()) {
                    break;
                }
                i += 1;
            }
            tokens.push(Token { kind: TokenKind::Number, line });
            continue;
        }

        // Operators and punctuation
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semi,
            '?' => TokenKind::Question,
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 1;
                    TokenKind::Op('<')
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 1;
                    TokenKind::Op('>')
                } else {
                    TokenKind::Gt
                }
            }
            '=' => match chars.get(i + 1) {
                Some('>') => {
                    i += 1;
                    TokenKind::Arrow
                }
                Some('=') => {
                    i += 1;
                    TokenKind::Op('=')
                }
                _ => TokenKind::Assign,
            },
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    i += 1;
                }
                TokenKind::Op('!')
            }
            other => TokenKind::Op(other),
        };
        tokens.push(Token { kind, line });
        i += 1;
    }

    tokens
}
