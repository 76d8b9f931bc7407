use super::Evidence;
use crate::lexer::{self, Token, TokenKind};
use crate::symbols::{
    Accessibility, Declaration, Location, SymbolId, SymbolKind, UsageKind, UsageReference,
};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Modifier keywords that may prefix a declaration.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "abstract", "sealed",
    "partial", "override", "readonly", "async", "extern", "unsafe", "const", "new", "required",
    "volatile",
];

/// Heuristic declaration/reference extractor over the token stream.
///
/// Declarations are recognized at statement starts; type members are only
/// parsed at the immediate body depth of their type, which keeps local
/// variables and statements from masquerading as declarations. Reference
/// collection strips declaration-shaped spans (modifiers and declared
/// names) and does not descend into lambda bodies — the lambda overlay
/// owns those.
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, path: &Path, text: &str) -> Evidence {
        let tokens = lexer::scan(text);
        let decls = DeclarationPass::run(path, &tokens);

        debug!(
            "extracted {} declarations from {}",
            decls.declarations.len(),
            path.display()
        );

        let lambda_ranges = lambda_ranges(&tokens);
        let attr_ranges = attribute_ranges(&tokens);
        let raw = classify(
            &tokens,
            0,
            tokens.len(),
            &decls.skip,
            &lambda_ranges,
            &decls.ctor_param_ranges,
            &attr_ranges,
        );

        let references = raw
            .into_iter()
            .map(|r| {
                let mut reference =
                    UsageReference::new(r.name, r.kind, path.to_path_buf(), r.line);
                reference.receiver = r.receiver;
                reference
            })
            .collect();

        Evidence {
            declarations: decls.declarations,
            references,
            tokens,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A classified usage site, before it is tied to a file.
#[derive(Debug, Clone)]
pub struct RawRef {
    pub name: String,
    pub kind: UsageKind,
    pub receiver: Option<String>,
    pub line: usize,
}

/// Re-classify a token window with the same shape catalog the extractor
/// uses, with no span stripping. The lambda overlay calls this on closure
/// bodies.
pub fn scan_window(tokens: &[Token], start: usize, end: usize) -> Vec<RawRef> {
    classify(tokens, start, end, &HashSet::new(), &[], &[], &[])
}

// ---------------------------------------------------------------------------
// Declaration pass
// ---------------------------------------------------------------------------

struct TypeFrame {
    name: String,
    is_interface: bool,
    body_depth: i32,
}

struct DeclarationPass<'a> {
    path: &'a Path,
    tokens: &'a [Token],
    declarations: Vec<Declaration>,
    /// Token indices excluded from reference collection: modifiers and
    /// declared names.
    skip: HashSet<usize>,
    /// Token ranges of constructor parameter lists (inclusive).
    ctor_param_ranges: Vec<(usize, usize)>,
}

struct PassResult {
    declarations: Vec<Declaration>,
    skip: HashSet<usize>,
    ctor_param_ranges: Vec<(usize, usize)>,
}

impl<'a> DeclarationPass<'a> {
    fn run(path: &'a Path, tokens: &'a [Token]) -> PassResult {
        let mut pass = DeclarationPass {
            path,
            tokens,
            declarations: Vec::new(),
            skip: HashSet::new(),
            ctor_param_ranges: Vec::new(),
        };
        pass.walk();
        PassResult {
            declarations: pass.declarations,
            skip: pass.skip,
            ctor_param_ranges: pass.ctor_param_ranges,
        }
    }

    fn walk(&mut self) {
        let mut depth: i32 = 0;
        let mut frames: Vec<TypeFrame> = Vec::new();
        // Type bodies whose opening brace has not been reached yet
        let mut pending: Vec<(usize, String, bool)> = Vec::new();

        let mut i = 0;
        while i < self.tokens.len() {
            match &self.tokens[i].kind {
                TokenKind::LBrace => {
                    depth += 1;
                    if let Some(pos) = pending.iter().position(|(idx, _, _)| *idx == i) {
                        let (_, name, is_interface) = pending.remove(pos);
                        frames.push(TypeFrame { name, is_interface, body_depth: depth });
                    }
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    while frames.last().map(|f| f.body_depth > depth).unwrap_or(false) {
                        frames.pop();
                    }
                }
                _ => {}
            }

            if self.is_statement_start(i) {
                if let Some(parsed) = self.try_type(i, frames.last()) {
                    pending.extend(parsed);
                } else {
                    let at_member_depth =
                        frames.last().map(|f| f.body_depth == depth).unwrap_or(false);
                    if at_member_depth {
                        self.try_member(i, frames.last().unwrap());
                    }
                }
            }

            i += 1;
        }
    }

    fn is_statement_start(&self, i: usize) -> bool {
        if i == 0 {
            return true;
        }
        matches!(
            self.tokens[i - 1].kind,
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semi | TokenKind::RBracket
        )
    }

    /// Skip leading `[...]` attribute groups, return the next index.
    fn skip_attributes(&self, mut i: usize) -> usize {
        while matches!(self.tokens.get(i).map(|t| &t.kind), Some(TokenKind::LBracket)) {
            match match_forward(self.tokens, i, &TokenKind::LBracket, &TokenKind::RBracket) {
                Some(close) => i = close + 1,
                None => break,
            }
        }
        i
    }

    fn collect_modifiers(&mut self, mut i: usize) -> (Vec<String>, usize) {
        let mut modifiers = Vec::new();
        while let Some(word) = self.tokens.get(i).and_then(|t| t.ident()) {
            if MODIFIERS.contains(&word) {
                modifiers.push(word.to_string());
                self.skip.insert(i);
                i += 1;
            } else {
                break;
            }
        }
        (modifiers, i)
    }

    /// Try to parse a type declaration header at `i`. Returns the pending
    /// body frame (brace index, name, is_interface) when the type has a body.
    fn try_type(&mut self, i: usize, frame: Option<&TypeFrame>) -> Option<Vec<(usize, String, bool)>> {
        let start = self.skip_attributes(i);
        let (modifiers, mut j) = self.collect_modifiers(start);

        let mut keyword = self.tokens.get(j).and_then(|t| t.ident())?.to_string();
        if keyword == "record" {
            // record, record class, record struct
            if let Some(next) = self.tokens.get(j + 1).and_then(|t| t.ident()) {
                if next == "class" || next == "struct" {
                    j += 1;
                }
            }
            keyword = "class".to_string();
        }
        if !matches!(keyword.as_str(), "class" | "interface" | "struct" | "enum") {
            return None;
        }
        let is_interface = keyword == "interface";
        j += 1;

        let name_idx = j;
        let name = self.tokens.get(j).and_then(|t| t.ident())?;
        if lexer::is_keyword(name) {
            return None;
        }
        let name = name.to_string();
        self.skip.insert(name_idx);
        j += 1;

        // Generic type parameters
        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::Lt)) {
            if let Some((_, after)) = generic_window(self.tokens, j) {
                j = after;
            }
        }

        // Primary constructor (records, C# 12 classes)
        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::LParen)) {
            if let Some(close) = match_forward(self.tokens, j, &TokenKind::LParen, &TokenKind::RParen)
            {
                j = close + 1;
            }
        }

        // Base/interface list
        let mut super_types = Vec::new();
        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::Colon)) {
            j += 1;
            while let Some(token) = self.tokens.get(j) {
                match &token.kind {
                    TokenKind::Ident(word) if word == "where" => break,
                    TokenKind::Ident(word) if !lexer::is_keyword(word) => {
                        let mut last = word.clone();
                        j += 1;
                        // Qualified name: keep the final segment
                        while matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::Dot)) {
                            if let Some(seg) = self.tokens.get(j + 1).and_then(|t| t.ident()) {
                                last = seg.to_string();
                                j += 2;
                            } else {
                                break;
                            }
                        }
                        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::Lt)) {
                            if let Some((_, after)) = generic_window(self.tokens, j) {
                                j = after;
                            }
                        }
                        super_types.push(last);
                        // Base constructor arguments (records)
                        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::LParen)) {
                            if let Some(close) = match_forward(
                                self.tokens,
                                j,
                                &TokenKind::LParen,
                                &TokenKind::RParen,
                            ) {
                                j = close + 1;
                            }
                        }
                    }
                    TokenKind::Comma => j += 1,
                    _ => break,
                }
            }
        }

        // Constraint clauses run until the body
        while let Some(token) = self.tokens.get(j) {
            match &token.kind {
                TokenKind::LBrace | TokenKind::Semi => break,
                _ => j += 1,
            }
        }

        let line = self.tokens[name_idx].line;
        let end_line = match self.tokens.get(j).map(|t| &t.kind) {
            Some(TokenKind::LBrace) => {
                match_forward(self.tokens, j, &TokenKind::LBrace, &TokenKind::RBrace)
                    .map(|close| self.tokens[close].line)
                    .unwrap_or(line)
            }
            _ => self.tokens.get(j).map(|t| t.line).unwrap_or(line),
        };

        let containing = frame.map(|f| f.name.clone());
        let id = SymbolId::new(self.path.to_path_buf(), containing.clone(), name.clone());
        let mut decl = Declaration::new(
            id,
            name.clone(),
            SymbolKind::Type,
            Location::new(self.path.to_path_buf(), line, 1),
        );
        decl.accessibility = Accessibility::from_modifiers(&modifiers, Accessibility::Internal);
        decl.is_static = modifiers.iter().any(|m| m == "static");
        decl.is_abstract = modifiers.iter().any(|m| m == "abstract");
        decl.is_interface = is_interface;
        decl.containing_type = containing;
        decl.super_types = super_types;
        decl.span = (line, end_line);
        self.declarations.push(decl);

        if matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::LBrace)) {
            Some(vec![(j, name, is_interface)])
        } else {
            Some(Vec::new())
        }
    }

    /// Try to parse a member declaration (method, property, field,
    /// constructor) at `i`, directly inside `frame`'s body.
    fn try_member(&mut self, i: usize, frame: &TypeFrame) {
        let start = self.skip_attributes(i);
        let (modifiers, j) = self.collect_modifiers(start);

        let Some(ty) = parse_type_tokens(self.tokens, j) else {
            return;
        };

        // Constructor: a single identifier equal to the type name, then `(`
        if ty.is_single_ident
            && ty.simple_name == frame.name
            && matches!(self.tokens.get(ty.next).map(|t| &t.kind), Some(TokenKind::LParen))
        {
            self.skip.insert(j);
            if let Some(close) =
                match_forward(self.tokens, ty.next, &TokenKind::LParen, &TokenKind::RParen)
            {
                self.ctor_param_ranges.push((ty.next + 1, close.saturating_sub(1)));
                let line = self.tokens[j].line;
                let end_line = self.body_end_line(close + 1).unwrap_or(line);
                let mut decl = self.member_decl(
                    frame,
                    &frame.name.clone(),
                    SymbolKind::Method,
                    &modifiers,
                    line,
                    end_line,
                );
                decl.is_constructor = true;
                self.declarations.push(decl);
            }
            return;
        }

        let name_idx = ty.next;
        let Some(name) = self.tokens.get(name_idx).and_then(|t| t.ident()) else {
            return;
        };
        if lexer::is_keyword(name) {
            return;
        }
        let name = name.to_string();
        let mut k = name_idx + 1;

        // Generic method type parameters
        if matches!(self.tokens.get(k).map(|t| &t.kind), Some(TokenKind::Lt)) {
            match generic_window(self.tokens, k) {
                Some((_, after)) => k = after,
                None => return,
            }
        }

        let line = self.tokens[name_idx].line;
        match self.tokens.get(k).map(|t| &t.kind) {
            Some(TokenKind::LParen) => {
                let Some(close) =
                    match_forward(self.tokens, k, &TokenKind::LParen, &TokenKind::RParen)
                else {
                    return;
                };
                let is_extension = modifiers.iter().any(|m| m == "static")
                    && self
                        .tokens
                        .get(k + 1)
                        .map(|t| t.is_ident("this"))
                        .unwrap_or(false);

                self.skip.insert(name_idx);
                let end_line = self.body_end_line(close + 1).unwrap_or(line);
                let body_is_empty_signature = self
                    .tokens
                    .get(close + 1)
                    .map(|t| t.kind == TokenKind::Semi)
                    .unwrap_or(false);

                let mut decl =
                    self.member_decl(frame, &name, SymbolKind::Method, &modifiers, line, end_line);
                decl.is_extension = is_extension;
                decl.type_name = ty.type_name();
                if frame.is_interface && body_is_empty_signature {
                    decl.is_abstract = true;
                }
                self.declarations.push(decl);
            }
            Some(TokenKind::LBrace) => {
                self.skip.insert(name_idx);
                let end_line =
                    match_forward(self.tokens, k, &TokenKind::LBrace, &TokenKind::RBrace)
                        .map(|close| self.tokens[close].line)
                        .unwrap_or(line);
                let mut decl = self.member_decl(
                    frame,
                    &name,
                    SymbolKind::Property,
                    &modifiers,
                    line,
                    end_line,
                );
                decl.type_name = ty.type_name();
                self.declarations.push(decl);
            }
            Some(TokenKind::Assign) | Some(TokenKind::Semi) | Some(TokenKind::Comma) => {
                self.skip.insert(name_idx);
                let end_line = self.statement_end_line(k).unwrap_or(line);
                let mut decl =
                    self.member_decl(frame, &name, SymbolKind::Field, &modifiers, line, end_line);
                decl.type_name = ty.type_name();
                self.declarations.push(decl);
            }
            _ => {}
        }
    }

    fn member_decl(
        &self,
        frame: &TypeFrame,
        name: &str,
        kind: SymbolKind,
        modifiers: &[String],
        line: usize,
        end_line: usize,
    ) -> Declaration {
        let fallback = if frame.is_interface {
            Accessibility::Public
        } else {
            Accessibility::Private
        };
        let id = SymbolId::new(
            self.path.to_path_buf(),
            Some(frame.name.clone()),
            name.to_string(),
        );
        let mut decl = Declaration::new(
            id,
            name.to_string(),
            kind,
            Location::new(self.path.to_path_buf(), line, 1),
        );
        decl.accessibility = Accessibility::from_modifiers(modifiers, fallback);
        decl.is_static = modifiers.iter().any(|m| m == "static");
        decl.is_virtual = modifiers.iter().any(|m| m == "virtual");
        decl.is_abstract = modifiers.iter().any(|m| m == "abstract");
        decl.containing_type = Some(frame.name.clone());
        decl.span = (line, end_line);
        decl
    }

    /// Last line of a member body starting after the signature: a braced
    /// block, an expression body, or a bare semicolon. Skips constructor
    /// initializers and constraint clauses in between.
    fn body_end_line(&self, mut k: usize) -> Option<usize> {
        while let Some(token) = self.tokens.get(k) {
            match &token.kind {
                TokenKind::LBrace => {
                    let close =
                        match_forward(self.tokens, k, &TokenKind::LBrace, &TokenKind::RBrace)?;
                    return Some(self.tokens[close].line);
                }
                TokenKind::Arrow | TokenKind::Assign => return self.statement_end_line(k),
                TokenKind::Semi => return Some(token.line),
                TokenKind::LParen => {
                    let close =
                        match_forward(self.tokens, k, &TokenKind::LParen, &TokenKind::RParen)?;
                    k = close + 1;
                }
                _ => k += 1,
            }
        }
        None
    }

    /// Line of the terminating semicolon of a statement starting at `k`.
    fn statement_end_line(&self, mut k: usize) -> Option<usize> {
        let mut depth = 0i32;
        while let Some(token) = self.tokens.get(k) {
            match &token.kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => depth -= 1,
                TokenKind::Semi if depth <= 0 => return Some(token.line),
                _ => {}
            }
            k += 1;
        }
        None
    }
}

struct ParsedType {
    next: usize,
    simple_name: String,
    is_single_ident: bool,
}

impl ParsedType {
    fn type_name(&self) -> Option<String> {
        if self.simple_name == "void" || self.simple_name == "var" {
            None
        } else {
            Some(self.simple_name.clone())
        }
    }
}

/// Parse a type mention: `Name`, `A.B.Name`, `Name<...>`, `Name?`,
/// `Name[]` and combinations.
fn parse_type_tokens(tokens: &[Token], mut i: usize) -> Option<ParsedType> {
    let first = tokens.get(i).and_then(|t| t.ident())?;
    // Decl keywords can never open a type mention
    if matches!(
        first,
        "class" | "interface" | "struct" | "enum" | "record" | "namespace" | "using" | "return"
            | "if" | "else" | "for" | "foreach" | "while" | "switch" | "get" | "set" | "event"
            | "delegate" | "operator" | "where"
    ) {
        return None;
    }
    let mut simple = first.to_string();
    let start = i;
    i += 1;

    while matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Dot)) {
        let seg = tokens.get(i + 1).and_then(|t| t.ident())?;
        simple = seg.to_string();
        i += 2;
    }
    let mut plain = i == start + 1;

    if matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Lt)) {
        let (_, after) = generic_window(tokens, i)?;
        i = after;
        plain = false;
    }
    if matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::Question)) {
        i += 1;
        plain = false;
    }
    while matches!(tokens.get(i).map(|t| &t.kind), Some(TokenKind::LBracket))
        && matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::RBracket))
    {
        i += 2;
        plain = false;
    }

    Some(ParsedType { next: i, simple_name: simple, is_single_ident: plain })
}

/// Find the matching closer for the opener at `open_idx`.
fn match_forward(
    tokens: &[Token],
    open_idx: usize,
    open: &TokenKind,
    close: &TokenKind,
) -> Option<usize> {
    let mut depth = 0i32;
    for (k, token) in tokens.iter().enumerate().skip(open_idx) {
        if token.kind == *open {
            depth += 1;
        } else if token.kind == *close {
            depth -= 1;
            if depth == 0 {
                return Some(k);
            }
        }
    }
    None
}

/// A balanced `<...>` window containing only type-argument-shaped tokens.
/// Returns the identifier indices inside and the index after the closing
/// `>`. `None` means the `<` is a comparison, not a generic list.
fn generic_window(tokens: &[Token], lt_idx: usize) -> Option<(Vec<usize>, usize)> {
    let mut depth = 1i32;
    let mut idents = Vec::new();
    let limit = (lt_idx + 64).min(tokens.len());
    let mut k = lt_idx + 1;
    while k < limit {
        match &tokens[k].kind {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => {
                depth -= 1;
                if depth == 0 {
                    return Some((idents, k + 1));
                }
            }
            TokenKind::Ident(word) => {
                if !lexer::is_keyword(word) {
                    idents.push(k);
                }
            }
            TokenKind::Dot
            | TokenKind::Comma
            | TokenKind::Question
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::LParen
            | TokenKind::RParen => {}
            _ => return None,
        }
        k += 1;
    }
    None
}

// ---------------------------------------------------------------------------
// Reference pass
// ---------------------------------------------------------------------------

/// Token index ranges (inclusive) of lambda bodies.
fn lambda_ranges(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Arrow {
            continue;
        }
        if let Some(end) = lambda_body_end(tokens, idx) {
            ranges.push((idx + 1, end));
        }
    }
    ranges
}

/// Last token index (inclusive) of the lambda body that starts after the
/// arrow at `arrow_idx`.
pub(crate) fn lambda_body_end(tokens: &[Token], arrow_idx: usize) -> Option<usize> {
    let first = tokens.get(arrow_idx + 1)?;
    if first.kind == TokenKind::LBrace {
        return match_forward(tokens, arrow_idx + 1, &TokenKind::LBrace, &TokenKind::RBrace);
    }

    let mut depth = 0i32;
    let mut k = arrow_idx + 1;
    while k < tokens.len() {
        match &tokens[k].kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                if depth == 0 {
                    return Some(k.saturating_sub(1).max(arrow_idx + 1));
                }
                depth -= 1;
            }
            TokenKind::Comma | TokenKind::Semi if depth == 0 => {
                return Some(k.saturating_sub(1).max(arrow_idx + 1));
            }
            _ => {}
        }
        k += 1;
    }
    Some(tokens.len() - 1)
}

/// Token index ranges (inclusive) of attribute groups `[...]`.
fn attribute_ranges(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for (idx, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::LBracket {
            continue;
        }
        let opens_attr = idx == 0
            || matches!(
                tokens[idx - 1].kind,
                TokenKind::LBrace
                    | TokenKind::RBrace
                    | TokenKind::Semi
                    | TokenKind::RBracket
                    | TokenKind::LParen
                    | TokenKind::Comma
            );
        if !opens_attr {
            continue;
        }
        let names_something = tokens
            .get(idx + 1)
            .and_then(|t| t.ident())
            .map(|w| !lexer::is_keyword(w))
            .unwrap_or(false);
        if !names_something {
            continue;
        }
        if let Some(close) = match_forward(tokens, idx, &TokenKind::LBracket, &TokenKind::RBracket)
        {
            ranges.push((idx, close));
        }
    }
    ranges
}

fn in_ranges(ranges: &[(usize, usize)], idx: usize) -> bool {
    ranges.iter().any(|&(lo, hi)| lo <= idx && idx <= hi)
}

/// The usage-shape catalog, matched over token windows.
fn classify(
    tokens: &[Token],
    start: usize,
    end: usize,
    skip: &HashSet<usize>,
    lambda_ranges: &[(usize, usize)],
    ctor_param_ranges: &[(usize, usize)],
    attr_ranges: &[(usize, usize)],
) -> Vec<RawRef> {
    let mut refs = Vec::new();
    let mut consumed: HashSet<usize> = HashSet::new();

    for i in start..end.min(tokens.len()) {
        if skip.contains(&i) || consumed.contains(&i) || in_ranges(lambda_ranges, i) {
            continue;
        }
        let Some(name) = tokens[i].ident() else {
            continue;
        };
        if lexer::is_keyword(name) {
            continue;
        }
        let line = tokens[i].line;
        let prev = i.checked_sub(1).map(|p| &tokens[p].kind);
        let next = tokens.get(i + 1).map(|t| &t.kind);

        // new Name(...)
        if i > 0 && tokens[i - 1].is_ident("new") {
            refs.push(RawRef {
                name: name.to_string(),
                kind: UsageKind::ObjectCreation,
                receiver: None,
                line,
            });
            continue;
        }

        // Name<...> — generic invocation or generic type mention
        if matches!(next, Some(TokenKind::Lt)) {
            if let Some((args, after)) = generic_window(tokens, i + 1) {
                let invoked =
                    matches!(tokens.get(after).map(|t| &t.kind), Some(TokenKind::LParen));
                refs.push(RawRef {
                    name: name.to_string(),
                    kind: if invoked { UsageKind::Invocation } else { UsageKind::TypeReference },
                    receiver: None,
                    line,
                });
                for arg in args {
                    consumed.insert(arg);
                    if let Some(arg_name) = tokens[arg].ident() {
                        refs.push(RawRef {
                            name: arg_name.to_string(),
                            kind: UsageKind::GenericArgument,
                            receiver: if invoked { Some(name.to_string()) } else { None },
                            line: tokens[arg].line,
                        });
                    }
                }
                continue;
            }
        }

        // Name(...)
        if matches!(next, Some(TokenKind::LParen)) {
            refs.push(RawRef {
                name: name.to_string(),
                kind: UsageKind::Invocation,
                receiver: None,
                line,
            });
            continue;
        }

        // receiver.Name
        if matches!(prev, Some(TokenKind::Dot)) {
            refs.push(RawRef {
                name: name.to_string(),
                kind: UsageKind::MemberAccess,
                receiver: None,
                line,
            });
            continue;
        }

        // Type position inside a constructor parameter list
        if in_ranges(ctor_param_ranges, i) && matches!(next, Some(TokenKind::Ident(_))) {
            refs.push(RawRef {
                name: name.to_string(),
                kind: UsageKind::ConstructorParameter,
                receiver: None,
                line,
            });
            continue;
        }

        // Inside an attribute group
        if in_ranges(attr_ranges, i) {
            refs.push(RawRef {
                name: name.to_string(),
                kind: UsageKind::AttributeParameter,
                receiver: None,
                line,
            });
            continue;
        }

        // Bare reference: type position, base list, delegate binding,
        // static access root, parameter type
        refs.push(RawRef {
            name: name.to_string(),
            kind: UsageKind::TypeReference,
            receiver: None,
            line,
        });
    }

    refs
}
