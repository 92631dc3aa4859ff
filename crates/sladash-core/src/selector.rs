#![forbid(unsafe_code)]

//! A small CSS selector subset for the in-memory document.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (WS compound)*          descendant combinator only
//! compound  := (tag | "*")? (#id | .class | [attr])*
//! attr      := name | name op value flag?
//! op        := "=" | "^=" | "$=" | "*="
//! flag      := "i" | "s"
//! ```
//!
//! That covers every anchor the dashboard markup uses (`#dashTable`,
//! `tbody tr`, `a[href^="#"]`, `input[placeholder*="Search tickets" i]`).

use std::fmt;

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector {:?}: {}", self.selector, self.reason)
    }
}

impl std::error::Error for SelectorError {}

/// Read-only view of an element used during matching.
pub trait ElementView: Sized {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn parent(&self) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
    value: String,
    ignore_case: bool,
}

impl AttrSelector {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        if self.op == AttrOp::Exists {
            return true;
        }
        let (actual, expected) = if self.ignore_case {
            (actual.to_lowercase(), self.value.to_lowercase())
        } else {
            (actual.to_owned(), self.value.clone())
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == expected,
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
            AttrOp::Contains => !expected.is_empty() && actual.contains(&expected),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

impl Compound {
    fn matches<E: ElementView>(&self, el: &E) -> bool {
        if let Some(tag) = &self.tag
            && !el.tag().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.attr("id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = el.attr("class").unwrap_or("");
            if !self
                .classes
                .iter()
                .all(|wanted| class_attr.split_whitespace().any(|c| c == wanted))
            {
                return false;
            }
        }
        self.attrs.iter().all(|a| a.matches(el.attr(&a.name)))
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    complexes: Vec<Vec<Compound>>,
}

impl SelectorList {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let fail = |reason| SelectorError {
            selector: input.to_owned(),
            reason,
        };
        let mut complexes = Vec::new();
        for part in split_top_level(input, |c| c == ',') {
            let compounds = split_top_level(part, char::is_whitespace)
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(parse_compound)
                .collect::<Result<Vec<_>, _>>()
                .map_err(fail)?;
            if compounds.is_empty() {
                return Err(fail("empty selector"));
            }
            complexes.push(compounds);
        }
        Ok(Self { complexes })
    }

    /// Whether `el` matches any selector in the list.
    pub fn matches<E: ElementView>(&self, el: &E) -> bool {
        self.complexes.iter().any(|c| matches_complex(c, el))
    }
}

fn matches_complex<E: ElementView>(compounds: &[Compound], el: &E) -> bool {
    let Some((last, ancestors)) = compounds.split_last() else {
        return false;
    };
    if !last.matches(el) {
        return false;
    }
    // Descendant-only chains match greedily: take the nearest ancestor that
    // satisfies each remaining compound, right to left.
    let mut remaining = ancestors.iter().rev().peekable();
    let mut cursor = el.parent();
    while let Some(wanted) = remaining.peek() {
        let Some(node) = cursor else {
            return false;
        };
        if wanted.matches(&node) {
            remaining.next();
        }
        cursor = node.parent();
    }
    true
}

/// Split on `sep` outside of brackets and quotes.
fn split_top_level(input: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && sep(c) => {
                parts.push(input[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], i: &mut usize) -> Result<String, &'static str> {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    if *i == start {
        return Err("expected identifier");
    }
    Ok(chars[start..*i].iter().collect())
}

fn parse_compound(input: &str) -> Result<Compound, &'static str> {
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut compound = Compound::default();

    if chars.first() == Some(&'*') {
        i = 1;
    } else if chars.first().is_some_and(|c| c.is_alphabetic()) {
        compound.tag = Some(read_ident(&chars, &mut i)?.to_ascii_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                compound.id = Some(read_ident(&chars, &mut i)?);
            }
            '.' => {
                i += 1;
                compound.classes.push(read_ident(&chars, &mut i)?);
            }
            '[' => {
                i += 1;
                let start = i;
                let mut quote: Option<char> = None;
                while i < chars.len() {
                    match (quote, chars[i]) {
                        (Some(q), c) if c == q => quote = None,
                        (None, '"' | '\'') => quote = Some(chars[i]),
                        (None, ']') => break,
                        _ => {}
                    }
                    i += 1;
                }
                if i >= chars.len() {
                    return Err("unterminated attribute selector");
                }
                compound.attrs.push(parse_attr(&chars[start..i])?);
                i += 1;
            }
            _ => return Err("unexpected character"),
        }
    }
    Ok(compound)
}

fn parse_attr(chars: &[char]) -> Result<AttrSelector, &'static str> {
    let skip_ws = |i: &mut usize| {
        while *i < chars.len() && chars[*i].is_whitespace() {
            *i += 1;
        }
    };
    let mut i = 0;
    skip_ws(&mut i);
    let start = i;
    while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == ':') {
        i += 1;
    }
    if i == start {
        return Err("expected attribute name");
    }
    let name: String = chars[start..i].iter().collect();
    skip_ws(&mut i);
    if i == chars.len() {
        return Ok(AttrSelector {
            name,
            op: AttrOp::Exists,
            value: String::new(),
            ignore_case: false,
        });
    }

    let op = match chars[i] {
        '=' => AttrOp::Equals,
        '^' => AttrOp::Prefix,
        '$' => AttrOp::Suffix,
        '*' => AttrOp::Contains,
        _ => return Err("unknown attribute operator"),
    };
    i += if op == AttrOp::Equals { 1 } else { 2 };
    if op != AttrOp::Equals && chars.get(i - 1) != Some(&'=') {
        return Err("unknown attribute operator");
    }
    skip_ws(&mut i);

    let value = match chars.get(i) {
        Some(&q @ ('"' | '\'')) => {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != q {
                i += 1;
            }
            if i == chars.len() {
                return Err("unterminated string");
            }
            let value: String = chars[start..i].iter().collect();
            i += 1;
            value
        }
        Some(_) => read_ident(chars, &mut i)?,
        None => return Err("missing attribute value"),
    };
    skip_ws(&mut i);

    let ignore_case = match chars.get(i) {
        None => false,
        Some('i' | 'I') => {
            i += 1;
            true
        }
        Some('s' | 'S') => {
            i += 1;
            false
        }
        Some(_) => return Err("unexpected attribute flag"),
    };
    skip_ws(&mut i);
    if i != chars.len() {
        return Err("trailing characters in attribute selector");
    }

    Ok(AttrSelector {
        name,
        op,
        value,
        ignore_case,
    })
}
