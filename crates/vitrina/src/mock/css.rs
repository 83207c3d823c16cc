//! Selector subset understood by the mock DOM.
//!
//! Supported: type selectors and `*`, `#id`, `.class`, `[attr]`,
//! `[attr=v]`, `[attr^=v]`, `[attr*=v]`, `[attr$=v]`, `[attr~=v]`, the descendant
//! and child (`>`) combinators, and comma-separated groups. Values may be bare or
//! quoted with `'`/`"`, and quotes inside values may be backslash-escaped. This is
//! every form [`crate::Locator::to_css`] emits plus what page objects write by hand.

use crate::result::{VitrinaError, VitrinaResult};

/// Read access to a DOM the selector is matched against
pub(crate) trait DomView {
    /// Lowercase tag of node `n`
    fn tag(&self, n: usize) -> &str;
    /// Attribute of node `n`
    fn attr(&self, n: usize, name: &str) -> Option<&str>;
    /// Parent of node `n`
    fn parent(&self, n: usize) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Prefix,
    Contains,
    Suffix,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    test: Option<(AttrOp, String)>,
}

impl AttrSelector {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self.test {
            None => true,
            Some((AttrOp::Equals, ref v)) => actual == v,
            Some((AttrOp::Prefix, ref v)) => !v.is_empty() && actual.starts_with(v.as_str()),
            Some((AttrOp::Contains, ref v)) => !v.is_empty() && actual.contains(v.as_str()),
            Some((AttrOp::Suffix, ref v)) => !v.is_empty() && actual.ends_with(v.as_str()),
            Some((AttrOp::Word, ref v)) => actual.split_whitespace().any(|w| w == v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    attrs: Vec<AttrSelector>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.attrs.is_empty()
    }

    fn matches(&self, dom: &impl DomView, n: usize) -> bool {
        if let Some(ref tag) = self.tag {
            if tag != "*" && !dom.tag(n).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.attrs.iter().all(|a| a.matches(dom.attr(n, &a.name)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-free selector: compounds joined by combinators
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// `(combinator to the previous compound, compound)`; the first combinator is unused
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, dom: &impl DomView, n: usize) -> bool {
        self.matches_at(dom, self.parts.len() - 1, n)
    }

    fn matches_at(&self, dom: &impl DomView, i: usize, n: usize) -> bool {
        let (combinator, ref compound) = self.parts[i];
        if !compound.matches(dom, n) {
            return false;
        }
        if i == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => dom
                .parent(n)
                .is_some_and(|p| self.matches_at(dom, i - 1, p)),
            Combinator::Descendant => {
                let mut ancestor = dom.parent(n);
                while let Some(a) = ancestor {
                    if self.matches_at(dom, i - 1, a) {
                        return true;
                    }
                    ancestor = dom.parent(a);
                }
                false
            }
        }
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    groups: Vec<Complex>,
}

impl Selector {
    /// Parse a selector; unsupported syntax is a driver error, as in a browser
    pub(crate) fn parse(input: &str) -> VitrinaResult<Self> {
        Parser::new(input).parse()
    }

    /// True when node `n` matches any group
    pub(crate) fn matches(&self, dom: &impl DomView, n: usize) -> bool {
        self.groups.iter().any(|g| g.matches(dom, n))
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, what: &str) -> VitrinaError {
        VitrinaError::driver(format!(
            "invalid selector '{}': {what} at {}",
            self.input, self.pos
        ))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse(mut self) -> VitrinaResult<Selector> {
        let mut groups = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            groups.push(self.complex()?);
        }
        if self.pos < self.chars.len() {
            return Err(self.error("unexpected character"));
        }
        Ok(Selector { groups })
    }

    fn complex(&mut self) -> VitrinaResult<Complex> {
        self.skip_ws();
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.compound()?;
            if compound.is_empty() {
                return Err(self.error("expected selector"));
            }
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            }
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> VitrinaResult<Compound> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident()?;
                    compound.attrs.push(AttrSelector {
                        name: "id".to_string(),
                        test: Some((AttrOp::Equals, id)),
                    });
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident()?;
                    compound.attrs.push(AttrSelector {
                        name: "class".to_string(),
                        test: Some((AttrOp::Word, class)),
                    });
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                _ => return Ok(compound),
            }
        }
    }

    fn ident(&mut self) -> VitrinaResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> VitrinaResult<AttrSelector> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrSelector { name, test: None });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals
            }
            Some(c @ ('^' | '*' | '$' | '~')) => {
                self.pos += 1;
                if self.peek() != Some('=') {
                    return Err(self.error("expected '='"));
                }
                self.pos += 1;
                match c {
                    '^' => AttrOp::Prefix,
                    '*' => AttrOp::Contains,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Word,
                }
            }
            _ => return Err(self.error("expected attribute operator")),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                self.quoted(q)?
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;
        Ok(AttrSelector {
            name,
            test: Some((op, value)),
        })
    }

    fn quoted(&mut self, quote: char) -> VitrinaResult<String> {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some('\\') => {
                    self.pos += 1;
                    let escaped = self.peek().ok_or_else(|| self.error("dangling escape"))?;
                    value.push(escaped);
                    self.pos += 1;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::{escape_css_string, Locator, Strategy};

    /// (tag, attrs, parent)
    struct Dom(Vec<(&'static str, Vec<(&'static str, String)>, Option<usize>)>);

    impl DomView for Dom {
        fn tag(&self, n: usize) -> &str {
            self.0[n].0
        }
        fn attr(&self, n: usize, name: &str) -> Option<&str> {
            self.0[n]
                .1
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
        }
        fn parent(&self, n: usize) -> Option<usize> {
            self.0[n].2
        }
    }

    fn sample() -> Dom {
        Dom(vec![
            ("main", vec![("data-testid", "projects-page".into())], None),
            (
                "div",
                vec![
                    ("data-testid", "project-card-0".into()),
                    ("class", "card featured".into()),
                ],
                Some(0),
            ),
            ("span", vec![("class", "badge muted".into())], Some(1)),
            ("input", vec![("name", "email".into()), ("id", "email".into())], Some(0)),
        ])
    }

    fn matching(selector: &str) -> Vec<usize> {
        let dom = sample();
        let sel = Selector::parse(selector).unwrap();
        (0..dom.0.len()).filter(|&n| sel.matches(&dom, n)).collect()
    }

    mod match_tests {
        use super::*;

        #[test]
        fn test_tag_id_class() {
            assert_eq!(matching("span"), vec![2]);
            assert_eq!(matching("#email"), vec![3]);
            assert_eq!(matching(".featured"), vec![1]);
            assert_eq!(matching("div.card.featured"), vec![1]);
            assert_eq!(matching("*"), vec![0, 1, 2, 3]);
        }

        #[test]
        fn test_attribute_operators() {
            assert_eq!(matching("[data-testid='project-card-0']"), vec![1]);
            assert_eq!(matching("[data-testid^='project']"), vec![0, 1]);
            assert_eq!(matching("[data-testid^='project-']"), vec![1]);
            assert_eq!(matching("[class*='badge']"), vec![2]);
            assert_eq!(matching("[data-testid$=\"-page\"]"), vec![0]);
            assert_eq!(matching("[class~=muted]"), vec![2]);
            assert_eq!(matching("[name]"), vec![3]);
        }

        #[test]
        fn test_combinators() {
            assert_eq!(matching("main span"), vec![2]);
            assert_eq!(matching("main > span"), Vec::<usize>::new());
            assert_eq!(matching("main > div > span"), vec![2]);
            assert_eq!(matching("[data-testid='project-card-0'] [class*='badge']"), vec![2]);
        }

        #[test]
        fn test_groups() {
            assert_eq!(matching("span, input"), vec![2, 3]);
        }

        #[test]
        fn test_empty_prefix_matches_nothing() {
            assert!(matching("[data-testid^='']").is_empty());
        }

        #[test]
        fn test_every_locator_strategy_parses() {
            for loc in [
                Locator::test_id("hero-title"),
                Locator::test_id_prefix("blog-post-card-"),
                Locator::id("systems"),
                Locator::class_name("orbit-node"),
                Locator::tag("h1"),
                Locator::name("email"),
                Locator::owned(Strategy::TestId, "it's"),
            ] {
                assert!(Selector::parse(&loc.to_css()).is_ok(), "{loc}");
            }
        }

        #[test]
        fn test_escaped_quote_round_trips() {
            let css = format!("[data-testid='{}']", escape_css_string("it's"));
            let dom = Dom(vec![("p", vec![("data-testid", "it's".into())], None)]);
            assert!(Selector::parse(&css).unwrap().matches(&dom, 0));
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_invalid_selectors_are_driver_errors() {
            for bad in ["", "[data-testid='x'", "div >", "[a^b]", "a,", "p:hover"] {
                let err = Selector::parse(bad).unwrap_err();
                assert!(matches!(err, VitrinaError::Driver { .. }), "{bad}");
            }
        }
    }
}
