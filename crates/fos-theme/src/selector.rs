//! Selectors
//!
//! A selector is stored as a flat list of parts, rightmost first: the
//! simple selectors of the subject compound come first, followed by a
//! combinator and the compound to its left, and so on. Matching starts
//! at the subject and walks left through the matcher's relatives.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::change::Change;
use crate::error::CssErrorKind;
use crate::matcher::{Matcher, StateFlags};
use crate::parser::CssParser;

/// Selector specificity, ordered lexicographically
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub elements: u32,
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.ids, self.classes, self.elements)
    }
}

/// Which end of the sibling list a position selector counts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PositionKind {
    Forward,
    Backward,
    Only,
    /// Accepted for compatibility; never matches
    Sorted,
}

/// A test on a single node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    Any,
    Name(Arc<str>),
    Class(Arc<str>),
    Id(Arc<str>),
    State(StateFlags),
    Position { kind: PositionKind, a: i32, b: i32 },
}

impl SimpleSelector {
    fn kind_name(&self, negated: bool) -> &'static str {
        match (self, negated) {
            (Self::Any, false) => "any",
            (Self::Name(_), false) => "name",
            (Self::Class(_), false) => "class",
            (Self::Id(_), false) => "id",
            (Self::State(_), false) => "pseudoclass_state",
            (Self::Position { .. }, false) => "pseudoclass_position",
            (Self::Any, true) => "not_any",
            (Self::Name(_), true) => "not_name",
            (Self::Class(_), true) => "not_class",
            (Self::Id(_), true) => "not_id",
            (Self::State(_), true) => "not_pseudoclass_state",
            (Self::Position { .. }, true) => "not_pseudoclass_position",
        }
    }

    pub fn matches(&self, matcher: &dyn Matcher) -> bool {
        match self {
            Self::Any => true,
            Self::Name(name) => matcher.has_name(name),
            Self::Class(class) => matcher.has_class(class),
            Self::Id(id) => matcher.has_id(id),
            Self::State(state) => matcher.state().contains(*state),
            Self::Position { kind, a, b } => match kind {
                PositionKind::Forward => matcher.has_position(true, *a, *b),
                PositionKind::Backward => matcher.has_position(false, *a, *b),
                PositionKind::Only => matcher.has_position(true, 0, 1) && matcher.has_position(false, 0, 1),
                PositionKind::Sorted => false,
            },
        }
    }

    /// Attributes the test looks at
    pub fn change(&self) -> Change {
        match self {
            Self::Any => Change::empty(),
            Self::Name(_) => Change::NAME,
            Self::Class(_) => Change::CLASS,
            Self::Id(_) => Change::ID,
            Self::State(_) => Change::STATE,
            Self::Position { kind, a, b } => match kind {
                PositionKind::Forward if (*a, *b) == (0, 1) => Change::FIRST_CHILD,
                PositionKind::Forward => Change::NTH_CHILD,
                PositionKind::Backward if (*a, *b) == (0, 1) => Change::LAST_CHILD,
                PositionKind::Backward => Change::NTH_LAST_CHILD,
                PositionKind::Only => Change::FIRST_CHILD | Change::LAST_CHILD,
                PositionKind::Sorted => Change::empty(),
            },
        }
    }

    fn add_specificity(&self, specificity: &mut Specificity) {
        match self {
            Self::Any => {}
            Self::Name(_) => specificity.elements += 1,
            Self::Id(_) => specificity.ids += 1,
            Self::Class(_) | Self::State(_) | Self::Position { .. } => specificity.classes += 1,
        }
    }

    /// Order of two tests of the same kind
    fn compare_payload(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Name(a), Self::Name(b)) | (Self::Class(a), Self::Class(b)) | (Self::Id(a), Self::Id(b)) => a.cmp(b),
            (Self::State(a), Self::State(b)) => a.bits().cmp(&b.bits()),
            (
                Self::Position { kind, a, b },
                Self::Position {
                    kind: other_kind,
                    a: other_a,
                    b: other_b,
                },
            ) => (kind, a, b).cmp(&(other_kind, other_a, other_b)),
            _ => Ordering::Equal,
        }
    }
}

fn write_nth(f: &mut fmt::Formatter<'_>, name: &str, a: i32, b: i32) -> fmt::Result {
    match (a, b) {
        (0, b) => write!(f, ":nth-{name}({b})"),
        (2, 0) => write!(f, ":nth-{name}(even)"),
        (2, 1) => write!(f, ":nth-{name}(odd)"),
        (a, b) => {
            write!(f, ":nth-{name}(")?;
            match a {
                1 => f.write_str("n")?,
                -1 => f.write_str("-n")?,
                a => write!(f, "{a}n")?,
            }
            match b.cmp(&0) {
                Ordering::Greater => write!(f, "+{b})"),
                Ordering::Less => write!(f, "{b})"),
                Ordering::Equal => f.write_str(")"),
            }
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Name(name) => f.write_str(name),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::State(state) => {
                for flag in state.iter() {
                    if let Some(name) = flag.pseudo_class_name() {
                        write!(f, ":{name}")?;
                    }
                }
                Ok(())
            }
            Self::Position { kind, a, b } => match kind {
                PositionKind::Forward if (*a, *b) == (0, 1) => f.write_str(":first-child"),
                PositionKind::Forward => write_nth(f, "child", *a, *b),
                PositionKind::Backward if (*a, *b) == (0, 1) => f.write_str(":last-child"),
                PositionKind::Backward => write_nth(f, "last-child", *a, *b),
                PositionKind::Only => f.write_str(":only-child"),
                PositionKind::Sorted => f.write_str(":sorted"),
            },
        }
    }
}

/// Relationship between two compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a ~ b`
    Sibling,
    /// `a + b`
    Adjacent,
}

impl Combinator {
    fn kind_name(self) -> &'static str {
        match self {
            Self::Descendant => "descendant",
            Self::Child => "child",
            Self::Sibling => "sibling",
            Self::Adjacent => "adjacent",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::Sibling => " ~ ",
            Self::Adjacent => " + ",
        }
    }

    /// Map the change bits of the selectors to the left of the combinator
    fn change(self, previous: Change) -> Change {
        match self {
            Self::Descendant | Self::Child => previous.for_child(),
            Self::Sibling | Self::Adjacent => previous.for_sibling(),
        }
    }

    /// Call `f` on every relative the left-hand compound may match,
    /// stopping at the first `true`
    fn for_each_matcher(self, matcher: &dyn Matcher, f: &mut dyn FnMut(&dyn Matcher) -> bool) -> bool {
        match self {
            Self::Descendant => for_each_ancestor(matcher, f),
            Self::Child => matcher.parent().is_some_and(|parent| f(parent.as_ref())),
            Self::Sibling => for_each_previous(matcher, f),
            Self::Adjacent => matcher.previous().is_some_and(|previous| f(previous.as_ref())),
        }
    }
}

fn for_each_ancestor(matcher: &dyn Matcher, f: &mut dyn FnMut(&dyn Matcher) -> bool) -> bool {
    let Some(parent) = matcher.parent() else {
        return false;
    };
    if f(parent.as_ref()) {
        return true;
    }
    // every further ancestor of an any-matcher matches the same way
    if parent.matches_any() {
        return false;
    }
    for_each_ancestor(parent.as_ref(), f)
}

fn for_each_previous(matcher: &dyn Matcher, f: &mut dyn FnMut(&dyn Matcher) -> bool) -> bool {
    let Some(previous) = matcher.previous() else {
        return false;
    };
    if f(previous.as_ref()) {
        return true;
    }
    if previous.matches_any() {
        return false;
    }
    for_each_previous(previous.as_ref(), f)
}

/// One element of a selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorPart {
    Simple { test: SimpleSelector, negated: bool },
    Combinator(Combinator),
}

impl SelectorPart {
    fn simple(test: SimpleSelector) -> Self {
        Self::Simple { test, negated: false }
    }

    fn negated(test: SimpleSelector) -> Self {
        Self::Simple { test, negated: true }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple { .. })
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Simple { test, negated } => test.kind_name(*negated),
            Self::Combinator(combinator) => combinator.kind_name(),
        }
    }

    /// Test this part alone; combinators always pass
    pub fn match_one(&self, matcher: &dyn Matcher) -> bool {
        match self {
            Self::Simple { test, negated } => test.matches(matcher) != *negated,
            Self::Combinator(_) => true,
        }
    }

    /// The matchers the part to the left has to be tested against. For a
    /// simple selector that is the matcher itself.
    pub fn for_each_matcher(&self, matcher: &dyn Matcher, f: &mut dyn FnMut(&dyn Matcher) -> bool) -> bool {
        match self {
            Self::Simple { .. } => f(matcher),
            Self::Combinator(combinator) => combinator.for_each_matcher(matcher, f),
        }
    }

    /// Change bits of this part combined with those of the parts to its
    /// left
    pub fn change(&self, previous: Change) -> Change {
        match self {
            Self::Simple { test, .. } => previous | test.change(),
            Self::Combinator(combinator) => combinator.change(previous),
        }
    }

    /// Total order used to build selector trees: by kind name, then by
    /// payload
    pub fn compare_one(&self, other: &SelectorPart) -> Ordering {
        match (self, other) {
            (Self::Simple { test: a, negated: na }, Self::Simple { test: b, negated: nb })
                if na == nb && std::mem::discriminant(a) == std::mem::discriminant(b) =>
            {
                a.compare_payload(b)
            }
            _ => self.kind_name().cmp(other.kind_name()),
        }
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple { test, negated: false } => write!(f, "{test}"),
            Self::Simple { test, negated: true } => write!(f, ":not({test})"),
            Self::Combinator(combinator) => f.write_str(combinator.as_str()),
        }
    }
}

/// A complex selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Rightmost part first
    parts: Vec<SelectorPart>,
}

impl Selector {
    /// Parts in matching order, subject first
    pub fn parts(&self) -> &[SelectorPart] {
        &self.parts
    }

    pub fn matches(&self, matcher: &dyn Matcher) -> bool {
        let Some(subject) = self.parts.first() else {
            return false;
        };
        subject.match_one(matcher) && subject.for_each_matcher(matcher, &mut |m| self.match_previous(0, m))
    }

    /// Continue matching with the part left of `index`, which matched
    fn match_previous(&self, index: usize, matcher: &dyn Matcher) -> bool {
        let Some(previous) = self.parts.get(index + 1) else {
            return true;
        };
        previous.match_one(matcher) && previous.for_each_matcher(matcher, &mut |m| self.match_previous(index + 1, m))
    }

    pub fn specificity(&self) -> Specificity {
        let mut specificity = Specificity::default();
        for part in &self.parts {
            if let SelectorPart::Simple { test, .. } = part {
                test.add_specificity(&mut specificity);
            }
        }
        specificity
    }

    /// Attribute changes that can change whether the selector matches
    pub fn change(&self) -> Change {
        self.parts
            .iter()
            .rev()
            .fold(Change::empty(), |previous, part| part.change(previous))
    }

    /// Order by specificity
    pub fn compare(&self, other: &Selector) -> Ordering {
        self.specificity().cmp(&other.specificity())
    }

    /// Parse one complex selector, stopping in front of `,`, `{` or the
    /// end of input
    pub fn parse(parser: &mut CssParser<'_>) -> Option<Selector> {
        let mut parts = Vec::new();

        loop {
            parse_simple_selector(parser, &mut parts)?;
            if parser.is_eof() || parser.begins_with(',') || parser.begins_with('{') {
                break;
            }

            let combinator = if parser.try_literal("+", true) {
                Combinator::Adjacent
            } else if parser.try_literal("~", true) {
                Combinator::Sibling
            } else if parser.try_literal(">", true) {
                Combinator::Child
            } else {
                Combinator::Descendant
            };
            parts.push(SelectorPart::Combinator(combinator));
        }

        parts.reverse();
        Some(Selector { parts })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in self.parts.iter().rev() {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

// ---- parsing --------------------------------------------------------------

#[derive(Clone, Copy, PartialEq)]
enum PseudoTest {
    State(StateFlags),
    Position(PositionKind, i32, i32),
}

struct PseudoClass {
    name: &'static str,
    deprecated: bool,
    test: PseudoTest,
}

const fn state(name: &'static str, deprecated: bool, flag: StateFlags) -> PseudoClass {
    PseudoClass {
        name,
        deprecated,
        test: PseudoTest::State(flag),
    }
}

const fn position(name: &'static str, deprecated: bool, kind: PositionKind, a: i32, b: i32) -> PseudoClass {
    PseudoClass {
        name,
        deprecated,
        test: PseudoTest::Position(kind, a, b),
    }
}

/// Tried in order as prefixes, so a deprecated alias comes right before
/// its replacement
const PSEUDO_CLASSES: &[PseudoClass] = &[
    position("first-child", false, PositionKind::Forward, 0, 1),
    position("last-child", false, PositionKind::Backward, 0, 1),
    position("only-child", false, PositionKind::Only, 0, 0),
    position("sorted", true, PositionKind::Sorted, 0, 0),
    state("active", false, StateFlags::ACTIVE),
    state("prelight", true, StateFlags::HOVER),
    state("hover", false, StateFlags::HOVER),
    state("selected", false, StateFlags::SELECTED),
    state("insensitive", true, StateFlags::DISABLED),
    state("disabled", false, StateFlags::DISABLED),
    state("inconsistent", true, StateFlags::INDETERMINATE),
    state("indeterminate", false, StateFlags::INDETERMINATE),
    state("focused", true, StateFlags::FOCUS),
    state("focus", false, StateFlags::FOCUS),
    state("backdrop", false, StateFlags::BACKDROP),
    state("dir(ltr)", false, StateFlags::DIR_LTR),
    state("dir(rtl)", false, StateFlags::DIR_RTL),
    state("link", false, StateFlags::LINK),
    state("visited", false, StateFlags::VISITED),
    state("checked", false, StateFlags::CHECKED),
    state("drop(active)", false, StateFlags::DROP_ACTIVE),
];

fn parse_simple_selector(parser: &mut CssParser<'_>, parts: &mut Vec<SelectorPart>) -> Option<()> {
    let mut parsed_something = false;

    if let Some(name) = parser.try_ident(false) {
        parts.push(SelectorPart::simple(SimpleSelector::Name(Arc::from(name))));
        parsed_something = true;
    } else if parser.try_literal("*", false) {
        parts.push(SelectorPart::simple(SimpleSelector::Any));
        parsed_something = true;
    }

    loop {
        let part = if parser.try_literal("#", false) {
            parse_id(parser, false)?
        } else if parser.try_literal(".", false) {
            parse_class(parser, false)?
        } else if parser.try_literal(":not(", true) {
            parse_negation(parser)?
        } else if parser.try_literal(":", false) {
            parse_pseudo_class(parser, false)?
        } else if !parsed_something {
            parser.error("Expected a valid selector");
            return None;
        } else {
            break;
        };

        parts.push(part);
        parsed_something = true;
        if parser.is_eof() {
            break;
        }
    }

    parser.skip_whitespace();
    Some(())
}

fn simple_part(test: SimpleSelector, negated: bool) -> SelectorPart {
    if negated {
        SelectorPart::negated(test)
    } else {
        SelectorPart::simple(test)
    }
}

fn parse_class(parser: &mut CssParser<'_>, negated: bool) -> Option<SelectorPart> {
    let Some(name) = parser.try_name(false) else {
        parser.error("Expected a valid name for class");
        return None;
    };
    Some(simple_part(SimpleSelector::Class(Arc::from(name)), negated))
}

fn parse_id(parser: &mut CssParser<'_>, negated: bool) -> Option<SelectorPart> {
    let Some(name) = parser.try_name(false) else {
        parser.error("Expected a valid name for id");
        return None;
    };
    Some(simple_part(SimpleSelector::Id(Arc::from(name)), negated))
}

fn parse_negation(parser: &mut CssParser<'_>) -> Option<SelectorPart> {
    let part = if let Some(name) = parser.try_ident(false) {
        SelectorPart::negated(SimpleSelector::Name(Arc::from(name)))
    } else if parser.try_literal("*", false) {
        SelectorPart::negated(SimpleSelector::Any)
    } else if parser.try_literal("#", false) {
        parse_id(parser, true)?
    } else if parser.try_literal(".", false) {
        parse_class(parser, true)?
    } else if parser.try_literal(":", false) {
        parse_pseudo_class(parser, true)?
    } else {
        parser.error("Not a valid selector for :not()");
        return None;
    };

    parser.skip_whitespace();
    if !parser.try_literal(")", false) {
        parser.error("Missing closing bracket for :not()");
        return None;
    }
    Some(part)
}

fn parse_pseudo_class(parser: &mut CssParser<'_>, negated: bool) -> Option<SelectorPart> {
    if parser.try_literal("nth-child", false) {
        return parse_nth_child(parser, PositionKind::Forward, negated);
    }
    if parser.try_literal("nth-last-child", false) {
        return parse_nth_child(parser, PositionKind::Backward, negated);
    }

    for (i, pseudo) in PSEUDO_CLASSES.iter().enumerate() {
        if !parser.try_literal(pseudo.name, false) {
            continue;
        }

        if pseudo.deprecated {
            let message = match PSEUDO_CLASSES.get(i + 1) {
                Some(next) if next.test == pseudo.test => {
                    format!("The :{} pseudo-class is deprecated. Use :{} instead.", pseudo.name, next.name)
                }
                _ => format!("The :{} pseudo-class is deprecated.", pseudo.name),
            };
            parser.error_full(CssErrorKind::Deprecated, message);
        }

        let test = match pseudo.test {
            PseudoTest::State(flag) => SimpleSelector::State(flag),
            PseudoTest::Position(kind, a, b) => SimpleSelector::Position { kind, a, b },
        };
        return Some(simple_part(test, negated));
    }

    parser.error("Invalid name of pseudo-class");
    None
}

fn parse_sign(parser: &mut CssParser<'_>) -> i32 {
    if parser.try_literal("-", true) {
        -1
    } else {
        parser.try_literal("+", true);
        1
    }
}

fn parse_nth_child(parser: &mut CssParser<'_>, mut kind: PositionKind, negated: bool) -> Option<SelectorPart> {
    if !parser.try_literal("(", true) {
        parser.error("Missing opening bracket for pseudo-class");
        return None;
    }

    let (a, b) = if parser.try_literal("even", true) {
        (2, 0)
    } else if parser.try_literal("odd", true) {
        (2, 1)
    } else if kind == PositionKind::Forward && parser.try_literal("first", true) {
        (0, 1)
    } else if kind == PositionKind::Forward && parser.try_literal("last", true) {
        kind = PositionKind::Backward;
        (0, 1)
    } else {
        let sign = parse_sign(parser);
        let a = match parser.try_int() {
            Some(a) if a < 0 => {
                parser.error("Expected an integer");
                return None;
            }
            Some(a) => a * sign,
            None if parser.has_prefix("n") => sign,
            None => {
                parser.error("Expected an integer");
                return None;
            }
        };

        if parser.try_literal("n", true) {
            let sign = parse_sign(parser);
            let b = match parser.try_int() {
                Some(b) if b < 0 => {
                    parser.error("Expected an integer");
                    return None;
                }
                Some(b) => b,
                None => 0,
            };
            (a, b * sign)
        } else {
            (0, a)
        }
    };

    if !parser.try_literal(")", false) {
        parser.error("Missing closing bracket for pseudo-class");
        return None;
    }

    Some(simple_part(SimpleSelector::Position { kind, a, b }, negated))
}
