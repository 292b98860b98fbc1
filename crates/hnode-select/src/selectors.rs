//! Selector components and matching
//!
//! A complex selector is a chain of compound selectors joined by
//! combinators. Matching runs right to left: the rightmost compound must
//! match the candidate, then each combinator walks to the ancestors or
//! preceding siblings that have to match the compound on its left.

use crate::{SelectorList, SelectorTree};

/// Pseudo-element type
///
/// Recognized only so the parser can reject them with a precise error:
/// a pseudo-element never corresponds to a node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    Before,
    After,
    FirstLine,
    FirstLetter,
    Marker,
    Selection,
    Placeholder,
    Backdrop,
}

impl PseudoElement {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "first-line" => Some(Self::FirstLine),
            "first-letter" => Some(Self::FirstLetter),
            "marker" => Some(Self::Marker),
            "selection" => Some(Self::Selection),
            "placeholder" => Some(Self::Placeholder),
            "backdrop" => Some(Self::Backdrop),
            _ => None,
        }
    }

    /// Legacy pseudo-elements that may be written with a single colon
    pub fn allows_single_colon(&self) -> bool {
        matches!(self, Self::Before | Self::After | Self::FirstLine | Self::FirstLetter)
    }
}

/// Pseudo-class type
///
/// Only classes decidable from the tree itself; there is no interaction
/// state to consult.
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Attribute-derived
    Link,
    Checked,
    Disabled,
    Enabled,

    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

impl PseudoClass {
    /// Parse a pseudo-class without arguments
    pub fn parse_simple(name: &str) -> Option<Self> {
        let class = match name.to_ascii_lowercase().as_str() {
            "link" | "any-link" => Self::Link,
            "checked" => Self::Checked,
            "disabled" => Self::Disabled,
            "enabled" => Self::Enabled,
            "root" => Self::Root,
            "empty" => Self::Empty,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            "first-of-type" => Self::FirstOfType,
            "last-of-type" => Self::LastOfType,
            "only-of-type" => Self::OnlyOfType,
            _ => return None,
        };
        Some(class)
    }
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        // Try to parse as simple number
        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        // Parse An+B format
        let s = s.replace(' ', "");

        if let Some(n_pos) = s.find('n') {
            let a_str = &s[..n_pos];
            let a = if a_str.is_empty() || a_str == "+" {
                1
            } else if a_str == "-" {
                -1
            } else {
                a_str.parse().ok()?
            };

            let rest = &s[n_pos + 1..];
            let b = if rest.is_empty() {
                0
            } else {
                // "+3" parses as i32 directly; reject forms like "++3"
                let digits = rest.strip_prefix(['+', '-'])?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                rest.parse().ok()?
            };

            return Some(Self::new(a, b));
        }

        None
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        // Widened so that extreme coefficients cannot overflow
        let (n, a, b) = (i64::from(n), i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return n == b;
        }

        let diff = n - b;
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, val) = match (&self.matcher, value) {
            (None, found) => return found.is_some(),
            (Some(_), None) => return false,
            (Some(matcher), Some(val)) => (matcher, val),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_ascii_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(val);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{}-", expected))
            }
            // Empty needles never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Sequence of components that all apply to one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// Compound selectors joined by combinators, left to right
///
/// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Selector specificity (ids, classes, types)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl std::ops::Add for Specificity {
    type Output = Specificity;

    fn add(self, rhs: Self) -> Self {
        Specificity(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl CompoundSelector {
    pub fn specificity(&self) -> Specificity {
        self.components
            .iter()
            .map(|component| match component {
                SelectorComponent::Universal => Specificity::default(),
                SelectorComponent::Type(_) => Specificity(0, 0, 1),
                SelectorComponent::Id(_) => Specificity(1, 0, 0),
                SelectorComponent::Class(_) | SelectorComponent::Attribute(_) => Specificity(0, 1, 0),
                SelectorComponent::PseudoClass(PseudoClass::Where(_)) => Specificity::default(),
                SelectorComponent::PseudoClass(PseudoClass::Not(list) | PseudoClass::Is(list)) => {
                    list.specificity()
                }
                SelectorComponent::PseudoClass(_) => Specificity(0, 1, 0),
            })
            .fold(Specificity::default(), |acc, s| acc + s)
    }

    pub fn matches<T: SelectorTree>(&self, tree: &T, node: T::Handle) -> bool {
        self.components.iter().all(|c| match_component(c, tree, node))
    }
}

impl ComplexSelector {
    pub fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .map(CompoundSelector::specificity)
            .fold(Specificity::default(), |acc, s| acc + s)
    }

    /// Check whether `node` is matched by this selector
    pub fn matches<T: SelectorTree>(&self, tree: &T, node: T::Handle) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, node, n - 1),
        }
    }

    fn matches_at<T: SelectorTree>(&self, tree: &T, node: T::Handle, index: usize) -> bool {
        if !tree.is_element(node) || !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| self.matches_at(tree, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = tree.parent(node);
                while let Some(current) = ancestor {
                    if self.matches_at(tree, current, index - 1) {
                        return true;
                    }
                    ancestor = tree.parent(current);
                }
                false
            }
            Combinator::NextSibling => {
                previous_element(tree, node).is_some_and(|prev| self.matches_at(tree, prev, index - 1))
            }
            Combinator::SubsequentSibling => {
                let mut sibling = previous_element(tree, node);
                while let Some(current) = sibling {
                    if self.matches_at(tree, current, index - 1) {
                        return true;
                    }
                    sibling = previous_element(tree, current);
                }
                false
            }
        }
    }
}

fn previous_element<T: SelectorTree>(tree: &T, node: T::Handle) -> Option<T::Handle> {
    let mut sibling = tree.prev_sibling(node);
    while let Some(current) = sibling {
        if tree.is_element(current) {
            return Some(current);
        }
        sibling = tree.prev_sibling(current);
    }
    None
}

fn next_element<T: SelectorTree>(tree: &T, node: T::Handle) -> Option<T::Handle> {
    let mut sibling = tree.next_sibling(node);
    while let Some(current) = sibling {
        if tree.is_element(current) {
            return Some(current);
        }
        sibling = tree.next_sibling(current);
    }
    None
}

/// Position among element siblings
struct SiblingPosition {
    /// Index among siblings (1-based)
    index: i32,
    /// Total siblings count
    count: i32,
}

fn sibling_position<T: SelectorTree>(tree: &T, node: T::Handle, same_type: bool) -> SiblingPosition {
    let name = tree.local_name(node);
    let counts = |candidate: T::Handle| !same_type || tree.local_name(candidate) == name;

    let mut before = 0;
    let mut sibling = previous_element(tree, node);
    while let Some(current) = sibling {
        if counts(current) {
            before += 1;
        }
        sibling = previous_element(tree, current);
    }

    let mut after = 0;
    let mut sibling = next_element(tree, node);
    while let Some(current) = sibling {
        if counts(current) {
            after += 1;
        }
        sibling = next_element(tree, current);
    }

    SiblingPosition {
        index: before + 1,
        count: before + after + 1,
    }
}

/// Match a selector component against an element
pub fn match_component<T: SelectorTree>(component: &SelectorComponent, tree: &T, node: T::Handle) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => tree.local_name(node).is_some_and(|name| name.eq_ignore_ascii_case(tag)),
        SelectorComponent::Id(id) => tree.attribute(node, "id") == Some(id.as_str()),
        SelectorComponent::Class(class) => tree
            .attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        SelectorComponent::Attribute(attr) => attr.matches(tree.attribute(node, &attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, tree, node),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class<T: SelectorTree>(pseudo: &PseudoClass, tree: &T, node: T::Handle) -> bool {
    let tag_is = |tags: &[&str]| {
        tree.local_name(node)
            .is_some_and(|name| tags.iter().any(|t| name.eq_ignore_ascii_case(t)))
    };

    match pseudo {
        PseudoClass::Link => tag_is(&["a", "area"]) && tree.attribute(node, "href").is_some(),
        PseudoClass::Checked => tree.attribute(node, "checked").is_some() || tree.attribute(node, "selected").is_some(),
        PseudoClass::Disabled => tree.attribute(node, "disabled").is_some(),
        PseudoClass::Enabled => {
            tag_is(&["button", "input", "select", "textarea", "option", "fieldset"])
                && tree.attribute(node, "disabled").is_none()
        }

        PseudoClass::Root => tree.parent(node).is_some_and(|parent| tree.is_document(parent)),
        PseudoClass::Empty => tree.first_child(node).is_none(),
        PseudoClass::FirstChild => previous_element(tree, node).is_none(),
        PseudoClass::LastChild => next_element(tree, node).is_none(),
        PseudoClass::OnlyChild => previous_element(tree, node).is_none() && next_element(tree, node).is_none(),
        PseudoClass::FirstOfType => sibling_position(tree, node, true).index == 1,
        PseudoClass::LastOfType => {
            let pos = sibling_position(tree, node, true);
            pos.index == pos.count
        }
        PseudoClass::OnlyOfType => sibling_position(tree, node, true).count == 1,
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, node, false).index),
        PseudoClass::NthLastChild(expr) => {
            let pos = sibling_position(tree, node, false);
            expr.matches(pos.count - pos.index + 1)
        }
        PseudoClass::NthOfType(expr) => expr.matches(sibling_position(tree, node, true).index),
        PseudoClass::NthLastOfType(expr) => {
            let pos = sibling_position(tree, node, true);
            expr.matches(pos.count - pos.index + 1)
        }

        PseudoClass::Not(list) => !list.matches(tree, node),
        PseudoClass::Is(list) | PseudoClass::Where(list) => list.matches(tree, node),
    }
}
