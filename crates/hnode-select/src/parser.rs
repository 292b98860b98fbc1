//! Selector text parser
//!
//! Recursive descent over the characters of the selector. Supported
//! grammar: selector lists, the four combinators, type / universal / id /
//! class / attribute selectors and the pseudo-classes in [`PseudoClass`].

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, PseudoElement, SelectorComponent,
};
use crate::{SelectorError, SelectorList};

pub(crate) struct SelectorParser {
    chars: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Parse the whole input as a selector list
    pub fn parse(mut self) -> Result<Vec<ComplexSelector>, SelectorError> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(SelectorError::Empty);
        }
        let list = self.parse_list(false)?;
        match self.peek() {
            None => Ok(list),
            Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: self.pos - 1 }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// Skip whitespace, reporting whether any was consumed
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// `complex (',' complex)*`, stopping before `)` when nested
    fn parse_list(&mut self, nested: bool) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut selectors = vec![self.parse_complex()?];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    selectors.push(self.parse_complex()?);
                }
                Some(')') if nested => return Ok(selectors),
                None if !nested => return Ok(selectors),
                None => return Err(SelectorError::UnexpectedEnd),
                Some(ch) => return Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(ch) if had_space && starts_compound(ch) => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.parse_compound()?);
                    continue;
                }
                _ => break,
            };
            self.pos += 1;
            self.skip_whitespace();
            if self.peek().is_none_or(|ch| !starts_compound(ch)) {
                return Err(SelectorError::DanglingCombinator);
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                compound.components.push(SelectorComponent::Universal);
            }
            Some(ch) if starts_ident(ch) => {
                let tag = self.parse_ident()?;
                compound.components.push(SelectorComponent::Type(tag.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            let component = match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    SelectorComponent::Id(self.parse_ident()?)
                }
                Some('.') => {
                    self.pos += 1;
                    SelectorComponent::Class(self.parse_ident()?)
                }
                Some('[') => SelectorComponent::Attribute(self.parse_attribute()?),
                Some(':') => SelectorComponent::PseudoClass(self.parse_pseudo()?),
                _ => break,
            };
            compound.components.push(component);
        }

        if compound.components.is_empty() {
            return match self.peek() {
                Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.pos += 1;
                ident.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?);
            } else if is_ident_char(ch) {
                self.pos += 1;
                ident.push(ch);
            } else {
                break;
            }
        }

        if ident.is_empty() {
            return match self.peek() {
                Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(ident)
    }

    /// `'[' name (op value flag?)? ']'`
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                self.expect('=')?;
                op
            }
            Some(ch) => return Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
            None => return Err(SelectorError::UnexpectedEnd),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.pos += 1;
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }
        self.expect(']')?;

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    /// Quoted string body; the opening quote is already consumed
    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => value.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?),
                Some(ch) if ch == quote => return Ok(value),
                Some(ch) => value.push(ch),
                None => return Err(SelectorError::UnexpectedEnd),
            }
        }
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        self.expect(':')?;
        if self.peek() == Some(':') {
            self.pos += 1;
            let name = self.parse_ident()?;
            return Err(SelectorError::UnsupportedPseudoElement(name));
        }

        let name = self.parse_ident()?;
        if self.peek() != Some('(') {
            if PseudoElement::parse(&name).is_some_and(|pe| pe.allows_single_colon()) {
                return Err(SelectorError::UnsupportedPseudoElement(name));
            }
            return PseudoClass::parse_simple(&name).ok_or(SelectorError::UnknownPseudoClass(name));
        }

        self.pos += 1;
        let lower = name.to_ascii_lowercase();
        let pseudo = match lower.as_str() {
            "nth-child" => PseudoClass::NthChild(self.parse_nth_argument()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.parse_nth_argument()?),
            "nth-of-type" => PseudoClass::NthOfType(self.parse_nth_argument()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.parse_nth_argument()?),
            "not" | "is" | "where" => {
                self.skip_whitespace();
                let list = SelectorList::from_selectors(self.parse_list(true)?);
                match lower.as_str() {
                    "not" => PseudoClass::Not(list),
                    "is" => PseudoClass::Is(list),
                    _ => PseudoClass::Where(list),
                }
            }
            _ => return Err(SelectorError::UnknownPseudoClass(name)),
        };
        self.expect(')')?;
        Ok(pseudo)
    }

    /// Raw text up to the closing parenthesis, parsed as An+B
    fn parse_nth_argument(&mut self) -> Result<NthExpression, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch != ')') {
            self.pos += 1;
        }
        if self.at_end() {
            return Err(SelectorError::UnexpectedEnd);
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        NthExpression::parse(&raw).ok_or(SelectorError::InvalidNth(raw.trim().to_string()))
    }
}

fn starts_ident(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '-' || ch == '\\' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}

fn starts_compound(ch: char) -> bool {
    matches!(ch, '*' | '#' | '.' | '[' | ':') || starts_ident(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
        SelectorParser::new(input).parse()
    }

    #[test]
    fn test_parse_compound() {
        let list = parse("div#main.a.b").unwrap();
        assert_eq!(
            list[0].compounds[0].components,
            vec![
                SelectorComponent::Type("div".to_string()),
                SelectorComponent::Id("main".to_string()),
                SelectorComponent::Class("a".to_string()),
                SelectorComponent::Class("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_combinators() {
        let list = parse("ul > li + li ~ p a").unwrap();
        assert_eq!(
            list[0].combinators,
            vec![
                Combinator::Child,
                Combinator::NextSibling,
                Combinator::SubsequentSibling,
                Combinator::Descendant,
            ]
        );
        assert_eq!(list[0].compounds.len(), 5);
    }

    #[test]
    fn test_parse_combinator_without_spaces() {
        let list = parse("ul>li").unwrap();
        assert_eq!(list[0].combinators, vec![Combinator::Child]);
    }

    #[test]
    fn test_parse_list() {
        let list = parse(" h1 , h2,h3 ").unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_parse_attribute_forms() {
        let list = parse(r#"[href][type="text" i][lang|=en][data-x^='a b']"#).unwrap();
        let components = &list[0].compounds[0].components;
        assert_eq!(components.len(), 4);
        assert_eq!(
            components[1],
            SelectorComponent::Attribute(AttributeSelector {
                name: "type".to_string(),
                matcher: Some(AttributeMatcher::Exact("text".to_string())),
                case_insensitive: true,
            })
        );
        assert_eq!(
            components[3],
            SelectorComponent::Attribute(AttributeSelector {
                name: "data-x".to_string(),
                matcher: Some(AttributeMatcher::Prefix("a b".to_string())),
                case_insensitive: false,
            })
        );
    }

    #[test]
    fn test_parse_pseudo_classes() {
        let list = parse("li:nth-child(2n+1):not(.skip, #x):first-child").unwrap();
        let components = &list[0].compounds[0].components;
        assert_eq!(components.len(), 4);
        assert_eq!(
            components[1],
            SelectorComponent::PseudoClass(PseudoClass::NthChild(NthExpression::new(2, 1)))
        );
        match &components[2] {
            SelectorComponent::PseudoClass(PseudoClass::Not(inner)) => {
                assert_eq!(inner.selectors().len(), 2)
            }
            other => panic!("expected :not, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_escaped_ident() {
        let list = parse(r".a\:b").unwrap();
        assert_eq!(
            list[0].compounds[0].components,
            vec![SelectorComponent::Class("a:b".to_string())]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(SelectorError::Empty));
        assert_eq!(parse("   "), Err(SelectorError::Empty));
        assert_eq!(parse("div >"), Err(SelectorError::DanglingCombinator));
        assert_eq!(parse("div,"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(parse("[attr"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(parse("p:hover"), Err(SelectorError::UnknownPseudoClass("hover".to_string())));
        assert_eq!(
            parse("p::before"),
            Err(SelectorError::UnsupportedPseudoElement("before".to_string()))
        );
        assert_eq!(
            parse("p:after"),
            Err(SelectorError::UnsupportedPseudoElement("after".to_string()))
        );
        assert_eq!(parse("li:nth-child(x)"), Err(SelectorError::InvalidNth("x".to_string())));
        assert!(matches!(parse("div)"), Err(SelectorError::UnexpectedChar { ch: ')', .. })));
        assert!(matches!(parse(">div"), Err(SelectorError::UnexpectedChar { ch: '>', .. })));
    }
}
