//! Parser for the textual rule language.
//!
//! ```text
//! rule       := IF or_expr THEN consequent
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := factor (AND factor)*
//! factor     := "(" or_expr ")" | ident IS ident
//! consequent := ident IS ident | ident
//! ```
//!
//! Keywords are case-insensitive and reserved; AND binds tighter than OR.
//! Parentheses nest at most [`MAX_NESTING`] levels deep.

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while};
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{all_consuming, map, recognize};
use nom::error::{Error as NomError, ErrorKind};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{Err as NomErr, IResult};

use crate::ast::{Antecedent, Consequent, Rule};
use crate::error::RuleParseError;

const KEYWORDS: [&str; 5] = ["if", "then", "is", "and", "or"];

/// Deepest parenthesis nesting a rule may use.
pub const MAX_NESTING: usize = 32;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// A keyword as a whole word, after optional whitespace.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (rest, matched) = preceded(multispace0, tag_no_case(kw))(input)?;
        if rest.starts_with(is_ident_char) {
            return Err(NomErr::Error(NomError::new(input, ErrorKind::Tag)));
        }
        Ok((rest, matched))
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    let (rest, word) = preceded(
        multispace0,
        recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
    )(input)?;
    if is_keyword(word) {
        return Err(NomErr::Error(NomError::new(input, ErrorKind::Verify)));
    }
    Ok((rest, word))
}

fn condition(input: &str) -> IResult<&str, Antecedent> {
    map(
        tuple((identifier, keyword("IS"), identifier)),
        |(variable, _, term)| Antecedent::is(variable, term),
    )(input)
}

fn group(input: &str) -> IResult<&str, Antecedent> {
    delimited(
        preceded(multispace0, char('(')),
        or_expr,
        preceded(multispace0, char(')')),
    )(input)
}

fn factor(input: &str) -> IResult<&str, Antecedent> {
    alt((group, condition))(input)
}

fn collapse(mut items: Vec<Antecedent>, join: fn(Vec<Antecedent>) -> Antecedent) -> Antecedent {
    if items.len() == 1 {
        items.remove(0)
    } else {
        join(items)
    }
}

fn and_expr(input: &str) -> IResult<&str, Antecedent> {
    map(separated_list1(keyword("AND"), factor), |items| {
        collapse(items, Antecedent::And)
    })(input)
}

fn or_expr(input: &str) -> IResult<&str, Antecedent> {
    map(separated_list1(keyword("OR"), and_expr), |items| {
        collapse(items, Antecedent::Or)
    })(input)
}

fn consequent(input: &str) -> IResult<&str, Consequent> {
    alt((
        map(
            tuple((identifier, keyword("IS"), identifier)),
            |(variable, _, term)| Consequent::new(variable, term),
        ),
        map(identifier, |term| Consequent::term(term)),
    ))(input)
}

fn rule(input: &str) -> IResult<&str, Rule> {
    map(
        tuple((
            keyword("IF"),
            or_expr,
            keyword("THEN"),
            terminated(consequent, multispace0),
        )),
        |(_, antecedent, _, consequent)| Rule::new(antecedent, consequent),
    )(input)
}

/// Parses one rule, e.g. `IF fbs IS diabetic THEN risk IS high_risk`.
pub fn parse_rule(source: &str) -> Result<Rule, RuleParseError> {
    check_nesting(source)?;
    match all_consuming(rule)(source) {
        Ok((_, parsed)) => {
            log::trace!("parsed rule: {parsed}");
            Ok(parsed)
        }
        Err(NomErr::Error(e)) | Err(NomErr::Failure(e)) => Err(error_at(source, e.input)),
        Err(NomErr::Incomplete(_)) => Err(error_at(source, "")),
    }
}

/// Parses an antecedent expression on its own, without IF/THEN.
pub fn parse_antecedent(source: &str) -> Result<Antecedent, RuleParseError> {
    check_nesting(source)?;
    match all_consuming(terminated(or_expr, multispace0))(source) {
        Ok((_, parsed)) => Ok(parsed),
        Err(NomErr::Error(e)) | Err(NomErr::Failure(e)) => Err(error_at(source, e.input)),
        Err(NomErr::Incomplete(_)) => Err(error_at(source, "")),
    }
}

/// Rejects input nested deeper than [`MAX_NESTING`] before the recursive
/// descent starts.
fn check_nesting(source: &str) -> Result<(), RuleParseError> {
    let mut depth = 0usize;
    for (i, c) in source.chars().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => continue,
        }
        if depth > MAX_NESTING {
            return Err(RuleParseError {
                source_text: source.to_string(),
                column: i + 1,
                message: format!("parentheses nested deeper than {MAX_NESTING} levels"),
            });
        }
    }
    Ok(())
}

fn error_at(source: &str, remaining: &str) -> RuleParseError {
    let remaining = remaining.trim_start();
    let offset = source.len().saturating_sub(remaining.len());
    let column = source[..offset].chars().count() + 1;
    let message = match remaining.split_whitespace().next() {
        Some(word) => format!("unexpected '{word}'"),
        None => "unexpected end of rule".to_string(),
    };
    RuleParseError {
        source_text: source.to_string(),
        column,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_conjunction() {
        let r = parse_rule("IF fbs IS prediabetic AND bmi IS obese AND age IS old THEN high_risk")
            .unwrap();
        assert_eq!(
            r.antecedent,
            Antecedent::and([
                Antecedent::is("fbs", "prediabetic"),
                Antecedent::is("bmi", "obese"),
                Antecedent::is("age", "old"),
            ])
        );
        assert_eq!(r.consequent, Consequent::term("high_risk"));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let a = parse_antecedent("a IS x OR b IS y AND c IS z").unwrap();
        assert_eq!(
            a,
            Antecedent::or([
                Antecedent::is("a", "x"),
                Antecedent::and([Antecedent::is("b", "y"), Antecedent::is("c", "z")]),
            ])
        );
    }

    #[test]
    fn parentheses_group_and_keywords_ignore_case() {
        let r = parse_rule(
            "if fbs is prediabetic and (bmi Is obese or age IS old) then risk is high_risk",
        )
        .unwrap();
        assert_eq!(
            r.antecedent,
            Antecedent::and([
                Antecedent::is("fbs", "prediabetic"),
                Antecedent::or([Antecedent::is("bmi", "obese"), Antecedent::is("age", "old")]),
            ])
        );
        assert_eq!(r.consequent, Consequent::new("risk", "high_risk"));
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let text = "IF fbs IS prediabetic AND (bmi IS obese OR age IS very_old) THEN risk IS high_risk";
        let r: Rule = text.parse().unwrap();
        assert_eq!(r.to_string(), text);
    }

    #[test]
    fn identifiers_may_contain_keyword_prefixes() {
        // `island`, `order` and `android` start with keywords but are plain names.
        let r = parse_rule("IF island IS order THEN android").unwrap();
        assert_eq!(r.antecedent, Antecedent::is("island", "order"));
        assert_eq!(r.consequent, Consequent::term("android"));
    }

    #[test]
    fn missing_is_reports_the_column() {
        let err = parse_rule("IF fbs diabetic THEN high_risk").unwrap_err();
        assert_eq!(err.column, 8);
        assert_eq!(err.message, "unexpected 'diabetic'");
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse_rule("IF fbs IS diabetic THEN high_risk extra").unwrap_err();
        assert_eq!(err.message, "unexpected 'extra'");
    }

    #[test]
    fn missing_consequent_is_rejected() {
        let err = parse_rule("IF fbs IS diabetic THEN").unwrap_err();
        assert_eq!(err.message, "unexpected end of rule");
        assert!(parse_rule("fbs IS diabetic THEN high_risk").is_err());
        assert!(parse_rule("IF (fbs IS diabetic THEN high_risk").is_err());
    }

    #[test]
    fn nesting_is_limited() {
        let nested = |depth: usize| {
            format!("IF {}a IS x{} THEN y", "(".repeat(depth), ")".repeat(depth))
        };

        let r = parse_rule(&nested(MAX_NESTING)).unwrap();
        assert_eq!(r.antecedent, Antecedent::is("a", "x"));

        let err = parse_rule(&nested(MAX_NESTING + 1)).unwrap_err();
        // "IF " occupies columns 1 to 3
        assert_eq!(err.column, 3 + MAX_NESTING + 1);
        assert_eq!(err.message, "parentheses nested deeper than 32 levels");

        let deep = format!("{}a IS x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(parse_antecedent(&deep).is_err());
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(parse_rule("IF and IS x THEN y").is_err());
    }
}
