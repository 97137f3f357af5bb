use semver::Version;

use crate::comparators::{Bound, Range};
use crate::version_utils::{PartialVersion, clean_version_text, increment, parse_partial_version};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterThanOrEqual,
    LessThanOrEqual,
    GreaterThan,
    LessThan,
    Caret,
    Tilde,
    /// A plain version, with or without a leading `=`.
    Exact,
}

impl Operator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Exact => "",
        }
    }
}

// Longest prefixes first so `>=` is not read as `>`.
const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterThanOrEqual),
    ("<=", Operator::LessThanOrEqual),
    (">", Operator::GreaterThan),
    ("<", Operator::LessThan),
    ("^", Operator::Caret),
    ("~>", Operator::Tilde),
    ("~", Operator::Tilde),
    ("=", Operator::Exact),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeToken {
    pub operator: Operator,
    pub version: String,
}

/// One `||`-separated clause of a range, before comparator expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Tokens(Vec<RangeToken>),
    Hyphen { lower: String, upper: String },
}

impl Clause {
    fn canonical(&self) -> String {
        match self {
            Self::Tokens(tokens) => tokens
                .iter()
                .map(|token| {
                    if is_wildcard_text(&token.version) {
                        "*".to_string()
                    } else {
                        format!("{}{}", token.operator.symbol(), token.version)
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
            Self::Hyphen { lower, upper } => format!("{lower} - {upper}"),
        }
    }
}

fn is_wildcard_text(version: &str) -> bool {
    matches!(version, "*" | "x" | "X" | "")
}

/// Split a range into clauses and tokens without interpreting versions.
pub fn tokenize_range(range_str: &str) -> Result<Vec<Clause>, String> {
    let range_str = range_str.trim();

    if range_str.is_empty() || range_str == "*" {
        return Ok(vec![wildcard_clause()]);
    }

    let mut clauses = Vec::new();
    for clause in range_str.split("||").map(str::trim) {
        if clause.is_empty() {
            continue;
        }
        clauses.push(tokenize_clause(clause)?);
    }

    if clauses.is_empty() {
        return Ok(vec![wildcard_clause()]);
    }

    Ok(clauses)
}

fn wildcard_clause() -> Clause {
    Clause::Tokens(vec![RangeToken {
        operator: Operator::Exact,
        version: "*".to_string(),
    }])
}

fn tokenize_clause(clause: &str) -> Result<Clause, String> {
    if let Some((lower, upper)) = clause.split_once(" - ") {
        let lower = clean_version_text(lower);
        let upper = clean_version_text(upper);
        if lower.is_empty()
            || upper.is_empty()
            || lower.contains(char::is_whitespace)
            || upper.contains(char::is_whitespace)
        {
            return Err(format!("Invalid hyphen range '{clause}'"));
        }
        return Ok(Clause::Hyphen {
            lower: lower.to_string(),
            upper: upper.to_string(),
        });
    }

    let mut tokens = Vec::new();
    let mut remaining = clause.trim();

    while !remaining.is_empty() {
        let (operator, rest) = OPERATORS
            .iter()
            .find_map(|(prefix, operator)| {
                remaining
                    .strip_prefix(*prefix)
                    .map(|rest| (*operator, rest))
            })
            .unwrap_or((Operator::Exact, remaining));

        let (version_str, next) = extract_version_and_remaining(rest)?;
        tokens.push(RangeToken {
            operator,
            version: clean_version_text(version_str).to_string(),
        });
        remaining = next.trim_start();
    }

    if tokens.is_empty() {
        return Ok(wildcard_clause());
    }

    Ok(Clause::Tokens(tokens))
}

fn extract_version_and_remaining(input: &str) -> Result<(&str, &str), String> {
    let input = input.trim_start();

    if input.is_empty() {
        return Err("Expected version string but found end of input".to_string());
    }

    let end_pos = input
        .char_indices()
        .find(|(idx, ch)| ch.is_whitespace() || (*idx > 0 && ['>', '<', '^', '~'].contains(ch)))
        .map_or(input.len(), |(idx, _)| idx);

    let (version_str, remaining) = input.split_at(end_pos);
    if version_str.is_empty() {
        return Err("Empty version string found".to_string());
    }

    Ok((version_str, remaining))
}

fn token_bounds(token: &RangeToken) -> Result<Vec<Bound>, String> {
    let partial = parse_partial_version(&token.version)?;

    if partial.is_wildcard() {
        return Ok(vec![Bound::Any]);
    }

    if let Some(version) = partial.full.clone() {
        return Ok(match token.operator {
            Operator::Exact => vec![Bound::Exact(version)],
            Operator::Caret => Bound::caret(version)?,
            Operator::Tilde => Bound::tilde(version)?,
            Operator::GreaterThanOrEqual => vec![Bound::AtLeast(version)],
            Operator::LessThanOrEqual => vec![Bound::AtMost(version)],
            Operator::GreaterThan => vec![Bound::Above(version)],
            Operator::LessThan => vec![Bound::Below(version)],
        });
    }

    let floor = partial.floor();
    let next = partial.next()?.unwrap_or_else(|| floor.clone());

    Ok(match token.operator {
        Operator::Exact | Operator::Tilde => vec![Bound::AtLeast(floor), Bound::Below(next)],
        Operator::Caret => vec![Bound::AtLeast(floor), Bound::Below(caret_ceiling(&partial)?)],
        Operator::GreaterThanOrEqual => vec![Bound::AtLeast(floor)],
        Operator::GreaterThan => vec![Bound::AtLeast(next)],
        Operator::LessThan => vec![Bound::Below(floor)],
        Operator::LessThanOrEqual => vec![Bound::Below(next)],
    })
}

// ^1.2 := <2.0.0, ^0.2 := <0.3.0, ^0 := <1.0.0, ^0.0 := <0.1.0
fn caret_ceiling(partial: &PartialVersion) -> Result<Version, String> {
    Ok(match (partial.major, partial.minor) {
        (Some(0), Some(minor)) => Version::new(0, increment(minor)?, 0),
        (Some(major), _) => Version::new(increment(major)?, 0, 0),
        _ => Version::new(0, 0, 0),
    })
}

fn hyphen_bounds(lower: &str, upper: &str) -> Result<Vec<Bound>, String> {
    let lower = parse_partial_version(lower)?;
    let upper = parse_partial_version(upper)?;

    let mut bounds = Vec::new();
    if !lower.is_wildcard() {
        bounds.push(Bound::AtLeast(lower.floor()));
    }
    if let Some(full) = upper.full.clone() {
        bounds.push(Bound::AtMost(full));
    } else if let Some(next) = upper.next()? {
        bounds.push(Bound::Below(next));
    }

    if bounds.is_empty() {
        bounds.push(Bound::Any);
    }
    Ok(bounds)
}

fn clause_range(clause: &Clause) -> Result<Range, String> {
    match clause {
        Clause::Tokens(tokens) => {
            let mut bounds = Vec::new();
            for token in tokens {
                bounds.extend(token_bounds(token)?);
            }
            Ok(Range::new(bounds))
        }
        Clause::Hyphen { lower, upper } => Ok(Range::new(hyphen_bounds(lower, upper)?)),
    }
}

/// Parse an npm range into its `||` alternatives.
pub fn parse_npm_semver_ranges(range_str: &str) -> Result<Vec<Range>, String> {
    tokenize_range(range_str)?.iter().map(clause_range).collect()
}

/// Validate a range and return it in canonical spelling: single spaces,
/// operators glued to their versions, `v`/`=` prefixes removed. The
/// operator itself is kept, so `^1.2` stays `^1.2`.
pub fn canonicalize_range(range_str: &str) -> Result<String, String> {
    let clauses = tokenize_range(range_str)?;
    for clause in &clauses {
        clause_range(clause)?;
    }

    Ok(clauses
        .iter()
        .map(Clause::canonical)
        .collect::<Vec<_>>()
        .join(" || "))
}

#[must_use]
pub fn satisfies_any(ranges: &[Range], version: &Version) -> bool {
    ranges.iter().any(|range| range.matches(version))
}
