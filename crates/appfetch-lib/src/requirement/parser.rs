use super::marker::parse_marker;
use super::types::{Operator, Requirement, RequirementParseError, VersionSpecifier};
use std::str::FromStr;

pub(super) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn pos(&self) -> usize {
        self.pos
    }

    pub(super) fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(super) fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub(super) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn skip_whitespace(&mut self) -> bool {
        let skipped = self.take_while(char::is_whitespace);
        !skipped.is_empty()
    }

    pub(super) fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes `keyword` only when it is not the start of a longer identifier.
    pub(super) fn eat_keyword(&mut self, keyword: &str) -> bool {
        let Some(after) = self.rest().strip_prefix(keyword) else {
            return false;
        };
        if after.chars().next().is_some_and(is_identifier_char) {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    pub(super) fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    pub(super) fn error(&self, reason: impl Into<String>) -> RequirementParseError {
        RequirementParseError {
            position: self.pos,
            reason: reason.into(),
        }
    }

    pub(super) fn error_at(&self, position: usize, reason: impl Into<String>) -> RequirementParseError {
        RequirementParseError {
            position,
            reason: reason.into(),
        }
    }
}

pub(super) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

fn parse_name(cursor: &mut Cursor<'_>) -> Result<String, RequirementParseError> {
    let start = cursor.pos();
    let name = cursor.take_while(is_identifier_char);
    let valid = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());
    if valid {
        Ok(name.to_string())
    } else if name.is_empty() {
        Err(cursor.error_at(start, "expected package name"))
    } else {
        Err(cursor.error_at(start, format!("invalid package name '{name}'")))
    }
}

fn parse_extras(cursor: &mut Cursor<'_>) -> Result<Vec<String>, RequirementParseError> {
    let mut extras = Vec::new();
    if !cursor.eat("[") {
        return Ok(extras);
    }

    cursor.skip_whitespace();
    if cursor.eat("]") {
        return Ok(extras);
    }

    loop {
        cursor.skip_whitespace();
        extras.push(parse_name(cursor)?);
        cursor.skip_whitespace();
        if cursor.eat(",") {
            continue;
        }
        if cursor.eat("]") {
            return Ok(extras);
        }
        return Err(cursor.error("expected ',' or ']' after extra"));
    }
}

fn parse_operator(cursor: &mut Cursor<'_>) -> Option<Operator> {
    Operator::ALL
        .into_iter()
        .find(|operator| cursor.eat(operator.as_str()))
}

fn starts_with_operator(cursor: &Cursor<'_>) -> bool {
    Operator::ALL
        .iter()
        .any(|operator| cursor.rest().starts_with(operator.as_str()))
}

/// Checks the PEP 440 shape of `version`: optional `v` and epoch, a numeric
/// release, then pre, post and dev labels and a local part. `~=` needs at least
/// two release segments and a local part is only allowed with `==` and `!=`.
fn is_valid_version(version: &str, operator: Operator) -> bool {
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    let version = match version.split_once('!') {
        Some((epoch, rest)) if is_number(epoch) => rest,
        Some(_) => return false,
        None => version,
    };

    if let Some(release) = version.strip_suffix(".*") {
        return operator.allows_wildcard() && is_release(release);
    }
    if version.contains('*') {
        return false;
    }

    let (public, local) = match version.split_once('+') {
        Some((public, local)) => (public, Some(local)),
        None => (version, None),
    };
    if let Some(local) = local {
        if !operator.allows_wildcard() {
            return false;
        }
        let local_ok = local
            .split(['.', '-', '_'])
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
        if !local_ok {
            return false;
        }
    }

    let release_len = public
        .char_indices()
        .find(|&(i, c)| {
            let continues_release = c.is_ascii_digit()
                || (c == '.' && public[i + 1..].starts_with(|d: char| d.is_ascii_digit()));
            !continues_release
        })
        .map_or(public.len(), |(i, _)| i);
    let (release, suffix) = public.split_at(release_len);

    if operator == Operator::Compatible && release.split('.').count() < 2 {
        return false;
    }

    is_release(release) && is_valid_suffix(suffix)
}

fn is_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn is_release(release: &str) -> bool {
    release.split('.').all(is_number)
}

const PRE_RELEASE_LABELS: [&str; 8] = ["alpha", "beta", "preview", "pre", "rc", "a", "b", "c"];
const POST_RELEASE_LABELS: [&str; 3] = ["post", "rev", "r"];

/// Strips `[sep] label [sep] [number]` from the front of `value`.
fn strip_label<'a>(value: &'a str, labels: &[&str]) -> Option<&'a str> {
    let value = value.strip_prefix(['.', '-', '_']).unwrap_or(value);
    let rest = labels.iter().find_map(|label| value.strip_prefix(label))?;
    let after_separator = rest.strip_prefix(['.', '-', '_']).unwrap_or(rest);
    let number = after_separator.trim_start_matches(|c: char| c.is_ascii_digit());
    if number.len() < after_separator.len() {
        Some(number)
    } else {
        Some(rest)
    }
}

fn strip_implicit_post(value: &str) -> Option<&str> {
    let digits = value.strip_prefix('-')?;
    let rest = digits.trim_start_matches(|c: char| c.is_ascii_digit());
    (rest.len() < digits.len()).then_some(rest)
}

fn is_valid_suffix(suffix: &str) -> bool {
    let lower = suffix.to_ascii_lowercase();
    let mut rest = lower.as_str();
    if let Some(after) = strip_label(rest, &PRE_RELEASE_LABELS) {
        rest = after;
    }
    if let Some(after) =
        strip_implicit_post(rest).or_else(|| strip_label(rest, &POST_RELEASE_LABELS))
    {
        rest = after;
    }
    if let Some(after) = strip_label(rest, &["dev"]) {
        rest = after;
    }
    rest.is_empty()
}

fn parse_specifier(cursor: &mut Cursor<'_>) -> Result<VersionSpecifier, RequirementParseError> {
    let Some(operator) = parse_operator(cursor) else {
        return Err(cursor.error("expected version operator"));
    };
    cursor.skip_whitespace();

    let start = cursor.pos();
    let version = if operator == Operator::Arbitrary {
        cursor.take_while(|c| !c.is_whitespace() && !matches!(c, ',' | ';' | ')'))
    } else {
        cursor.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '*' | '+' | '!' | '-'))
    };

    if version.is_empty() {
        return Err(cursor.error_at(start, "expected version"));
    }
    if operator != Operator::Arbitrary && !is_valid_version(version, operator) {
        return Err(cursor.error_at(
            start,
            format!("invalid version '{version}' for {}", operator.as_str()),
        ));
    }

    Ok(VersionSpecifier {
        operator,
        version: version.to_string(),
    })
}

fn parse_specifiers(
    cursor: &mut Cursor<'_>,
) -> Result<Vec<VersionSpecifier>, RequirementParseError> {
    let mut specifiers = Vec::new();
    loop {
        cursor.skip_whitespace();
        specifiers.push(parse_specifier(cursor)?);
        cursor.skip_whitespace();
        if !cursor.eat(",") {
            return Ok(specifiers);
        }
    }
}

fn parse_version_spec(
    cursor: &mut Cursor<'_>,
) -> Result<Vec<VersionSpecifier>, RequirementParseError> {
    if cursor.eat("(") {
        let specifiers = parse_specifiers(cursor)?;
        cursor.skip_whitespace();
        if !cursor.eat(")") {
            return Err(cursor.error("expected ')' after version specifiers"));
        }
        Ok(specifiers)
    } else if starts_with_operator(cursor) {
        parse_specifiers(cursor)
    } else {
        Ok(Vec::new())
    }
}

fn parse_marker_suffix(cursor: &mut Cursor<'_>) -> Result<Option<String>, RequirementParseError> {
    cursor.skip_whitespace();
    if !cursor.eat(";") {
        return Ok(None);
    }

    let start = cursor.pos();
    parse_marker(cursor)?;
    Ok(Some(cursor.slice(start, cursor.pos()).trim().to_string()))
}

fn parse_requirement(input: &str) -> Result<Requirement, RequirementParseError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();

    let name = parse_name(&mut cursor)?;
    cursor.skip_whitespace();
    let extras = parse_extras(&mut cursor)?;
    cursor.skip_whitespace();

    let (specifiers, url) = if cursor.eat("@") {
        cursor.skip_whitespace();
        let start = cursor.pos();
        let url = cursor.take_while(|c| !c.is_whitespace());
        if url.is_empty() {
            return Err(cursor.error_at(start, "expected URL after '@'"));
        }
        (Vec::new(), Some(url.to_string()))
    } else {
        (parse_version_spec(&mut cursor)?, None)
    };

    let marker = parse_marker_suffix(&mut cursor)?;

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(cursor.error(format!("unexpected input '{}'", cursor.rest())));
    }

    Ok(Requirement {
        name,
        extras,
        specifiers,
        url,
        marker,
    })
}

impl FromStr for Requirement {
    type Err = RequirementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_requirement(s)
    }
}
