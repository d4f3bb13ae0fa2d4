use super::parser::{Cursor, is_identifier_char};
use super::types::{Operator, RequirementParseError};

const MARKER_VARIABLES: &[&str] = &[
    "python_version",
    "python_full_version",
    "os_name",
    "sys_platform",
    "platform_release",
    "platform_system",
    "platform_version",
    "platform_machine",
    "platform_python_implementation",
    "implementation_name",
    "implementation_version",
    "extra",
    // Legacy spellings still found in older requirement files.
    "os.name",
    "sys.platform",
    "platform.version",
    "platform.machine",
    "platform.python_implementation",
    "python_implementation",
];

/// Consumes an environment marker expression, leaving the cursor after it.
pub(super) fn parse_marker(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    parse_or(cursor)
}

fn parse_or(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    parse_and(cursor)?;
    loop {
        let checkpoint = cursor.pos();
        cursor.skip_whitespace();
        if !cursor.eat_keyword("or") {
            cursor.reset(checkpoint);
            return Ok(());
        }
        parse_and(cursor)?;
    }
}

fn parse_and(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    parse_atom(cursor)?;
    loop {
        let checkpoint = cursor.pos();
        cursor.skip_whitespace();
        if !cursor.eat_keyword("and") {
            cursor.reset(checkpoint);
            return Ok(());
        }
        parse_atom(cursor)?;
    }
}

fn parse_atom(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    cursor.skip_whitespace();
    if cursor.eat("(") {
        parse_or(cursor)?;
        cursor.skip_whitespace();
        if !cursor.eat(")") {
            return Err(cursor.error("expected ')' in marker"));
        }
        return Ok(());
    }

    parse_value(cursor)?;
    cursor.skip_whitespace();
    parse_marker_operator(cursor)?;
    cursor.skip_whitespace();
    parse_value(cursor)
}

fn parse_value(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    let start = cursor.pos();
    match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.eat(if quote == '"' { "\"" } else { "'" });
            cursor.take_while(|c| c != quote);
            if cursor.eat(if quote == '"' { "\"" } else { "'" }) {
                Ok(())
            } else {
                Err(cursor.error_at(start, "unterminated string in marker"))
            }
        }
        Some(_) => {
            let variable = cursor.take_while(is_identifier_char);
            if MARKER_VARIABLES.contains(&variable) {
                Ok(())
            } else if variable.is_empty() {
                Err(cursor.error_at(start, "expected marker variable or string"))
            } else {
                Err(cursor.error_at(start, format!("unknown marker variable '{variable}'")))
            }
        }
        None => Err(cursor.error("expected marker expression")),
    }
}

fn parse_marker_operator(cursor: &mut Cursor<'_>) -> Result<(), RequirementParseError> {
    if Operator::ALL
        .into_iter()
        .any(|operator| cursor.eat(operator.as_str()))
    {
        return Ok(());
    }
    if cursor.eat_keyword("in") {
        return Ok(());
    }
    if cursor.eat_keyword("not") {
        cursor.skip_whitespace();
        if cursor.eat_keyword("in") {
            return Ok(());
        }
    }
    Err(cursor.error("expected marker operator"))
}
