use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Compatible,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Arbitrary,
}

impl Operator {
    /// Longest tokens first so that `===` is never read as `==`.
    pub(crate) const ALL: [Operator; 8] = [
        Operator::Arbitrary,
        Operator::Compatible,
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::Less,
        Operator::Greater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compatible => "~=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Arbitrary => "===",
        }
    }

    pub fn allows_wildcard(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionSpecifier {
    pub operator: Operator,
    pub version: String,
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.as_str(), self.version)
    }
}

/// One dependency declaration, e.g. `requests[socks]>=2.0,<3; python_version >= "3.8"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specifiers: Vec<VersionSpecifier>,
    /// Direct reference given with `name @ <url>`.
    pub url: Option<String>,
    /// Environment marker source text, without the leading `;`.
    pub marker: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at position {position}")]
pub struct RequirementParseError {
    pub position: usize,
    pub reason: String,
}
