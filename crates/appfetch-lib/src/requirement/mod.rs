mod marker;
mod parser;
mod types;

pub use types::{Operator, Requirement, RequirementParseError, VersionSpecifier};
