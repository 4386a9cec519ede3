use crate::parser::{Position, parser::Rule};

use pest::error::{ErrorVariant, LineColLocation};
use thiserror::Error;

/// A syntax error with the location where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

pub(super) fn convert_pest_error(error: pest::error::Error<Rule>) -> ParseError {
    let position = match error.line_col {
        LineColLocation::Pos((line, column)) | LineColLocation::Span((line, column), _) => {
            Position::new(line, column)
        }
    };
    let message = match &error.variant {
        ErrorVariant::CustomError { message } => message.clone(),
        ErrorVariant::ParsingError { positives, .. } if positives.is_empty() => {
            "unexpected input".to_string()
        }
        ErrorVariant::ParsingError { positives, .. } => {
            let mut expected: Vec<&str> = positives.iter().map(rule_name).collect();
            expected.sort_unstable();
            expected.dedup();
            format!("expected {}", expected.join(", "))
        }
    };
    ParseError::new(message, position)
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression | Rule::grouped | Rule::sequence | Rule::template_expr => "expression",
        Rule::array => "array",
        Rule::object | Rule::object_item | Rule::computed_key => "object",
        Rule::number | Rule::hex_int | Rule::oct_int | Rule::bin_int | Rule::decimal => "number",
        Rule::string | Rule::dq_chars | Rule::sq_chars => "string",
        Rule::regexp | Rule::regexp_body | Rule::regexp_flags => "regular expression",
        Rule::template | Rule::template_text => "template",
        Rule::literal_value => "literal",
        Rule::variable | Rule::identifier | Rule::name | Rule::keyword => "name",
        Rule::assignment => "assignment",
        Rule::not_op | Rule::bitnot_op => "prefix operator",
        Rule::field_op
        | Rule::opt_field
        | Rule::index_op
        | Rule::opt_index
        | Rule::call_op
        | Rule::opt_call => "postfix operator",
        _ => "operator",
    }
}
