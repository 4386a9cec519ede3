use lazy_static::lazy_static;
use pest::Parser;
use pest::error::ErrorVariant;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::parser::error::{ParseError, convert_pest_error};
use crate::parser::literal::{unescape, unescape_regexp};
use crate::parser::nesting;
use crate::parser::{
    ArithmeticOp, BitwiseOp, Expr, LogicalOp, Node, Position, RelationalOp, SelectStep, UnaryOp,
};
use crate::values::{RegExp, Value};

use std::cell::Cell;

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_PARSE_DEPTH: usize = 64;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        // Conditional operators.
        .op(Op::infix(Rule::default_op, Assoc::Right) |
            Op::infix(Rule::ternary_op, Assoc::Right))    // `?:`, `? :`

        // Logical operators.
        .op(Op::infix(Rule::or_op, Assoc::Left))           // `||`
        .op(Op::infix(Rule::and_op, Assoc::Left))          // `&&`

        // Bitwise operators.
        .op(Op::infix(Rule::bitor_op, Assoc::Left))        // `|`
        .op(Op::infix(Rule::bitand_op, Assoc::Left))       // `&`

        // Relational operators.
        .op(
            Op::infix(Rule::eq_op, Assoc::Left) |
            Op::infix(Rule::neq_op, Assoc::Left) |
            Op::infix(Rule::match_op, Assoc::Left) |
            Op::infix(Rule::nomatch_op, Assoc::Left)
        )                                                   // `==`, `!=`, `=~`, `!~`
        .op(
            Op::infix(Rule::le_op, Assoc::Left) |
            Op::infix(Rule::ge_op, Assoc::Left) |
            Op::infix(Rule::lt_op, Assoc::Left) |
            Op::infix(Rule::gt_op, Assoc::Left)
        )                                                   // `<=`, `>=`, `<`, `>`
        .op(
            Op::infix(Rule::shl_op, Assoc::Left) |
            Op::infix(Rule::shr_op, Assoc::Left)
        )                                                   // `<<`, `>>`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add_op, Assoc::Left) |
            Op::infix(Rule::sub_op, Assoc::Left)
        )                                                   // `+`, `-`
        .op(
            Op::infix(Rule::mul_op, Assoc::Left) |
            Op::infix(Rule::div_op, Assoc::Left) |
            Op::infix(Rule::rem_op, Assoc::Left)
        )                                                   // `*`, `/`, `%`
        .op(Op::prefix(Rule::not_op) |
            Op::prefix(Rule::bitnot_op))                    // `!`, `~`
        .op(Op::infix(Rule::pow_op, Assoc::Right))          // `**` (right-assoc)

        // Postfix operators.
        .op(
            Op::postfix(Rule::field_op) |
            Op::postfix(Rule::opt_field) |
            Op::postfix(Rule::index_op) |
            Op::postfix(Rule::opt_index) |
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::opt_call)
        )                                                   // `.`, `[]`, `()` and `?.` forms
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

type ParseResult<T> = Result<T, pest::error::Error<Rule>>;

struct ParseContext {
    depth: Cell<usize>,
    max_depth: usize,
}

fn position_of(pair: &Pair<Rule>) -> Position {
    let (line, column) = pair.line_col();
    Position::new(line, column)
}

fn custom_error(message: impl Into<String>, span: pest::Span<'_>) -> pest::error::Error<Rule> {
    pest::error::Error::new_from_span(
        ErrorVariant::CustomError {
            message: message.into(),
        },
        span,
    )
}

fn next_inner<'i>(pairs: &mut Pairs<'i, Rule>, span: pest::Span<'i>) -> ParseResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| custom_error("missing expected pair in rule", span))
}

/// Appends a step to a selection chain, starting a new chain when `lhs` is
/// not one already.
fn push_step(lhs: Node, step: SelectStep) -> Node {
    let position = lhs.position;
    match lhs.expr {
        Expr::Select { base, mut steps } => {
            steps.push(step);
            Node::new(Expr::Select { base, steps }, position)
        }
        expr => Node::new(
            Expr::Select {
                base: Box::new(Node::new(expr, position)),
                steps: vec![step],
            },
            position,
        ),
    }
}

fn depth_message(max_depth: usize) -> String {
    format!("Expression nesting depth exceeds maximum of {max_depth} levels.")
}

/// Operators in one `expression` pair that each add a level to the tree
/// built from it. Field and index steps join a single selection node.
fn nesting_operators(pair: &Pair<Rule>) -> usize {
    pair.clone()
        .into_inner()
        .filter(|p| {
            !matches!(
                p.as_rule(),
                Rule::grouped
                    | Rule::template
                    | Rule::array
                    | Rule::object
                    | Rule::regexp
                    | Rule::number
                    | Rule::string
                    | Rule::literal_value
                    | Rule::variable
                    | Rule::field_op
                    | Rule::opt_field
                    | Rule::index_op
                    | Rule::opt_index
            )
        })
        .count()
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

impl ParseContext {
    /// Reserves `levels` of nesting, failing once the total exceeds the
    /// limit. Paired with `leave`.
    fn enter(&self, levels: usize, pair: &Pair<Rule>) -> ParseResult<()> {
        let depth = self.depth.get() + levels;
        if depth > self.max_depth {
            return Err(custom_error(depth_message(self.max_depth), pair.as_span()));
        }
        self.depth.set(depth);
        Ok(())
    }

    fn leave(&self, levels: usize) {
        self.depth.set(self.depth.get() - levels);
    }

    fn parse_expr(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        match pair.as_rule() {
            Rule::main => self.parse_main(pair),
            Rule::sequence => self.parse_sequence(pair),
            Rule::assignment => self.parse_assignment(pair),
            Rule::expression => self.parse_expression(pair),
            Rule::grouped => self.parse_grouped(pair),
            Rule::array => self.parse_array(pair),
            Rule::object => self.parse_object(pair),
            Rule::object_item => self.parse_object_item(pair),
            Rule::template => self.parse_template(pair),
            Rule::regexp => self.parse_regexp(pair),
            Rule::number => self.parse_number(pair),
            Rule::string => self.parse_string(pair),
            Rule::literal_value => self.parse_literal_value(pair),
            Rule::variable => Ok(Node::new(
                Expr::Variable(pair.as_str().to_string()),
                position_of(&pair),
            )),
            Rule::identifier | Rule::name => Ok(Node::new(
                Expr::Identifier(pair.as_str().to_string()),
                position_of(&pair),
            )),
            _ => Err(custom_error(
                format!("Unhandled rule: {:?}", pair.as_rule()),
                pair.as_span(),
            )),
        }
    }

    fn parse_main(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let span = pair.as_span();
        self.parse_expr(next_inner(&mut pair.into_inner(), span)?)
    }

    fn parse_sequence(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let mut statements = pair
            .into_inner()
            .map(|p| self.parse_expr(p))
            .collect::<ParseResult<Vec<_>>>()?;
        if statements.len() == 1 {
            if let Some(single) = statements.pop() {
                return Ok(single);
            }
        }
        Ok(Node::new(Expr::Sequence(statements), position))
    }

    fn parse_assignment(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let target = self.parse_expr(next_inner(&mut inner, span)?)?;
        let value = self.parse_expr(next_inner(&mut inner, span)?)?;
        Ok(Node::new(
            Expr::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            },
            position,
        ))
    }

    fn parse_expression(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let levels = 1 + nesting_operators(&pair);
        self.enter(levels, &pair)?;
        let result = PRATT_PARSER
            .map_primary(|primary| self.parse_expr(primary))
            .map_prefix(|op, rhs| {
                let operand = rhs?;
                let op_enum = match op.as_rule() {
                    Rule::not_op => UnaryOp::Not,
                    Rule::bitnot_op => UnaryOp::BitNot,
                    _ => unreachable!("Unknown prefix operator: {:?}", op.as_rule()),
                };
                Ok(Node::new(
                    Expr::Unary {
                        op: op_enum,
                        operand: Box::new(operand),
                    },
                    position_of(&op),
                ))
            })
            .map_infix(|lhs, op, rhs| {
                let left = Box::new(lhs?);
                let right = Box::new(rhs?);
                self.parse_infix(op, left, right)
            })
            .map_postfix(|lhs, op| self.parse_postfix(lhs?, op))
            .parse(pair.into_inner());
        self.leave(levels);
        result
    }

    fn parse_infix(&self, op: Pair<Rule>, left: Box<Node>, right: Box<Node>) -> ParseResult<Node> {
        let position = position_of(&op);
        let expr = match op.as_rule() {
            Rule::default_op => Expr::ConditionalBinary {
                value: left,
                fallback: right,
            },
            Rule::ternary_op => {
                let span = op.as_span();
                let then_branch = self.parse_expr(next_inner(&mut op.into_inner(), span)?)?;
                Expr::ConditionalTernary {
                    cond: left,
                    then_branch: Box::new(then_branch),
                    else_branch: right,
                }
            }
            Rule::or_op => Expr::Logical {
                op: LogicalOp::Or,
                left,
                right,
            },
            Rule::and_op => Expr::Logical {
                op: LogicalOp::And,
                left,
                right,
            },
            Rule::bitor_op | Rule::bitand_op | Rule::shl_op | Rule::shr_op => {
                let op_enum = match op.as_rule() {
                    Rule::bitor_op => BitwiseOp::Or,
                    Rule::bitand_op => BitwiseOp::And,
                    Rule::shl_op => BitwiseOp::Shl,
                    _ => BitwiseOp::Shr,
                };
                Expr::Bitwise {
                    op: op_enum,
                    left,
                    right,
                }
            }
            Rule::eq_op
            | Rule::neq_op
            | Rule::match_op
            | Rule::nomatch_op
            | Rule::le_op
            | Rule::ge_op
            | Rule::lt_op
            | Rule::gt_op => {
                let op_enum = match op.as_rule() {
                    Rule::eq_op => RelationalOp::Eq,
                    Rule::neq_op => RelationalOp::Neq,
                    Rule::match_op => RelationalOp::Match,
                    Rule::nomatch_op => RelationalOp::NoMatch,
                    Rule::le_op => RelationalOp::Le,
                    Rule::ge_op => RelationalOp::Ge,
                    Rule::lt_op => RelationalOp::Lt,
                    _ => RelationalOp::Gt,
                };
                Expr::Relational {
                    op: op_enum,
                    left,
                    right,
                }
            }
            Rule::add_op
            | Rule::sub_op
            | Rule::mul_op
            | Rule::div_op
            | Rule::rem_op
            | Rule::pow_op => {
                let op_enum = match op.as_rule() {
                    Rule::add_op => ArithmeticOp::Add,
                    Rule::sub_op => ArithmeticOp::Sub,
                    Rule::mul_op => ArithmeticOp::Mul,
                    Rule::div_op => ArithmeticOp::Div,
                    Rule::rem_op => ArithmeticOp::Rem,
                    _ => ArithmeticOp::Pow,
                };
                Expr::Arithmetical {
                    op: op_enum,
                    left,
                    right,
                }
            }
            _ => unreachable!("Unknown binary operator: {:?}", op.as_rule()),
        };
        Ok(Node::new(expr, position))
    }

    fn parse_postfix(&self, lhs: Node, op: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&op);
        let span = op.as_span();
        let rule = op.as_rule();
        let optional = matches!(rule, Rule::opt_field | Rule::opt_index | Rule::opt_call);
        match rule {
            Rule::field_op | Rule::opt_field | Rule::index_op | Rule::opt_index => {
                let key = self.parse_expr(next_inner(&mut op.into_inner(), span)?)?;
                Ok(push_step(
                    lhs,
                    SelectStep {
                        key,
                        optional,
                        position,
                    },
                ))
            }
            Rule::call_op | Rule::opt_call => {
                let args = op
                    .into_inner()
                    .map(|p| self.parse_expr(p))
                    .collect::<ParseResult<Vec<_>>>()?;
                Ok(Node::new(
                    Expr::FuncCall {
                        callee: Box::new(lhs),
                        args,
                        optional,
                    },
                    position,
                ))
            }
            _ => unreachable!("Unknown postfix operator: {:?}", rule),
        }
    }

    fn parse_grouped(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let span = pair.as_span();
        self.parse_expr(next_inner(&mut pair.into_inner(), span)?)
    }

    fn parse_array(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let items = pair
            .into_inner()
            .map(|p| self.parse_expr(p))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Node::new(Expr::LiteralArray(items), position))
    }

    fn parse_object(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let items = pair
            .into_inner()
            .map(|p| self.parse_expr(p))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Node::new(Expr::LiteralObject(items), position))
    }

    fn parse_object_item(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let key_pair = next_inner(&mut inner, span)?;
        let key = match key_pair.as_rule() {
            Rule::computed_key => {
                let key_span = key_pair.as_span();
                self.parse_expr(next_inner(&mut key_pair.into_inner(), key_span)?)?
            }
            _ => self.parse_expr(key_pair)?,
        };
        let value = self.parse_expr(next_inner(&mut inner, span)?)?;
        Ok(Node::new(
            Expr::LiteralObjectItem {
                key: Box::new(key),
                value: Box::new(value),
            },
            position,
        ))
    }

    fn parse_template(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let parts = pair
            .into_inner()
            .map(|part| match part.as_rule() {
                Rule::template_text => {
                    let text = unescape(part.as_str())
                        .map_err(|e| custom_error(format!("Invalid template: {e}"), part.as_span()))?;
                    Ok(Node::new(Expr::LiteralString(text), position_of(&part)))
                }
                _ => {
                    let span = part.as_span();
                    self.parse_expr(next_inner(&mut part.into_inner(), span)?)
                }
            })
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Node::new(Expr::LiteralTemplate(parts), position))
    }

    fn parse_regexp(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let body = next_inner(&mut inner, span)?.as_str();
        let flags = inner.next().map_or("", |p| p.as_str());
        let regexp =
            RegExp::new(&unescape_regexp(body), flags).map_err(|e| custom_error(e.to_string(), span))?;
        Ok(Node::new(Expr::LiteralRegExp(regexp), position))
    }

    fn parse_number(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let span = pair.as_span();
        let sign = if pair.as_str().starts_with('-') { -1.0 } else { 1.0 };
        let digits = next_inner(&mut pair.into_inner(), span)?;
        let text = digits.as_str();
        let magnitude = match digits.as_rule() {
            Rule::hex_int => parse_radix(&text[2..], 16),
            Rule::oct_int => parse_radix(&text[2..], 8),
            Rule::bin_int => parse_radix(&text[2..], 2),
            _ => text
                .parse::<f64>()
                .map_err(|e| custom_error(format!("Invalid number literal: {e}"), span))?,
        };
        Ok(Node::new(Expr::LiteralNumber(sign * magnitude), position))
    }

    fn parse_string(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let position = position_of(&pair);
        let span = pair.as_span();
        let body = next_inner(&mut pair.into_inner(), span)?;
        let text = unescape(body.as_str())
            .map_err(|e| custom_error(format!("Invalid string literal: {e}"), span))?;
        Ok(Node::new(Expr::LiteralString(text), position))
    }

    fn parse_literal_value(&self, pair: Pair<Rule>) -> ParseResult<Node> {
        let value = match pair.as_str() {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            "null" => Value::Null,
            "undefined" => Value::Undefined,
            "NaN" => Value::Number(f64::NAN),
            "Infinity" => Value::Number(f64::INFINITY),
            other => {
                return Err(custom_error(
                    format!("Unknown literal: {other}"),
                    pair.as_span(),
                ));
            }
        };
        Ok(Node::new(Expr::LiteralValue(value), position_of(&pair)))
    }
}

/// Parses an expression with the default nesting limit.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_PARSE_DEPTH)
}

/// Parses an expression, failing once nesting exceeds `max_depth` levels
/// instead of recursing further.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Node, ParseError> {
    nesting::check_nesting(source, max_depth)
        .map_err(|position| ParseError::new(depth_message(max_depth), position))?;
    let mut pairs = ExpressionParser::parse(Rule::main, source).map_err(|e| {
        tracing::debug!("Pest parser failed with: {:?}", e);
        convert_pest_error(e)
    })?;
    let Some(pair) = pairs.next() else {
        return Err(ParseError::new("empty parse tree", Position::default()));
    };
    let context = ParseContext {
        depth: Cell::new(0),
        max_depth,
    };
    context.parse_expr(pair).map_err(convert_pest_error)
}
