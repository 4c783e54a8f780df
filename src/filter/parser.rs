use crate::filter::expression::{FilterExpression, FilterPredicate};
use crate::filter::lexer::{has_unbalanced_quotes, split_unquoted, strip_grouping, unquote, Scanner};
use crate::filter::operator::FilterOperator;
use crate::schema::registry::{PropertyRegistry, PropertyType};
use log::debug;

/// Parse a backend filter string back into predicates.
///
/// Never fails: malformed input yields best-effort predicates (missing parts
/// become empty strings) so a list page keeps rendering. Grouping
/// parentheses are dropped, so nested AND groups come back flattened.
pub fn parse_filter(input: &str) -> FilterExpression {
    parse_clauses(input, None)
}

/// Like [`parse_filter`], resolving labels and value types from `registry`.
/// Properties missing from the registry keep their key as label.
pub fn parse_filter_with_registry(input: &str, registry: &PropertyRegistry) -> FilterExpression {
    parse_clauses(input, Some(registry))
}

fn parse_clauses(input: &str, registry: Option<&PropertyRegistry>) -> FilterExpression {
    if has_unbalanced_quotes(input) {
        debug!("filter string has an unterminated quote: {}", input);
    }

    let predicates = split_unquoted(input, '&')
        .into_iter()
        .filter_map(|clause| parse_clause(clause, registry))
        .collect();
    FilterExpression::from_predicates(predicates)
}

fn parse_clause(clause: &str, registry: Option<&PropertyRegistry>) -> Option<FilterPredicate> {
    let clause = strip_grouping(clause);
    if clause.is_empty() {
        return None;
    }

    let mut scanner = Scanner::new(clause);
    let property = scanner.next_word().unwrap_or_default();
    let operator = scanner.next_word().unwrap_or_default();
    let raw_value = scanner.rest();
    if operator.is_empty() || raw_value.is_empty() {
        debug!("incomplete filter clause: {}", clause);
    }

    let (value, quoted) = unquote(raw_value);
    let definition = registry.and_then(|r| r.get(property));
    let property_type = definition
        .map(|d| d.property_type)
        .unwrap_or_else(|| infer_type(value, quoted));
    let label = definition.map(|d| d.label()).unwrap_or(property);

    Some(
        FilterPredicate::new(property, FilterOperator::from(operator), value, property_type)
            .with_label(label),
    )
}

// Without a registry entry the quoting decides: quoted values are strings,
// bare ones are booleans or numbers when they look like one.
fn infer_type(value: &str, quoted: bool) -> PropertyType {
    if quoted {
        PropertyType::String
    } else if value == "true" || value == "false" {
        PropertyType::Boolean
    } else if value.parse::<f64>().is_ok() {
        PropertyType::Number
    } else {
        PropertyType::String
    }
}
