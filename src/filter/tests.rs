use super::expression::FilterExpression;
use super::merge::merge_filter_values;
use super::operator::FilterOperator;
use super::parser::{parse_filter, parse_filter_with_registry};
use crate::schema::registry::{PropertyDefinition, PropertyRegistry, PropertyType};

fn agent_registry() -> PropertyRegistry {
    PropertyRegistry::from_json(
        r#"[
            {"key": "id", "label": "ID"},
            {"key": "schedulable", "label": "Schedulable", "type": "boolean",
             "options": [true, false]},
            {"key": "status", "label": "Status", "strict_selection": true,
             "default_operator": "==", "options": ["ALIVE", "LOST", "TERMINATED"]},
            {"key": "scaling_group", "label": "Resource Group"}
        ]"#,
    )
    .unwrap()
}

fn triples(expr: &FilterExpression) -> Vec<(String, FilterOperator, String)> {
    expr.iter()
        .map(|p| (p.property.clone(), p.operator.clone(), p.value.clone()))
        .collect()
}

#[test]
fn test_schedulable_end_to_end() {
    let registry = PropertyRegistry::from_definitions([PropertyDefinition::new(
        "schedulable",
        PropertyType::Boolean,
    )
    .with_options(["true", "false"])])
    .unwrap();

    let expr = FilterExpression::new()
        .add_predicate(&registry, "schedulable", "true")
        .unwrap();
    let filter = expr.serialize().unwrap();
    assert_eq!(filter, "schedulable == true");

    let parsed = parse_filter(&filter);
    assert_eq!(
        triples(&parsed),
        vec![(
            "schedulable".to_string(),
            FilterOperator::Equals,
            "true".to_string()
        )]
    );
}

#[test]
fn test_round_trip_preserves_order() {
    let registry = agent_registry();
    let expr = FilterExpression::new()
        .add_predicate(&registry, "id", "i-node01")
        .unwrap()
        .add_predicate(&registry, "status", "ALIVE")
        .unwrap()
        .add_predicate(&registry, "schedulable", "false")
        .unwrap()
        .add_predicate(&registry, "scaling_group", "default")
        .unwrap();

    let filter = expr.serialize().unwrap();
    assert_eq!(
        filter,
        r#"(id ilike "%i-node01%") & (status == "ALIVE") & (schedulable == false) & (scaling_group ilike "%default%")"#
    );

    let parsed = parse_filter_with_registry(&filter, &registry);
    assert_eq!(parsed, expr);
    assert_eq!(parsed.serialize().unwrap(), filter);
}

#[test]
fn test_round_trip_without_registry_keeps_triples() {
    let registry = agent_registry();
    let expr = FilterExpression::new()
        .add_predicate(&registry, "id", "abc")
        .unwrap()
        .add_predicate(&registry, "schedulable", "true")
        .unwrap();

    let parsed = parse_filter(&expr.serialize().unwrap());
    assert_eq!(triples(&parsed), triples(&expr));
    // Labels fall back to the raw key
    assert_eq!(parsed.predicates()[0].label, "id");
}

#[test]
fn test_labels_resolved_from_registry() {
    let parsed = parse_filter_with_registry(
        r#"scaling_group ilike "%gpu%" & region == "kr""#,
        &agent_registry(),
    );
    assert_eq!(parsed.predicates()[0].label, "Resource Group");
    assert_eq!(parsed.predicates()[1].label, "region");
}

#[test]
fn test_strict_selection_rejection_reports_invalid() {
    let registry = agent_registry();
    let expr = FilterExpression::new()
        .add_predicate(&registry, "id", "abc")
        .unwrap();

    assert!(!registry.is_valid_value("schedulable", "yes"));
    assert!(expr.add_predicate(&registry, "schedulable", "yes").is_err());
    assert!(!registry.is_valid_value("status", "RUNNING"));
    assert!(expr.add_predicate(&registry, "status", "RUNNING").is_err());
    assert_eq!(expr.len(), 1);
}

#[test]
fn test_fixed_clause_merged_with_user_filter() {
    let registry = agent_registry();
    let user = FilterExpression::new()
        .add_predicate(&registry, "id", "node")
        .unwrap()
        .serialize();
    let merged =
        merge_filter_values([Some(r#"status == "ALIVE""#.to_string()), user]).unwrap();
    assert_eq!(merged, r#"(status == "ALIVE") & (id ilike "%node%")"#);

    let parsed = parse_filter(&merged);
    let props: Vec<&str> = parsed.iter().map(|p| p.property.as_str()).collect();
    assert_eq!(props, vec!["status", "id"]);

    let nothing = merge_filter_values([None, FilterExpression::new().serialize()]);
    assert_eq!(nothing, None);
}

// Quotes inside values are not escaped. A lone clause still comes back
// intact, but any clause after it is swallowed into the quoted value.
#[test]
fn test_value_with_double_quote_is_emitted_verbatim() {
    let registry = agent_registry();
    let expr = FilterExpression::new()
        .add_predicate(&registry, "id", r#"a"b"#)
        .unwrap();
    let filter = expr.serialize().unwrap();
    assert_eq!(filter, r#"id ilike "%a"b%""#);
    assert_eq!(
        triples(&parse_filter_with_registry(&filter, &registry)),
        vec![("id".to_string(), FilterOperator::ILike, r#"%a"b%"#.to_string())]
    );

    let expr = expr
        .add_predicate(&registry, "schedulable", "true")
        .unwrap();
    let filter = expr.serialize().unwrap();
    assert_eq!(filter, r#"(id ilike "%a"b%") & (schedulable == true)"#);

    let parsed = parse_filter_with_registry(&filter, &registry);
    assert_eq!(
        triples(&parsed),
        vec![(
            "id".to_string(),
            FilterOperator::ILike,
            r#"%a"b%") & (schedulable == true"#.to_string()
        )]
    );
    assert_ne!(parsed, expr);
}
