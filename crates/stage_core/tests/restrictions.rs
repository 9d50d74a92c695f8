use stage_core::restrictions::{
    and, count_distinct, eq, gt, gte, has_member, has_members, in_, is_null, like, lt, lte, ne,
    not_in, or, sum,
};
use stage_core::{Criterion, Operator, Value};

type Factory = fn(&'static str, Value, bool) -> Option<Criterion>;

fn comparison_factories() -> [(Operator, Factory); 7] {
    [
        (Operator::Eq, |f: &'static str, v: Value, i: bool| eq(f, v, i)),
        (Operator::Ne, |f: &'static str, v: Value, i: bool| ne(f, v, i)),
        (Operator::Gt, |f: &'static str, v: Value, i: bool| gt(f, v, i)),
        (Operator::Lt, |f: &'static str, v: Value, i: bool| lt(f, v, i)),
        (Operator::Gte, |f: &'static str, v: Value, i: bool| gte(f, v, i)),
        (Operator::Lte, |f: &'static str, v: Value, i: bool| lte(f, v, i)),
        (Operator::IsMember, |f: &'static str, v: Value, i: bool| {
            has_member(f, v, i)
        }),
    ]
}

fn leaf_operators(criterion: &Criterion) -> Vec<Operator> {
    criterion
        .as_logical()
        .unwrap()
        .children()
        .iter()
        .map(Criterion::operator)
        .collect()
}

#[test]
fn ignore_null_elides_absent_and_empty_values() {
    for (operator, factory) in comparison_factories() {
        assert!(factory("name", Value::Null, true).is_none(), "{operator}");
        assert!(factory("name", Value::from(""), true).is_none(), "{operator}");
    }
    assert!(like("name", None, true).is_none());
    assert!(like("name", Some(""), true).is_none());
    assert!(eq("age", None::<i64>, true).is_none());
}

#[test]
fn ignore_null_keeps_non_empty_values() {
    for (operator, factory) in comparison_factories() {
        for value in [Value::from(0), Value::from(false), Value::from(" ")] {
            let criterion = factory("name", value.clone(), true).unwrap();
            let simple = criterion.as_simple().unwrap();
            assert_eq!(simple.operator(), operator);
            assert_eq!(simple.value(), &value);
        }
    }
}

#[test]
fn without_ignore_null_a_node_is_always_produced() {
    for (operator, factory) in comparison_factories() {
        let criterion = factory("name", Value::Null, false).unwrap();
        assert_eq!(criterion.operator(), operator);
        assert!(criterion.as_simple().unwrap().value().is_null());
    }
    let criterion = like("name", None, false).unwrap();
    assert_eq!(criterion.operator(), Operator::Like);
}

#[test]
fn in_builds_one_eq_leaf_per_value_joined_by_or() {
    let criterion = in_("status", ["open", "pending", "closed"], false).unwrap();

    assert_eq!(criterion.operator(), Operator::Or);
    assert_eq!(leaf_operators(&criterion), vec![Operator::Eq; 3]);

    let values: Vec<_> = criterion
        .as_logical()
        .unwrap()
        .children()
        .iter()
        .map(|child| child.as_simple().unwrap().value().clone())
        .collect();
    assert_eq!(
        values,
        vec![Value::from("open"), Value::from("pending"), Value::from("closed")]
    );
}

#[test]
fn not_in_builds_one_ne_leaf_per_value_joined_by_and() {
    let criterion = not_in("id", vec![1_i64, 2], true).unwrap();

    assert_eq!(criterion.operator(), Operator::And);
    assert_eq!(leaf_operators(&criterion), vec![Operator::Ne; 2]);
}

#[test]
fn empty_collections_follow_ignore_null() {
    assert!(in_("id", Vec::<i64>::new(), true).is_none());
    assert!(not_in("id", Vec::<i64>::new(), true).is_none());

    let kept = in_("id", Vec::<i64>::new(), false).unwrap();
    assert_eq!(kept.operator(), Operator::Or);
    assert!(kept.as_logical().unwrap().is_empty());

    let kept = not_in("id", Vec::<i64>::new(), false).unwrap();
    assert_eq!(kept.operator(), Operator::And);
    assert!(kept.as_logical().unwrap().is_empty());
}

#[test]
fn has_members_uses_is_member_for_plain_fields() {
    let criterion = has_members("tags", ["rust", "sql"]);

    assert_eq!(criterion.operator(), Operator::Or);
    assert_eq!(leaf_operators(&criterion), vec![Operator::IsMember; 2]);
}

#[test]
fn has_members_uses_eq_for_dotted_paths() {
    let criterion = has_members("addresses.city", ["Beijing"]);

    assert_eq!(leaf_operators(&criterion), vec![Operator::Eq]);
    let leaf = &criterion.as_logical().unwrap().children()[0];
    assert_eq!(leaf.as_simple().unwrap().field(), "addresses.city");
}

#[test]
fn has_members_with_no_values_is_an_empty_or() {
    for field in ["tags", "addresses.city"] {
        let criterion = has_members(field, Vec::<&str>::new());

        assert_eq!(criterion.operator(), Operator::Or);
        assert!(criterion.as_logical().unwrap().is_empty());
    }
}

#[test]
fn logical_composition_drops_elided_children_in_order() {
    let criterion = and([
        eq("a", 1, true),
        eq("b", "", true),
        Some(or([gt("c", 2, true), lt("d", Value::Null, true)])),
        Some(is_null("e")),
    ]);

    let logical = criterion.as_logical().unwrap();
    assert_eq!(logical.operator(), Operator::And);
    assert_eq!(logical.len(), 3);
    assert_eq!(
        leaf_operators(&criterion),
        vec![Operator::Eq, Operator::Or, Operator::IsNull]
    );

    let nested = logical.children()[1].as_logical().unwrap();
    assert_eq!(nested.len(), 1);
}

#[test]
fn logical_composition_accepts_plain_criteria() {
    let criterion = or(vec![is_null("a"), is_null("b")]);
    assert_eq!(criterion.as_logical().unwrap().len(), 2);
}

#[test]
fn selectors_have_no_value() {
    let selector = count_distinct("email");
    assert_eq!(selector.operator(), Operator::CountDistinct);
    assert_eq!(selector.field(), "email");
    assert_eq!(sum("amount").operator(), Operator::Sum);
}
