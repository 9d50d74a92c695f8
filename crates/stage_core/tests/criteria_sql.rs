use stage_core::query::sql::{criterion_to_sql, selector_to_sql, where_clause};
use stage_core::restrictions::{
    and, count, count_distinct, eq, gt, has_member, has_members, in_, is_null, like, lte, ne,
    not_in, or, sum,
};
use stage_core::{Criteria, QueryError, Value};

#[test]
fn simple_comparisons_bind_their_value() {
    let fragment = criterion_to_sql(&gt("age", 18, false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "age > ?");
    assert_eq!(fragment.params, vec![Value::Integer(18)]);

    let fragment = criterion_to_sql(&lte("score", 9.5, false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "score <= ?");
    assert_eq!(fragment.params, vec![Value::Real(9.5)]);

    let fragment = criterion_to_sql(&ne("name", "bob", false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "name <> ?");
}

#[test]
fn null_equality_renders_is_null_checks() {
    let fragment = criterion_to_sql(&eq("deleted_at", Value::Null, false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "deleted_at IS NULL");
    assert!(fragment.params.is_empty());

    let fragment = criterion_to_sql(&ne("deleted_at", Value::Null, false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "deleted_at IS NOT NULL");

    let fragment = criterion_to_sql(&is_null("deleted_at")).unwrap();
    assert_eq!(fragment.sql, "deleted_at IS NULL");
}

#[test]
fn like_wraps_operand_in_wildcards() {
    let fragment = criterion_to_sql(&like("name", Some("ali"), true).unwrap()).unwrap();
    assert_eq!(fragment.sql, r"name LIKE ? ESCAPE '\'");
    assert_eq!(fragment.params, vec![Value::from("%ali%")]);
}

#[test]
fn like_escapes_wildcards_in_operand() {
    let fragment = criterion_to_sql(&like("code", Some("50%"), true).unwrap()).unwrap();
    assert_eq!(fragment.sql, r"code LIKE ? ESCAPE '\'");
    assert_eq!(fragment.params, vec![Value::from(r"%50\%%")]);

    let fragment = criterion_to_sql(&like("code", Some(r"a_b\c"), true).unwrap()).unwrap();
    assert_eq!(fragment.params, vec![Value::from(r"%a\_b\\c%")]);
}

#[test]
fn like_with_null_operand_binds_null() {
    let fragment = criterion_to_sql(&like("email", None, false).unwrap()).unwrap();
    assert_eq!(fragment.sql, "email LIKE ?");
    assert_eq!(fragment.params, vec![Value::Null]);
}

#[test]
fn membership_uses_json_each() {
    let fragment = criterion_to_sql(&has_member("tags", "rust", true).unwrap()).unwrap();
    assert_eq!(
        fragment.sql,
        "EXISTS (SELECT 1 FROM json_each(tags) WHERE json_each.value = ?)"
    );
    assert_eq!(fragment.params, vec![Value::from("rust")]);

    let fragment = criterion_to_sql(&has_members("profile.city", ["Oslo"])).unwrap();
    assert_eq!(fragment.sql, "(json_extract(profile, '$.city') = ?)");
}

#[test]
fn logical_nodes_parenthesize_children_and_keep_bind_order() {
    let criterion = and([
        eq("a", 1, true),
        Some(or([eq("b", 2, true), eq("c", 3, true)])),
    ]);

    let fragment = criterion_to_sql(&criterion).unwrap();
    assert_eq!(fragment.sql, "(a = ?) AND ((b = ?) OR (c = ?))");
    assert_eq!(
        fragment.params,
        vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]
    );
}

#[test]
fn empty_logical_nodes_render_constants() {
    let empty_in = in_("id", Vec::<i64>::new(), false).unwrap();
    assert_eq!(criterion_to_sql(&empty_in).unwrap().sql, "1 = 0");

    let empty_not_in = not_in("id", Vec::<i64>::new(), false).unwrap();
    assert_eq!(criterion_to_sql(&empty_not_in).unwrap().sql, "1 = 1");

    let no_tags = criterion_to_sql(&has_members("tags", Vec::<&str>::new())).unwrap();
    assert_eq!(no_tags.sql, "1 = 0");
    assert!(no_tags.params.is_empty());

    let no_cities = criterion_to_sql(&has_members("addresses.city", Vec::<&str>::new())).unwrap();
    assert_eq!(no_cities.sql, "1 = 0");
}

#[test]
fn invalid_field_names_are_rejected() {
    let err = criterion_to_sql(&eq("name = 1 OR 1", 1, false).unwrap()).unwrap_err();
    assert_eq!(err, QueryError::InvalidField("name = 1 OR 1".to_string()));

    let err = selector_to_sql(&sum("*")).unwrap_err();
    assert_eq!(err, QueryError::InvalidField("*".to_string()));

    let err = selector_to_sql(&count_distinct("*")).unwrap_err();
    assert_eq!(err, QueryError::InvalidField("*".to_string()));
}

#[test]
fn selectors_render_aggregates() {
    assert_eq!(selector_to_sql(&count("id")).unwrap(), "COUNT(id)");
    assert_eq!(selector_to_sql(&count("*")).unwrap(), "COUNT(*)");
    assert_eq!(
        selector_to_sql(&count_distinct("email")).unwrap(),
        "COUNT(DISTINCT email)"
    );
    assert_eq!(selector_to_sql(&sum("amount")).unwrap(), "SUM(amount)");
}

#[test]
fn where_clause_is_empty_without_predicates() {
    let fragment = where_clause(&Criteria::new().add(eq("a", "", true))).unwrap();
    assert!(fragment.sql.is_empty());
    assert!(fragment.params.is_empty());

    let fragment = where_clause(&Criteria::new().add(eq("a", 1, true))).unwrap();
    assert_eq!(fragment.sql, " WHERE a = ?");
}
