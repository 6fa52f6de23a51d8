//! End-to-end tests for the qb module.

use crate::error::QbError;
use crate::expr::{Func, Raw};
use crate::qb::{Conditional, Statement, TableRef, delete, insert, select, update};
use crate::value::{Operand, Value};

fn text(s: &str) -> Value {
    Value::from(s)
}

#[test]
fn test_select_basic() {
    let qb = select("users");
    assert_eq!(qb.build().unwrap().sql, "Select * From `users`");
}

#[test]
fn test_select_with_conditions() {
    let built = select("users")
        .where_eq("status", "active")
        .where_op("age", ">", 18)
        .limit(10)
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "Select * From `users` Where `status` = ? And `age` > ? Limit 10"
    );
    assert_eq!(built.params, vec![text("active"), Value::from(18)]);
}

#[test]
fn test_placeholders_match_params() {
    let built = select("t")
        .column(Raw::new("?? + ?", ["a", "1"]))
        .left_join_on("j", |on| on.on("j.id", "t.id").or_on("j.x", Raw::new("?", [2])))
        .where_in("a", [1, 2, 3])
        .or_where_group(|g| {
            g.where_between("b", 4, 5)
                .where_eq("c", Func::with_args("lower", ["x"]).unwrap())
        })
        .where_in_query("d", select("s").column("id").where_eq("k", 6))
        .build()
        .unwrap();

    assert_eq!(built.placeholder_count(), built.params.len());
    assert_eq!(built.params.len(), 9);
}

#[test]
fn test_first_predicate_drops_combinator() {
    let sql = select("t")
        .or_where_eq("a", 1)
        .or_where_eq("b", 2)
        .build()
        .unwrap()
        .sql;
    assert_eq!(sql, "Select * From `t` Where `a` = ? Or `b` = ?");
}

#[test]
fn test_nested_group() {
    let built = select("t")
        .where_eq("a", 1)
        .or_where_group(|g| g.or_where_eq("b", 2).where_op("c", "like", "%x%"))
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "Select * From `t` Where `a` = ? Or (`b` = ? And `c` like ?)"
    );
    assert_eq!(built.params, vec![Value::from(1), Value::from(2), text("%x%")]);
}

#[test]
fn test_deeply_nested_groups() {
    let sql = delete("t")
        .where_group(|g| g.where_eq("a", 1).or_where_group(|h| h.where_eq("b", 2).where_eq("c", 3)))
        .build()
        .unwrap()
        .sql;
    assert_eq!(
        sql,
        "Delete From `t` Where (`a` = ? Or (`b` = ? And `c` = ?))"
    );
}

#[test]
fn test_empty_group_is_skipped() {
    let sql = select("t")
        .where_group(|g| g)
        .where_eq("a", 1)
        .build()
        .unwrap()
        .sql;
    assert_eq!(sql, "Select * From `t` Where `a` = ?");
}

#[test]
fn test_invalid_operator_fails_build() {
    let err = update("t")
        .set("a", 1)
        .where_op("b", "<=>", 2)
        .build()
        .unwrap_err();
    assert_eq!(err, QbError::InvalidOperator("<=>".into()));
}

#[test]
fn test_invalid_operator_in_nested_group_fails_build() {
    let err = select("t")
        .where_group(|g| g.where_op("a", "===", 1))
        .build()
        .unwrap_err();
    assert!(matches!(err, QbError::InvalidOperator(_)));
}

#[test]
fn test_operator_renders_verbatim() {
    let sql = select("t")
        .where_op("a", "LIKE", "x%")
        .where_op("b", "not in", vec![1, 2])
        .build()
        .unwrap()
        .sql;
    assert_eq!(sql, "Select * From `t` Where `a` LIKE ? And `b` not in (?, ?)");
}

#[test]
fn test_criteria_shapes() {
    let built = select("t")
        .and_where(("a", 1))
        .and_where(("b", ">=", 2))
        .or_where([("c", 3), ("d", 4)])
        .and_where(Raw::new("?? Is Not Null", ["e"]))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Select * From `t` Where `a` = ? And `b` >= ? Or `c` = ? Or `d` = ? And `e` Is Not Null"
    );
    assert_eq!(built.params.len(), 4);
}

#[test]
fn test_where_value_function_is_parameterized() {
    let built = select("t")
        .where_eq("d", Func::with_args("date", ["2020-01-01"]).unwrap())
        .build()
        .unwrap();
    assert_eq!(built.sql, "Select * From `t` Where `d` = Date(?)");
    assert_eq!(built.params, vec![text("2020-01-01")]);
}

#[test]
fn test_column_function_is_escaped() {
    let sql = select("t")
        .column_as(Func::with_args("max", ["t.price"]).unwrap(), "m")
        .build()
        .unwrap()
        .sql;
    assert_eq!(sql, "Select Max(`t`.`price`) as `m` From `t`");
}

#[test]
fn test_unsupported_column_escape() {
    let err = select("t")
        .column(Func::with_args("abs", [5]).unwrap())
        .build()
        .unwrap_err();
    assert_eq!(err, QbError::UnsupportedEscape("a number".into()));
}

#[test]
fn test_derived_table_params_come_first() {
    let built = select(TableRef::derived("d", select("inner").where_eq("x", 1)))
        .where_eq("y", 2)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Select * From (Select * From `inner` Where `x` = ?) as `d` Where `y` = ?"
    );
    assert_eq!(built.params, vec![Value::from(1), Value::from(2)]);
}

#[test]
fn test_subquery_error_propagates() {
    let err = select("t")
        .where_exists(select("s").where_op("a", "?", 1))
        .build()
        .unwrap_err();
    assert!(matches!(err, QbError::InvalidOperator(_)));
}

#[test]
fn test_raw_override_ignores_clauses() {
    let built = select("t")
        .where_eq("a", 1)
        .order_by("b")
        .raw("Select 1 From ?? Where ?? = ?", ["x", "y", "z"])
        .build()
        .unwrap();
    assert_eq!(built.sql, "Select 1 From `x` Where `y` = ?");
    assert_eq!(built.params, vec![text("z")]);
}

#[test]
fn test_missing_raw_identifier_param() {
    let err = select("t")
        .where_raw(Raw::new("?? = ??", ["a"]))
        .build()
        .unwrap_err();
    assert_eq!(err, QbError::MissingRawParameter { position: 2 });
}

#[test]
fn test_null_value_binds_null() {
    let built = update("t")
        .set("a", None::<i32>)
        .where_eq("id", 1)
        .build()
        .unwrap();
    assert_eq!(built.sql, "Update `t` Set `a` = ? Where `id` = ?");
    assert_eq!(built.params[0], Value::Null);
}

#[test]
fn test_insert_mixed_operands() {
    let built = insert("t")
        .values_map([
            ("name", Operand::from("foo")),
            ("created", Func::new("now").unwrap().into()),
            ("slug", Raw::new("Lower(?)", ["Foo"]).into()),
        ])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `t` (`name`, `created`, `slug`) Values (?, Now(), Lower(?))"
    );
    assert_eq!(built.params, vec![text("foo"), text("Foo")]);
}

#[test]
fn test_debug_sql_matches_build() {
    let q = select("t").where_eq("a", "it's").where_eq("b", 2);
    assert_eq!(
        q.to_debug_sql().unwrap(),
        "Select * From `t` Where `a` = \"it\\'s\" And `b` = \"2\""
    );
}

#[test]
fn test_question_mark_in_identifier() {
    let built = select("t")
        .where_eq("why?", 1)
        .where_raw(Raw::new("?? = ?", ["a?b", "v"]))
        .build()
        .unwrap();

    assert_eq!(built.sql, "Select * From `t` Where `why?` = ? And `a?b` = ?");
    assert_eq!(built.placeholder_count(), built.params.len());
    assert_eq!(
        built.to_debug_sql(),
        "Select * From `t` Where `why?` = \"1\" And `a?b` = \"v\""
    );
}

#[test]
fn test_or_negated_helpers() {
    let built = delete("t")
        .where_eq("a", 1)
        .or_where_not_between("b", 2, 3)
        .or_where_not_exists(select("s").where_eq("k", 4))
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "Delete From `t` Where `a` = ? Or `b` Not Between ? And ? Or Not Exists (Select * From `s` Where `k` = ?)"
    );
    assert_eq!(built.params.len(), 4);
}

#[test]
fn test_raw_expr_override() {
    let built = update("t")
        .set("a", 1)
        .raw_expr(Raw::new("Update ?? Set ?? = ?", ["t", "b", "2"]))
        .build()
        .unwrap();

    assert_eq!(built.sql, "Update `t` Set `b` = ?");
    assert_eq!(built.params, vec![text("2")]);
}

#[test]
fn test_builders_are_cloneable_values() {
    let base = select("t").where_eq("a", 1);
    let narrowed = base.clone().where_eq("b", 2);
    assert_eq!(base.build().unwrap().params.len(), 1);
    assert_eq!(narrowed.build().unwrap().params.len(), 2);
}

#[test]
fn test_build_is_repeatable() {
    let q = insert("t").values([1, 2]);
    assert_eq!(q.build().unwrap(), q.build().unwrap());
}
