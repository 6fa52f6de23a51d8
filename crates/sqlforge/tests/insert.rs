use sqlforge::{Func, Operand, QbError, Raw, Statement, Value, insert};

const TABLE: &str = "table-name";

fn texts(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::from(*s)).collect()
}

#[test]
fn insert_simple() {
    let built = insert(TABLE)
        .columns(["name", "email"])
        .values(["foo", "my@email.com"])
        .build()
        .unwrap();
    assert_eq!(built.sql, "Insert Into `table-name` (`name`, `email`) Values (?, ?)");
    assert_eq!(built.params, texts(&["foo", "my@email.com"]));
}

#[test]
fn insert_keyed_row() {
    let built = insert(TABLE)
        .values_map([("name", "foo"), ("email", "my@email.com")])
        .build()
        .unwrap();
    assert_eq!(built.sql, "Insert Into `table-name` (`name`, `email`) Values (?, ?)");
    assert_eq!(built.params, texts(&["foo", "my@email.com"]));
}

#[test]
fn insert_keyed_row_with_explicit_columns() {
    let built = insert(TABLE)
        .columns(["name", "email"])
        .values_map([("name_assoc", "foo"), ("email_assoc", "my@email.com")])
        .build()
        .unwrap();
    assert_eq!(built.sql, "Insert Into `table-name` (`name`, `email`) Values (?, ?)");
    assert_eq!(built.params, texts(&["foo", "my@email.com"]));
}

#[test]
fn insert_keyed_rows_over_several_calls() {
    let built = insert(TABLE)
        .values_map([("name", "foo"), ("email", "foo@email.com")])
        .values_map([("name", "bar"), ("email", "bar@email.com")])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `email`) Values (?, ?), (?, ?)"
    );
    assert_eq!(
        built.params,
        texts(&["foo", "foo@email.com", "bar", "bar@email.com"])
    );
}

#[test]
fn insert_multiple_rows_at_once() {
    let rows = [
        [("name", "foo"), ("email", "foo@email.com")],
        [("name", "bar"), ("email", "bar@email.com")],
    ];
    let built = insert(TABLE)
        .columns(["name", "email"])
        .values_maps(rows)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `email`) Values (?, ?), (?, ?)"
    );

    let built = insert(TABLE)
        .values_rows([["foo", "foo@email.com"], ["bar", "bar@email.com"]])
        .build()
        .unwrap();
    assert_eq!(built.sql, "Insert Into `table-name` Values (?, ?), (?, ?)");
    assert_eq!(
        built.params,
        texts(&["foo", "foo@email.com", "bar", "bar@email.com"])
    );
}

#[test]
fn insert_ignore() {
    let built = insert(TABLE)
        .ignore(true)
        .values_maps([
            [("name", "foo"), ("email", "foo@email.com")],
            [("name", "bar"), ("email", "bar@email.com")],
        ])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Ignore Into `table-name` (`name`, `email`) Values (?, ?), (?, ?)"
    );
}

#[test]
fn on_duplicate_update_with_values() {
    let built = insert(TABLE)
        .values_map([("name", "foo"), ("email", "foo@email.com")])
        .on_duplicate_update_map([("name", "bar"), ("email", "bar@email.com")])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `email`) Values (?, ?) On Duplicate Key Update `name` = ?, `email` = ?"
    );
    assert_eq!(
        built.params,
        texts(&["foo", "foo@email.com", "bar", "bar@email.com"])
    );
}

#[test]
fn on_duplicate_update_from_inserted_values() {
    let built = insert(TABLE)
        .values_map([("name", "foo"), ("email", "foo@email.com")])
        .on_duplicate_values(["name"])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `email`) Values (?, ?) On Duplicate Key Update `name` = Values(`name`)"
    );
    assert_eq!(built.params, texts(&["foo", "foo@email.com"]));
}

#[test]
fn on_duplicate_update_with_raw() {
    let built = insert(TABLE)
        .values_map([("name", "foo"), ("email", "foo@email.com")])
        .on_duplicate_update("name", Raw::new("Replace(?, ?, ??)", ["bla", "", "name"]))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `email`) Values (?, ?) On Duplicate Key Update `name` = Replace(?, ?, `name`)"
    );
    assert_eq!(built.params, texts(&["foo", "foo@email.com", "bla", ""]));
}

#[test]
fn insert_raw_override() {
    let built = insert(TABLE)
        .raw(
            "Insert Into ?? (??,??) values (?,?)",
            [TABLE, "name", "email", "foo", "foo@email.com"],
        )
        .build()
        .unwrap();
    assert_eq!(built.sql, "Insert Into `table-name` (`name`,`email`) values (?,?)");
    assert_eq!(built.params, texts(&["foo", "foo@email.com"]));
}

#[test]
fn insert_with_function_value() {
    let built = insert(TABLE)
        .values_map([
            ("name", Operand::from("foo")),
            ("last_update", Operand::from(Func::new("Now").unwrap())),
        ])
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "Insert Into `table-name` (`name`, `last_update`) Values (?, Now())"
    );
    assert_eq!(built.params, texts(&["foo"]));
}

#[test]
fn insert_requires_rows() {
    let err = insert(TABLE).columns(["a"]).build().unwrap_err();
    assert!(matches!(err, QbError::Validation(_)));
}
