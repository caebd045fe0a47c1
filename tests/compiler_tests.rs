// tests/compiler_tests.rs

use chrono::{TimeZone, Utc};
use mongoq::ast::{BinOp, Expr};
use mongoq::compiler::{CompileError, Compiler, Context};
use mongoq::output::to_json_value;
use mongoq::{Error, QueryValue, TranslateOptions, Translator, translate};
use serde_json::{Value, json};

fn query(expr: &str) -> Value {
    let doc = translate(expr).unwrap_or_else(|e| panic!("{}: {}", expr, e));
    to_json_value(&doc)
}

fn compile_error(expr: &str) -> CompileError {
    match translate(expr) {
        Err(Error::Compile(e)) => e,
        other => panic!("Expected compile error for {}, got {:?}", expr, other),
    }
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_multi_and() {
    assert_eq!(
        query("age>10 && height<5 && width==4"),
        json!({"age": {"$gt": 10}, "height": {"$lt": 5}, "width": 4})
    );
}

#[test]
fn test_int_float_bool() {
    assert_eq!(
        query("age>10 && height<5.1 && dead==true"),
        json!({"age": {"$gt": 10}, "height": {"$lt": 5.1}, "dead": true})
    );
}

#[test]
fn test_quoted_bool_stays_string() {
    assert_eq!(
        query(r#"dead==TRUE && alive=="false""#),
        json!({"alive": "false", "dead": true})
    );
}

#[test]
fn test_not_equal() {
    assert_eq!(
        query(r#"name != "Bob" && age > 18"#),
        json!({"age": {"$gt": 18}, "name": {"$ne": "Bob"}})
    );
}

#[test]
fn test_ordering_operators() {
    assert_eq!(
        query("a < 1 && b <= 2 && c > 3 && d >= 4"),
        json!({"a": {"$lt": 1}, "b": {"$lte": 2}, "c": {"$gt": 3}, "d": {"$gte": 4}})
    );
}

#[test]
fn test_negative_number() {
    assert_eq!(query("temp > -5"), json!({"temp": {"$gt": -5}}));
}

#[test]
fn test_unquoted_value() {
    assert_eq!(query("name == Alice"), json!({"name": "Alice"}));
}

#[test]
fn test_quoted_field_path() {
    assert_eq!(
        query(r#""data.accelerometer_3313.0.x_value_5702">5"#),
        json!({"data.accelerometer_3313.0.x_value_5702": {"$gt": 5}})
    );
}

#[test]
fn test_nested_paths() {
    for (expr, key) in [
        (r#"level1 == "Alice""#, "level1"),
        (r#"level1.level2 == "Alice""#, "level1.level2"),
        (r#"level1.level2.level3 == "Alice""#, "level1.level2.level3"),
        (r#"level1.level2.level3.level4 == "Alice""#, "level1.level2.level3.level4"),
    ] {
        assert_eq!(query(expr), json!({ key: "Alice" }), "Failed for {}", expr);
    }
}

#[test]
fn test_ordering_rejects_strings() {
    let err = compile_error(r#"person.age >= "test""#);
    assert!(matches!(
        err,
        CompileError::InvalidRightOperand {
            operator: BinOp::GreaterEqual,
            ..
        }
    ));
    assert!(err.to_string().contains("'>='"));

    let err = compile_error(r#"age > "ten""#);
    assert_eq!(err.subject().as_deref(), Some(">"));
}

#[test]
fn test_left_operand_must_be_a_field() {
    let err = compile_error("exists(a) == 1");
    assert!(matches!(err, CompileError::InvalidLeftOperand { operator: BinOp::Equal, .. }));
}

#[test]
fn test_float_out_of_range() {
    let err = compile_error("x == 1e999");
    assert!(matches!(err, CompileError::InvalidLiteral(_)));
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let text = format!("{}a == 1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert!(translate(&text).unwrap_err().is_syntax());
}

#[test]
fn test_integer_out_of_range() {
    let err = compile_error("age > 99999999999999999999");
    assert!(matches!(err, CompileError::InvalidLiteral(_)));
}

// ============================================================================
// Logical connectives
// ============================================================================

#[test]
fn test_parens() {
    assert_eq!(
        query(r#"person.age >= 18 && (person.name == "Alice" || name == "Bob")"#),
        json!({
            "$or": [{"person.name": "Alice"}, {"name": "Bob"}],
            "person.age": {"$gte": 18}
        })
    );
}

#[test]
fn test_multi_or_is_flattened() {
    assert_eq!(
        query("age>10 || height<5 || width==4"),
        json!({"$or": [
            {"age": {"$gt": 10}},
            {"height": {"$lt": 5}},
            {"width": 4}
        ]})
    );
}

#[test]
fn test_grouped_or_is_not_absorbed() {
    assert_eq!(
        query("a == 1 || (b == 2 || c == 3)"),
        json!({"$or": [{"a": 1}, {"$or": [{"b": 2}, {"c": 3}]}]})
    );
}

#[test]
fn test_repeated_key_falls_back_to_and() {
    assert_eq!(
        query("age > 10 && age < 20"),
        json!({"$and": [{"age": {"$gt": 10}}, {"age": {"$lt": 20}}]})
    );
}

#[test]
fn test_word_connectives() {
    assert_eq!(
        query(r#"age > 10 and name == "x" OR deleted"#),
        json!({"$or": [
            {"age": {"$gt": 10}, "name": "x"},
            {"deleted": {"$exists": true}}
        ]})
    );
}

#[test]
fn test_and_requires_documents() {
    let err = compile_error(r#"a && ("b")"#);
    assert!(matches!(err, CompileError::UnsupportedUse { operator: BinOp::And, .. }));
}

// ============================================================================
// Existence
// ============================================================================

#[test]
fn test_exists() {
    assert_eq!(query("name"), json!({"name": {"$exists": true}}));
    assert_eq!(query(r#""name""#), json!({"name": {"$exists": true}}));
    assert_eq!(query("person.age"), json!({"person.age": {"$exists": true}}));
}

#[test]
fn test_not_exists() {
    assert_eq!(query("!name"), json!({"name": {"$exists": false}}));
    assert_eq!(query("!person.age"), json!({"person.age": {"$exists": false}}));
}

#[test]
fn test_exists_and() {
    assert_eq!(
        query("name && age > 10"),
        json!({"age": {"$gt": 10}, "name": {"$exists": true}})
    );
}

#[test]
fn test_exists_inside_group() {
    assert_eq!(
        query("age > 10 && (name || !desc)"),
        json!({
            "$or": [{"name": {"$exists": true}}, {"desc": {"$exists": false}}],
            "age": {"$gt": 10}
        })
    );
}

#[test]
fn test_negated_group() {
    assert_eq!(query("!(a == 1)"), json!({"$not": {"a": 1}}));
    assert_eq!(query("!!name"), json!({"$not": {"name": {"$exists": false}}}));
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_in() {
    assert_eq!(
        query(r#"name == ("Alice"| "Bob")"#),
        json!({"name": {"$in": ["Alice", "Bob"]}})
    );
    assert_eq!(
        query(r#"name == ("Alice" | "Bob" | "Charlie" | "Maya")"#),
        json!({"name": {"$in": ["Alice", "Bob", "Charlie", "Maya"]}})
    );
}

#[test]
fn test_nin() {
    assert_eq!(
        query(r#"name != ("Alice" | "Bob")"#),
        json!({"name": {"$nin": ["Alice", "Bob"]}})
    );
    assert_eq!(
        query(r#"name != ("Alice" | "Bob" | "Charlie")"#),
        json!({"name": {"$nin": ["Alice", "Bob", "Charlie"]}})
    );
}

#[test]
fn test_nested_groups_keep_membership_context() {
    assert_eq!(
        query(r#"x == (("A" | "B"))"#),
        json!({"x": {"$in": ["A", "B"]}})
    );
}

#[test]
fn test_all() {
    assert_eq!(
        query(r#"name == ("Alice" & "Bob" & "Charlie")"#),
        json!({"name": {"$all": ["Alice", "Bob", "Charlie"]}})
    );
}

#[test]
fn test_single_value_group() {
    assert_eq!(
        query(r#"id==("64d7b3661b467d611d5f1401")"#),
        json!({"id": {"$oid": "64d7b3661b467d611d5f1401"}})
    );
}

#[test]
fn test_membership_with_ordering_is_rejected() {
    let err = compile_error(r#"name > ("Alice" | "Bob" | "Charlie")"#);
    assert!(matches!(
        err,
        CompileError::InvalidRightOperand {
            operator: BinOp::GreaterThan,
            found: "document"
        }
    ));
}

#[test]
fn test_mixed_membership_is_rejected() {
    let err = compile_error(r#"name == ("Alice" | "Bob" & "Charlie")"#);
    assert!(matches!(err, CompileError::UnsupportedUse { operator: BinOp::AllOf, .. }));
    assert!(err.to_string().starts_with("unsupported use of '&'"));
}

#[test]
fn test_all_of_under_inequality_is_rejected() {
    let err = compile_error(r#"name != ("Alice" & "Bob")"#);
    assert!(matches!(err, CompileError::UnsupportedUse { operator: BinOp::AllOf, .. }));
}

#[test]
fn test_or_of_all_lists() {
    let expr = [
        r#"tagArray==("customer:ARAMARK" & "_manufacturer:Chevrolet")"#,
        r#"tagArray==("customer:ARAMARK" & "_manufacturer:GMC")"#,
        r#"tagArray==("customer:ARAMARK" & "_manufacturer:Buick")"#,
        r#"tagArray==("customer:ARAMARK" & "_manufacturer:Cadillac")"#,
    ]
    .join(" || ");

    assert_eq!(
        query(&expr),
        json!({"$or": [
            {"tagArray": {"$all": ["customer:ARAMARK", "_manufacturer:Chevrolet"]}},
            {"tagArray": {"$all": ["customer:ARAMARK", "_manufacturer:GMC"]}},
            {"tagArray": {"$all": ["customer:ARAMARK", "_manufacturer:Buick"]}},
            {"tagArray": {"$all": ["customer:ARAMARK", "_manufacturer:Cadillac"]}}
        ]})
    );
}

// ============================================================================
// String values
// ============================================================================

#[test]
fn test_object_id() {
    assert_eq!(
        query(r#"_id == "5fc4722ae367f19055977d1f""#),
        json!({"_id": {"$oid": "5fc4722ae367f19055977d1f"}})
    );
}

#[test]
fn test_almost_object_id_stays_string() {
    assert_eq!(
        query(r#"_id == "5fc4722ae367f19055977d1""#),
        json!({"_id": "5fc4722ae367f19055977d1"})
    );
    assert_eq!(
        query(r#"_id == "zzc4722ae367f19055977d1f""#),
        json!({"_id": "zzc4722ae367f19055977d1f"})
    );
}

#[test]
fn test_wildcard_and_slash_patterns() {
    assert_eq!(
        query(r#"name == "Al*ce""#),
        json!({"name": {"$regex": "Al.*ce", "$options": "i"}})
    );
    assert_eq!(
        query(r#"name == "/Al.*ce/""#),
        json!({"name": {"$regex": "Al.*ce", "$options": "i"}})
    );
    assert_eq!(
        query(r#"name == "Alice*""#),
        json!({"name": {"$regex": "Alice.*", "$options": "i"}})
    );
}

#[test]
fn test_single_slash_is_plain_text() {
    assert_eq!(query(r#"path == "/""#), json!({"path": "/"}));
}

#[test]
fn test_string_escapes() {
    assert_eq!(query(r#"quote == "say \"hi\"""#), json!({"quote": "say \"hi\""}));
}

#[test]
fn test_reserved_word_as_field() {
    assert_eq!(query(r#""type" == "Alice""#), json!({"type": "Alice"}));
    assert_eq!(query(r#"type == "Alice""#), json!({"type": "Alice"}));
    assert_eq!(query(r#"meta.type == "x""#), json!({"meta.type": "x"}));
    assert_eq!(query("exists(type)"), json!({"type": {"$exists": true}}));
}

#[test]
fn test_custom_reserved_words() {
    let translator = Translator::with_options(TranslateOptions {
        reserved_words: vec!["type".to_string(), "status".to_string()],
    });

    assert_eq!(
        translator.prepare(r#"status == "status" && meta.status"#),
        r#""status" == "status" && meta.status"#
    );

    let doc = translator.translate("status == active").unwrap();
    assert_eq!(to_json_value(&doc), json!({"status": "active"}));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_calls() {
    assert_eq!(query("exists(name)"), json!({"name": {"$exists": true}}));
    assert_eq!(query("nexists(name.foo)"), json!({"name.foo": {"$exists": false}}));
    assert_eq!(
        query("age > 10 && exists(name.foo)"),
        json!({"age": {"$gt": 10}, "name.foo": {"$exists": true}})
    );
    assert_eq!(
        query(r#"name == regex(".*Alice.*")"#),
        json!({"name": {"$regex": ".*Alice.*", "$options": "i"}})
    );
    assert_eq!(
        query("name == contains(Alice)"),
        json!({"name": {"$regex": ".*Alice.*", "$options": "i"}})
    );
}

#[test]
fn test_dates() {
    assert_eq!(
        query(r#"ts==date("2020-12-01T00:00:00Z")"#),
        json!({"ts": {"$date": "2020-12-01T00:00:00.000Z"}})
    );
    assert_eq!(
        query(r#"ts==date("20201201","20060102")"#),
        json!({"ts": {"$date": "2020-12-01T00:00:00.000Z"}})
    );
}

#[test]
fn test_date_relative_with_fixed_clock() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let translator = Translator::new().with_compiler(Compiler::with_clock(now));

    let doc = translator.translate(r#"updated > dateRelative("-24h")"#).unwrap();
    assert_eq!(
        to_json_value(&doc),
        json!({"updated": {"$gt": {"$date": "2024-03-09T12:00:00.000Z"}}})
    );
}

#[test]
fn test_full_text_search() {
    assert_eq!(
        query("search(bob, willy, joe)"),
        json!({"$text": {"$search": "bob willy joe"}})
    );
    assert_eq!(
        query(r#"search(bob, willy, "-joe")"#),
        json!({"$text": {"$search": "bob willy -joe"}})
    );
}

#[test]
fn test_unknown_function() {
    let err = compile_error("like(name)");
    assert_eq!(err, CompileError::UnknownFunction("like".to_string()));
}

#[test]
fn test_bad_date() {
    let err = compile_error(r#"ts == date("yesterday")"#);
    assert!(matches!(err, CompileError::InvalidArgument { .. }));
    assert_eq!(err.subject().as_deref(), Some("date"));
}

// ============================================================================
// Root
// ============================================================================

#[test]
fn test_root_must_be_document() {
    assert_eq!(
        compile_error("true"),
        CompileError::NotADocument { found: "boolean" }
    );
    assert_eq!(compile_error("42"), CompileError::NotADocument { found: "integer" });
}

#[test]
fn test_syntax_errors_are_reported_as_such() {
    assert!(translate("age >").unwrap_err().is_syntax());
    assert!(!translate(r#"age > "ten""#).unwrap_err().is_syntax());
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn test_identifier_depends_on_context() {
    let compiler = Compiler::new();
    let name = Expr::Identifier("name".to_string());

    let exists = compiler.compile_node(&name, Context::Operator(BinOp::Or)).unwrap();
    assert!(matches!(exists, QueryValue::Document(_)));

    let plain = compiler.compile_node(&name, Context::Operator(BinOp::Equal)).unwrap();
    assert_eq!(plain, QueryValue::from("name"));

    let grouped = compiler.compile_node(&name, Context::Group(None)).unwrap();
    assert_eq!(grouped, QueryValue::from("name"));
}

#[test]
fn test_string_exists_only_under_and() {
    let compiler = Compiler::new();
    let name = Expr::string("name");

    let under_and = compiler.compile_node(&name, Context::Operator(BinOp::And)).unwrap();
    assert!(matches!(under_and, QueryValue::Document(_)));

    let under_or = compiler.compile_node(&name, Context::Operator(BinOp::Or)).unwrap();
    assert_eq!(under_or, QueryValue::from("name"));
}

#[test]
fn test_any_of_chain_returns_list() {
    let compiler = Compiler::new();
    let chain = Expr::binary(BinOp::AnyOf, Expr::string("A"), Expr::string("B"));

    let nested = compiler.compile_node(&chain, Context::Operator(BinOp::AnyOf)).unwrap();
    assert_eq!(nested, QueryValue::List(vec!["A".into(), "B".into()]));

    let negated = compiler.compile_node(&chain, Context::Operator(BinOp::NotEqual)).unwrap();
    let doc = negated.as_document().unwrap();
    assert!(doc.contains_key("$nin"));
}
