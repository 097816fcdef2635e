//! Tests for formulas, the printer and the parser.

use super::*;

fn lit(name: &str) -> Formula {
    Formula::literal(name)
}

#[test]
fn test_precedence() {
    let parsed = Formula::parse("A | B & !C => D <=> E").unwrap();
    let expected = Formula::bi_implies(
        Formula::implies(
            Formula::or([lit("A"), Formula::and([lit("B"), Formula::not(lit("C"))])]),
            lit("D"),
        ),
        lit("E"),
    );
    assert_eq!(parsed, expected);
}

#[test]
fn test_implication_is_right_associative() {
    let parsed = Formula::parse("A => B => C").unwrap();
    assert_eq!(
        parsed,
        Formula::implies(lit("A"), Formula::implies(lit("B"), lit("C")))
    );
}

#[test]
fn test_display_round_trips_nested_structure() {
    let formulas = [
        "A & (B & C)",
        "(A | B) & !(C => D)",
        "(A => B) => C",
        "choose(1, A, B, C)",
        "between(2, 3, A, B, C, D)",
        "atleast(1, A | B, C)",
        "Car => atmost(1, Radio, \"Sat Nav\")",
        "!!A <=> true",
    ];
    for text in formulas {
        let parsed = Formula::parse(text).unwrap();
        assert_eq!(parsed.to_string(), text);
        assert_eq!(Formula::parse(&parsed.to_string()).unwrap(), parsed);
    }
}

#[test]
fn test_quoted_names() {
    let parsed = Formula::parse(r#""true" & "a \"b\"""#).unwrap();
    assert_eq!(parsed, Formula::and([lit("true"), lit("a \"b\"")]));
    assert_eq!(parsed.to_string(), r#""true" & "a \"b\"""#);
}

#[test]
fn test_parse_errors() {
    assert_eq!(Formula::parse("A &").unwrap_err().position, 3);
    assert!(Formula::parse("(A | B").is_err());
    assert!(Formula::parse("A = B").is_err());
    assert!(Formula::parse("foo(1, A)").is_err());
    assert!(Formula::parse("choose(x, A)").is_err());
    assert!(Formula::parse("A B").is_err());
    assert!(Formula::parse("\"open").is_err());
}

#[test]
fn test_variables_are_distinct_in_order() {
    let f = Formula::parse("B => (A | B) & !C").unwrap();
    assert_eq!(f.variables(), vec!["B", "A", "C"]);
}

#[test]
fn test_rename_variable() {
    let mut f = Formula::parse("A => (A | B)").unwrap();
    assert_eq!(f.rename_variable("A", "Z"), 2);
    assert_eq!(f.to_string(), "Z => Z | B");
}

#[test]
fn test_evaluate() {
    let f = Formula::parse("Car => choose(1, Manual, Automatic)").unwrap();
    let assign = |sel: &'static [&'static str]| move |name: &str| Some(sel.contains(&name));

    assert_eq!(f.evaluate(&assign(&["Car", "Manual"])), Some(true));
    assert_eq!(f.evaluate(&assign(&["Car", "Manual", "Automatic"])), Some(false));
    assert_eq!(f.evaluate(&assign(&["Car"])), Some(false));
    assert_eq!(f.evaluate(&assign(&[])), Some(true));
    assert_eq!(f.evaluate(&|_: &str| None), None);
}

#[test]
fn test_cardinality_evaluation() {
    let ops = || vec![lit("A"), lit("B"), lit("C")];
    let only_a = |name: &str| Some(name == "A");

    assert_eq!(Formula::AtLeast(2, ops()).evaluate(&only_a), Some(false));
    assert_eq!(Formula::AtMost(1, ops()).evaluate(&only_a), Some(true));
    assert_eq!(Formula::Between(1, 2, ops()).evaluate(&only_a), Some(true));
    assert_eq!(Formula::Between(2, 3, ops()).evaluate(&only_a), Some(false));
}
