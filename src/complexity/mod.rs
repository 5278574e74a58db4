pub mod constructs;
pub mod cyclomatic;

use crate::core::StructuralModel;
use crate::extraction::python::{is_stub_body, ClassNode, FunctionNode, SyntaxItem};
use crate::extraction::ParsedSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use constructs::{classify, Branch};
pub use cyclomatic::calculate_cyclomatic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityRecord {
    pub complexity: u32,
    pub is_stub: bool,
}

impl ComplexityRecord {
    pub fn stub() -> Self {
        Self {
            complexity: 1,
            is_stub: true,
        }
    }
}

/// Qualified name to complexity.
pub type ComplexityMap = BTreeMap<String, ComplexityRecord>;

/// Complexity of every method and free function in a parsed file.
///
/// Names follow the structural model, so a later duplicate definition
/// replaces an earlier one here as well.
pub fn analyze_source(parsed: &ParsedSource) -> ComplexityMap {
    let src = parsed.source().as_bytes();
    let mut records = ComplexityMap::new();
    for item in parsed.items() {
        match item {
            SyntaxItem::Function(function) => {
                records.insert(function.name.clone(), analyze_function(&function, src));
            }
            SyntaxItem::Class(class) => analyze_class(&class, None, src, &mut records),
        }
    }
    records
}

/// Complexity of the functions `model` kept.
///
/// Members of a class definition the model replaced with a later one of
/// the same name are left out, so every key names a function of `model`.
pub fn analyze_model(parsed: &ParsedSource, model: &StructuralModel) -> ComplexityMap {
    let mut records = analyze_source(parsed);
    records.retain(|name, _| model.find(name).is_some());
    records
}

fn analyze_class(class: &ClassNode<'_>, outer: Option<&str>, src: &[u8], records: &mut ComplexityMap) {
    let name = match outer {
        Some(outer) => format!("{outer}.{}", class.name),
        None => class.name.clone(),
    };
    for member in &class.members {
        match member {
            SyntaxItem::Function(function) => {
                records.insert(format!("{name}.{}", function.name), analyze_function(function, src));
            }
            SyntaxItem::Class(inner) => analyze_class(inner, Some(&name), src, records),
        }
    }
}

pub fn analyze_function(function: &FunctionNode<'_>, src: &[u8]) -> ComplexityRecord {
    match function.body {
        Some(body) if is_stub_body(body, src) => ComplexityRecord::stub(),
        Some(body) => ComplexityRecord {
            complexity: calculate_cyclomatic(body),
            is_stub: false,
        },
        None => ComplexityRecord::stub(),
    }
}

pub fn average_complexity(records: &ComplexityMap) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: u32 = records.values().map(|r| r.complexity).sum();
    sum as f64 / records.len() as f64
}

pub fn max_complexity(records: &ComplexityMap) -> u32 {
    records.values().map(|r| r.complexity).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::parse_python;
    use indoc::indoc;
    use std::path::Path;

    fn complexity_of(source: &str) -> ComplexityMap {
        let parsed = parse_python(Path::new("m.py"), source).unwrap();
        analyze_source(&parsed)
    }

    fn single(source: &str) -> u32 {
        let map = complexity_of(source);
        assert_eq!(map.len(), 1);
        map.values().next().unwrap().complexity
    }

    #[test]
    fn test_straight_line_function_is_one() {
        assert_eq!(
            single(indoc! {"
                def f(a, b):
                    c = a + b
                    return c
            "}),
            1
        );
    }

    #[test]
    fn test_if_statement_and_conditional_expression_score_the_same() {
        let statement = single(indoc! {"
            def f(x):
                if x:
                    y = 1
                else:
                    y = 2
                return y
        "});
        let expression = single(indoc! {"
            def f(x):
                return 1 if x else 2
        "});
        assert_eq!(statement, 2);
        assert_eq!(expression, statement);
    }

    #[test]
    fn test_elif_chain_counts_each_branch() {
        assert_eq!(
            single(indoc! {"
                def grade(n):
                    if n > 90:
                        return 'a'
                    elif n > 80:
                        return 'b'
                    elif n > 70:
                        return 'c'
                    return 'f'
            "}),
            4
        );
    }

    #[test]
    fn test_loops_boolean_operators_and_handlers() {
        assert_eq!(
            single(indoc! {"
                def f(items):
                    total = 0
                    for item in items:
                        while item and total < 10 or item is None:
                            total += 1
                    try:
                        pass
                    except ValueError:
                        pass
                    try:
                        pass
                    except* TypeError:
                        pass
                    return total
            "}),
            // for, while, and, or, except, except*
            7
        );
    }

    #[test]
    fn test_comprehension_clauses() {
        assert_eq!(
            single(indoc! {"
                def evens(xs):
                    return [x for x in xs if x % 2 == 0]
            "}),
            3
        );
    }

    #[test]
    fn test_match_arms() {
        assert_eq!(
            single(indoc! {"
                def f(cmd):
                    match cmd:
                        case 'a':
                            return 1
                        case 'b':
                            return 2
                        case _:
                            return 0
            "}),
            4
        );
    }

    #[test]
    fn test_stub_body() {
        let map = complexity_of(indoc! {r#"
            class Base:
                def run(self):
                    """Subclasses implement this."""
                    raise NotImplementedError
        "#});
        assert_eq!(map["Base.run"], ComplexityRecord::stub());
    }

    #[test]
    fn test_nested_function_branches_count_toward_enclosing() {
        let map = complexity_of(indoc! {"
            def outer(xs):
                def keep(x):
                    return x if x else None
                return [keep(x) for x in xs]
        "});
        assert_eq!(map.len(), 1);
        assert_eq!(map["outer"].complexity, 3);
    }

    #[test]
    fn test_classify_maps_kinds() {
        let parsed = parse_python(Path::new("m.py"), "x = a and b\n").unwrap();
        let statement = parsed.root().named_child(0).unwrap();
        let assignment = statement.named_child(0).unwrap();
        let right = assignment.child_by_field_name("right").unwrap();
        assert_eq!(classify(right), Some(Branch::BooleanOperator));
        assert_eq!(classify(statement), None);
    }

    #[test]
    fn test_average_of_empty_map_is_zero() {
        assert_eq!(average_complexity(&ComplexityMap::new()), 0.0);
        assert_eq!(max_complexity(&ComplexityMap::new()), 0);
    }

    #[test]
    fn test_replaced_class_members_are_dropped() {
        let parsed = parse_python(
            Path::new("m.py"),
            indoc! {"
                class Foo:
                    def old(self, x):
                        if x:
                            return 1
                        return 2

                class Foo:
                    def new(self):
                        return 3
            "},
        )
        .unwrap();
        let model = crate::extraction::build_model(&parsed);

        assert!(analyze_source(&parsed).contains_key("Foo.old"));
        let kept = analyze_model(&parsed, &model);
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["Foo.new"]);
        assert_eq!(kept["Foo.new"].complexity, 1);
    }
}
