//! Property-based tests for the audit pipeline
//!
//! These tests verify invariants that should hold for all inputs:
//! - Diffing a module against itself reports only common methods
//! - Extracted function spans never overlap across a whole module, with free
//!   functions, decorators, nested classes and redefinitions mixed in
//! - Every kept method lies inside its class, every nested class inside its
//!   outer class
//! - Coverage percentages stay within [0, 100]
//! - Ranking is deterministic and ordered by score then path

use proptest::prelude::*;
use refactor_audit::config::AuditConfig;
use refactor_audit::coverage::CoverageRecord;
use refactor_audit::pipeline::{run_audit, AuditInputs, ModuleSource};
use refactor_audit::{diff_models, extract_structure, LineSpan};
use std::collections::BTreeSet;
use std::path::Path;

/// Python keywords to avoid
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "case", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return", "try", "type", "while",
    "with", "yield", "None", "True", "False",
];

/// Generate valid Python identifier (avoiding keywords)
fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("not a keyword", |s| !PYTHON_KEYWORDS.contains(&s.as_str()))
}

fn class_source(class: &str, methods: &BTreeSet<String>, body_lines: usize) -> String {
    let mut source = format!("class {}:\n", class.to_uppercase());
    for method in methods {
        source.push_str(&format!("    def {method}(self, x):\n"));
        for i in 0..body_lines {
            source.push_str(&format!("        x = x + {i}\n"));
        }
        source.push_str("        return x\n\n");
    }
    source
}

/// A function or method definition.
#[derive(Debug, Clone)]
struct Def {
    name: String,
    decorated: bool,
    body_lines: usize,
}

#[derive(Debug, Clone)]
enum Item {
    Function(Def),
    Class {
        name: String,
        members: Vec<Def>,
        nested: Option<(String, Vec<Def>)>,
    },
}

/// Small pools so redefinitions are common.
fn function_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["run", "step", "_helper", "__init__"]).prop_map(str::to_string)
}

fn class_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Alpha", "Beta", "Gamma"]).prop_map(str::to_string)
}

fn def() -> impl Strategy<Value = Def> {
    (function_name(), any::<bool>(), 0usize..3).prop_map(|(name, decorated, body_lines)| Def {
        name,
        decorated,
        body_lines,
    })
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        def().prop_map(Item::Function),
        (
            class_name(),
            prop::collection::vec(def(), 1..4),
            prop::option::of((class_name(), prop::collection::vec(def(), 1..3))),
        )
            .prop_map(|(name, members, nested)| Item::Class { name, members, nested }),
    ]
}

fn render_def(source: &mut String, indent: &str, def: &Def) {
    if def.decorated {
        source.push_str(&format!("{indent}@decorator(1)\n"));
    }
    source.push_str(&format!("{indent}def {}(self, x):\n", def.name));
    for i in 0..def.body_lines {
        source.push_str(&format!("{indent}    x = x + {i}\n"));
    }
    source.push_str(&format!("{indent}    return x\n\n"));
}

fn render_module(items: &[Item]) -> String {
    let mut source = String::new();
    for item in items {
        match item {
            Item::Function(def) => render_def(&mut source, "", def),
            Item::Class { name, members, nested } => {
                source.push_str(&format!("class {name}:\n"));
                let (first, rest) = members.split_first().expect("classes have members");
                render_def(&mut source, "    ", first);
                if let Some((inner, inner_members)) = nested {
                    source.push_str(&format!("    class {inner}:\n"));
                    for member in inner_members {
                        render_def(&mut source, "        ", member);
                    }
                }
                for member in rest {
                    render_def(&mut source, "    ", member);
                }
            }
        }
    }
    source
}

proptest! {
    /// Property: a module diffed against itself has no missing or added
    /// methods and every method is common
    #[test]
    fn prop_self_diff_is_all_common(
        class in python_identifier(),
        methods in prop::collection::btree_set(python_identifier(), 1..8),
        body_lines in 0usize..4,
    ) {
        let source = class_source(&class, &methods, body_lines);
        let model = extract_structure(Path::new("m.py"), &source).unwrap();
        let diff = diff_models(&model, &model);

        prop_assert_eq!(diff.total_added(), 0);
        prop_assert_eq!(diff.total_missing(), 0);
        let class_diff = &diff.classes[&class.to_uppercase()];
        prop_assert_eq!(&class_diff.methods.common, &methods);
        prop_assert!(class_diff.methods.signature_changed.is_empty());
    }

    /// Property: every kept function of a module, method or free, occupies
    /// its own lines
    #[test]
    fn prop_function_spans_do_not_overlap(items in prop::collection::vec(item(), 1..6)) {
        let source = render_module(&items);
        let model = extract_structure(Path::new("m.py"), &source).unwrap();
        let spans: Vec<(String, LineSpan)> = model
            .all_functions()
            .map(|f| (f.qualified_name.clone(), f.span()))
            .collect();

        for (i, (a_name, a)) in spans.iter().enumerate() {
            for (b_name, b) in spans.iter().skip(i + 1) {
                prop_assert!(!a.overlaps(b), "{} {:?} overlaps {} {:?}\n{}", a_name, a, b_name, b, source);
            }
        }
    }

    /// Property: kept methods sit inside their class and kept nested
    /// classes inside a kept outer class
    #[test]
    fn prop_kept_definitions_are_enclosed(items in prop::collection::vec(item(), 1..6)) {
        let source = render_module(&items);
        let model = extract_structure(Path::new("m.py"), &source).unwrap();

        for class in &model.classes {
            let span = LineSpan::new(class.start_line, class.end_line);
            for method in &class.methods {
                prop_assert!(span.contains(method.start_line) && span.contains(method.end_line),
                    "{} outside {}\n{}", method.qualified_name, class.name, source);
            }
            if let Some((outer, _)) = class.name.rsplit_once('.') {
                let outer = model.class(outer);
                prop_assert!(outer.is_some_and(|o| o.start_line < class.start_line && class.end_line <= o.end_line),
                    "{} not inside {:?}\n{}", class.name, outer.map(|o| &o.name), source);
            }
        }
    }

    /// Property: coverage is a percentage whatever the tool reports
    #[test]
    fn prop_coverage_is_bounded(hits in 0usize..500, lines in 0usize..200) {
        let record = CoverageRecord::measured(hits, lines);
        prop_assert!((0.0..=100.0).contains(&record.coverage));
        prop_assert!(record.hits <= record.lines);
    }

    /// Property: two runs over the same inputs rank files identically, by
    /// descending score and then by path
    #[test]
    fn prop_ranking_is_deterministic(
        branches in prop::collection::vec(0usize..6, 1..6),
    ) {
        let modules: Vec<ModuleSource> = branches
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let mut source = String::from("def f(x):\n");
                for b in 0..count {
                    source.push_str(&format!("    if x == {b}:\n        return {b}\n"));
                }
                source.push_str("    return x\n");
                ModuleSource::new(format!("pkg/mod_{i}.py"), Some(source.clone()), Some(source))
            })
            .collect();
        let inputs = AuditInputs { modules, ..AuditInputs::default() };
        let config = AuditConfig::default();

        let first = run_audit(&inputs, &config).unwrap().ranked();
        let second = run_audit(&inputs, &config).unwrap().ranked();
        prop_assert_eq!(&first, &second);

        for pair in first.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].path < pair[1].path)
            );
        }
    }
}
