use tree_sitter::Node;

/// A construct that adds one independent path through a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// `if`, `elif`, conditional expression, comprehension `if`.
    Conditional,
    /// `for`, `while`, comprehension `for`.
    Loop,
    /// One `and` / `or` operator.
    BooleanOperator,
    /// `except` and `except*` clauses.
    ExceptionHandler,
    /// One `case` of a `match` statement.
    MatchArm,
}

/// Classify a node. `None` for everything that does not branch.
pub fn classify(node: Node<'_>) -> Option<Branch> {
    match node.kind() {
        "if_statement" | "elif_clause" | "conditional_expression" | "if_clause" => {
            Some(Branch::Conditional)
        }
        "for_statement" | "while_statement" | "for_in_clause" => Some(Branch::Loop),
        "boolean_operator" => Some(Branch::BooleanOperator),
        "except_clause" | "except_group_clause" => Some(Branch::ExceptionHandler),
        "case_clause" => Some(Branch::MatchArm),
        _ => None,
    }
}
