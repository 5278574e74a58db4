use super::constructs::classify;
use tree_sitter::Node;

/// Cyclomatic complexity of a function body: 1 plus one per branch.
///
/// Nested functions and lambdas are walked too, they belong to the
/// enclosing definition.
pub fn calculate_cyclomatic(body: Node<'_>) -> u32 {
    1 + count_branches(body)
}

fn count_branches(node: Node<'_>) -> u32 {
    let own = u32::from(classify(node).is_some());
    let mut cursor = node.walk();
    let nested: u32 = node.children(&mut cursor).map(count_branches).sum();
    own + nested
}
