mod common;

use common::{eval, execute};
use exprcc::{BinaryOp, Node, generate_assembly, parse_expression};
use proptest::prelude::*;

fn arb_op() -> impl Strategy<Value = BinaryOp> {
  prop_oneof![
    Just(BinaryOp::Add),
    Just(BinaryOp::Sub),
    Just(BinaryOp::Mul),
    Just(BinaryOp::Div),
  ]
}

fn arb_node() -> impl Strategy<Value = Node> {
  let leaf = (0..1000i64).prop_map(Node::number);
  leaf.prop_recursive(5, 32, 2, |inner| {
    (arb_op(), inner.clone(), inner).prop_map(|(op, lhs, rhs)| Node::binary(op, lhs, rhs))
  })
}

/// Fully parenthesized source text for `node`.
fn source_of(node: &Node) -> String {
  match node {
    Node::Num { value } => value.to_string(),
    Node::Binary { op, lhs, rhs } => format!("({} {} {})", source_of(lhs), op.symbol(), source_of(rhs)),
  }
}

proptest! {
  #[test]
  fn parsing_recovers_the_tree(node in arb_node()) {
    prop_assert_eq!(parse_expression(&source_of(&node)).unwrap(), node);
  }

  #[test]
  fn listing_computes_the_tree_value(node in arb_node()) {
    let expected = eval(&node);
    prop_assume!(expected.is_some());
    let asm = generate_assembly(&source_of(&node)).unwrap();
    prop_assert_eq!(execute(&asm).ok(), expected);
  }

  #[test]
  fn chains_without_parens_fold_left(values in prop::collection::vec(0..100i64, 1..8)) {
    let source = values.iter().map(i64::to_string).collect::<Vec<_>>().join(" - ");
    let expected = values[1..].iter().fold(values[0], |acc, v| acc - v);
    let asm = generate_assembly(&source).unwrap();
    prop_assert_eq!(execute(&asm).unwrap(), expected);
  }
}
