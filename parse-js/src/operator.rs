use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentBitwiseAnd,
  AssignmentBitwiseLeftShift,
  AssignmentBitwiseOr,
  AssignmentBitwiseRightShift,
  AssignmentBitwiseUnsignedRightShift,
  AssignmentBitwiseXor,
  AssignmentDivision,
  AssignmentExponentiation,
  AssignmentLogicalAnd,
  AssignmentLogicalOr,
  AssignmentMultiplication,
  AssignmentNullishCoalescing,
  AssignmentRemainder,
  AssignmentSubtraction,
  BitwiseAnd,
  BitwiseLeftShift,
  BitwiseNot,
  BitwiseOr,
  BitwiseRightShift,
  BitwiseUnsignedRightShift,
  BitwiseXor,
  Call,
  Comma,
  ComputedMemberAccess,
  Conditional,
  ConditionalAlternate,
  Delete,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  MemberAccess,
  Multiplication,
  New,
  NullishCoalescing,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
}

impl OperatorName {
  pub fn is_assignment(self) -> bool {
    matches!(
      self,
      OperatorName::Assignment
        | OperatorName::AssignmentAddition
        | OperatorName::AssignmentBitwiseAnd
        | OperatorName::AssignmentBitwiseLeftShift
        | OperatorName::AssignmentBitwiseOr
        | OperatorName::AssignmentBitwiseRightShift
        | OperatorName::AssignmentBitwiseUnsignedRightShift
        | OperatorName::AssignmentBitwiseXor
        | OperatorName::AssignmentDivision
        | OperatorName::AssignmentExponentiation
        | OperatorName::AssignmentLogicalAnd
        | OperatorName::AssignmentLogicalOr
        | OperatorName::AssignmentMultiplication
        | OperatorName::AssignmentNullishCoalescing
        | OperatorName::AssignmentRemainder
        | OperatorName::AssignmentSubtraction
    )
  }

  /// Source text of the operator, for operators that have one.
  pub fn text(self) -> Option<&'static str> {
    Some(match self {
      OperatorName::Addition | OperatorName::UnaryPlus => "+",
      OperatorName::Assignment => "=",
      OperatorName::AssignmentAddition => "+=",
      OperatorName::AssignmentBitwiseAnd => "&=",
      OperatorName::AssignmentBitwiseLeftShift => "<<=",
      OperatorName::AssignmentBitwiseOr => "|=",
      OperatorName::AssignmentBitwiseRightShift => ">>=",
      OperatorName::AssignmentBitwiseUnsignedRightShift => ">>>=",
      OperatorName::AssignmentBitwiseXor => "^=",
      OperatorName::AssignmentDivision => "/=",
      OperatorName::AssignmentExponentiation => "**=",
      OperatorName::AssignmentLogicalAnd => "&&=",
      OperatorName::AssignmentLogicalOr => "||=",
      OperatorName::AssignmentMultiplication => "*=",
      OperatorName::AssignmentNullishCoalescing => "??=",
      OperatorName::AssignmentRemainder => "%=",
      OperatorName::AssignmentSubtraction => "-=",
      OperatorName::BitwiseAnd => "&",
      OperatorName::BitwiseLeftShift => "<<",
      OperatorName::BitwiseNot => "~",
      OperatorName::BitwiseOr => "|",
      OperatorName::BitwiseRightShift => ">>",
      OperatorName::BitwiseUnsignedRightShift => ">>>",
      OperatorName::BitwiseXor => "^",
      OperatorName::Comma => ",",
      OperatorName::Delete => "delete",
      OperatorName::Division => "/",
      OperatorName::Equality => "==",
      OperatorName::Exponentiation => "**",
      OperatorName::GreaterThan => ">",
      OperatorName::GreaterThanOrEqual => ">=",
      OperatorName::In => "in",
      OperatorName::Inequality => "!=",
      OperatorName::Instanceof => "instanceof",
      OperatorName::LessThan => "<",
      OperatorName::LessThanOrEqual => "<=",
      OperatorName::LogicalAnd => "&&",
      OperatorName::LogicalNot => "!",
      OperatorName::LogicalOr => "||",
      OperatorName::Multiplication => "*",
      OperatorName::New => "new",
      OperatorName::NullishCoalescing => "??",
      OperatorName::PostfixDecrement | OperatorName::PrefixDecrement => "--",
      OperatorName::PostfixIncrement | OperatorName::PrefixIncrement => "++",
      OperatorName::Remainder => "%",
      OperatorName::StrictEquality => "===",
      OperatorName::StrictInequality => "!==",
      OperatorName::Subtraction | OperatorName::UnaryNegation => "-",
      OperatorName::Typeof => "typeof",
      OperatorName::Void => "void",
      OperatorName::Call
      | OperatorName::ComputedMemberAccess
      | OperatorName::Conditional
      | OperatorName::ConditionalAlternate
      | OperatorName::MemberAccess => return None,
    })
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Associativity {
  Left,
  Right,
}

#[derive(Debug)]
pub struct Operator {
  pub name: OperatorName,
  pub associativity: Associativity,
  // Higher binds tighter. Zero is never used so that a minimum precedence of 1 accepts everything.
  pub precedence: u8,
}

const PRECEDENCE_LEVELS: &[&[(OperatorName, Associativity)]] = &[
  &[
    (OperatorName::MemberAccess, Associativity::Left),
    (OperatorName::ComputedMemberAccess, Associativity::Left),
    (OperatorName::Call, Associativity::Left),
  ],
  &[(OperatorName::New, Associativity::Right)],
  &[
    (OperatorName::PostfixIncrement, Associativity::Left),
    (OperatorName::PostfixDecrement, Associativity::Left),
  ],
  &[
    (OperatorName::LogicalNot, Associativity::Right),
    (OperatorName::BitwiseNot, Associativity::Right),
    (OperatorName::UnaryPlus, Associativity::Right),
    (OperatorName::UnaryNegation, Associativity::Right),
    (OperatorName::PrefixIncrement, Associativity::Right),
    (OperatorName::PrefixDecrement, Associativity::Right),
    (OperatorName::Typeof, Associativity::Right),
    (OperatorName::Void, Associativity::Right),
    (OperatorName::Delete, Associativity::Right),
  ],
  &[(OperatorName::Exponentiation, Associativity::Right)],
  &[
    (OperatorName::Multiplication, Associativity::Left),
    (OperatorName::Division, Associativity::Left),
    (OperatorName::Remainder, Associativity::Left),
  ],
  &[
    (OperatorName::Addition, Associativity::Left),
    (OperatorName::Subtraction, Associativity::Left),
  ],
  &[
    (OperatorName::BitwiseLeftShift, Associativity::Left),
    (OperatorName::BitwiseRightShift, Associativity::Left),
    (OperatorName::BitwiseUnsignedRightShift, Associativity::Left),
  ],
  &[
    (OperatorName::LessThan, Associativity::Left),
    (OperatorName::LessThanOrEqual, Associativity::Left),
    (OperatorName::GreaterThan, Associativity::Left),
    (OperatorName::GreaterThanOrEqual, Associativity::Left),
    (OperatorName::In, Associativity::Left),
    (OperatorName::Instanceof, Associativity::Left),
  ],
  &[
    (OperatorName::Equality, Associativity::Left),
    (OperatorName::Inequality, Associativity::Left),
    (OperatorName::StrictEquality, Associativity::Left),
    (OperatorName::StrictInequality, Associativity::Left),
  ],
  &[(OperatorName::BitwiseAnd, Associativity::Left)],
  &[(OperatorName::BitwiseXor, Associativity::Left)],
  &[(OperatorName::BitwiseOr, Associativity::Left)],
  &[(OperatorName::LogicalAnd, Associativity::Left)],
  &[
    (OperatorName::LogicalOr, Associativity::Left),
    (OperatorName::NullishCoalescing, Associativity::Left),
  ],
  &[(OperatorName::Conditional, Associativity::Right)],
  &[
    (OperatorName::Assignment, Associativity::Right),
    (OperatorName::AssignmentAddition, Associativity::Right),
    (OperatorName::AssignmentBitwiseAnd, Associativity::Right),
    (OperatorName::AssignmentBitwiseLeftShift, Associativity::Right),
    (OperatorName::AssignmentBitwiseOr, Associativity::Right),
    (OperatorName::AssignmentBitwiseRightShift, Associativity::Right),
    (OperatorName::AssignmentBitwiseUnsignedRightShift, Associativity::Right),
    (OperatorName::AssignmentBitwiseXor, Associativity::Right),
    (OperatorName::AssignmentDivision, Associativity::Right),
    (OperatorName::AssignmentExponentiation, Associativity::Right),
    (OperatorName::AssignmentLogicalAnd, Associativity::Right),
    (OperatorName::AssignmentLogicalOr, Associativity::Right),
    (OperatorName::AssignmentMultiplication, Associativity::Right),
    (OperatorName::AssignmentNullishCoalescing, Associativity::Right),
    (OperatorName::AssignmentRemainder, Associativity::Right),
    (OperatorName::AssignmentSubtraction, Associativity::Right),
    (OperatorName::ConditionalAlternate, Associativity::Right),
  ],
  &[(OperatorName::Comma, Associativity::Left)],
];

pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  let mut map = HashMap::<OperatorName, Operator>::new();
  let levels = PRECEDENCE_LEVELS.len();
  for (i, level) in PRECEDENCE_LEVELS.iter().enumerate() {
    let precedence = (levels - i) as u8;
    for &(name, associativity) in level.iter() {
      map.insert(name, Operator {
        name,
        associativity,
        precedence,
      });
    }
  }
  map
});

#[cfg(test)]
mod tests {
  use super::OperatorName;
  use super::OPERATORS;

  #[test]
  fn test_precedence_order() {
    let prec = |name: OperatorName| OPERATORS[&name].precedence;
    assert_eq!(prec(OperatorName::Comma), 1);
    assert!(prec(OperatorName::Multiplication) > prec(OperatorName::Addition));
    assert!(prec(OperatorName::Addition) > prec(OperatorName::BitwiseRightShift));
    assert!(prec(OperatorName::BitwiseLeftShift) > prec(OperatorName::LessThan));
    assert!(prec(OperatorName::Conditional) > prec(OperatorName::Assignment));
    assert!(prec(OperatorName::Call) > prec(OperatorName::New));
    assert_eq!(
      prec(OperatorName::ConditionalAlternate),
      prec(OperatorName::Assignment)
    );
  }
}
