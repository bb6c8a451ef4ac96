use crate::operator::Operator;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::TT;
use ahash::HashMap;
use once_cell::sync::Lazy;

fn by_token(pairs: &[(TT, OperatorName)]) -> HashMap<TT, &'static Operator> {
  pairs
    .iter()
    .map(|&(tt, name)| (tt, &OPERATORS[&name]))
    .collect()
}

/// Operators that follow an operand: binary, assignment, and the call/member/conditional forms
/// the expression parser handles itself.
#[rustfmt::skip]
pub static MULTARY_OPERATOR_MAPPING: Lazy<HashMap<TT, &'static Operator>> = Lazy::new(|| by_token(&[
  (TT::Ampersand, OperatorName::BitwiseAnd),
  (TT::AmpersandAmpersand, OperatorName::LogicalAnd),
  (TT::AmpersandAmpersandEquals, OperatorName::AssignmentLogicalAnd),
  (TT::AmpersandEquals, OperatorName::AssignmentBitwiseAnd),
  (TT::Asterisk, OperatorName::Multiplication),
  (TT::AsteriskAsterisk, OperatorName::Exponentiation),
  (TT::AsteriskAsteriskEquals, OperatorName::AssignmentExponentiation),
  (TT::AsteriskEquals, OperatorName::AssignmentMultiplication),
  (TT::Bar, OperatorName::BitwiseOr),
  (TT::BarBar, OperatorName::LogicalOr),
  (TT::BarBarEquals, OperatorName::AssignmentLogicalOr),
  (TT::BarEquals, OperatorName::AssignmentBitwiseOr),
  (TT::BracketOpen, OperatorName::ComputedMemberAccess),
  (TT::Caret, OperatorName::BitwiseXor),
  (TT::CaretEquals, OperatorName::AssignmentBitwiseXor),
  (TT::ChevronLeft, OperatorName::LessThan),
  (TT::ChevronLeftChevronLeft, OperatorName::BitwiseLeftShift),
  (TT::ChevronLeftChevronLeftEquals, OperatorName::AssignmentBitwiseLeftShift),
  (TT::ChevronLeftEquals, OperatorName::LessThanOrEqual),
  (TT::ChevronRight, OperatorName::GreaterThan),
  (TT::ChevronRightChevronRight, OperatorName::BitwiseRightShift),
  (TT::ChevronRightChevronRightChevronRight, OperatorName::BitwiseUnsignedRightShift),
  (TT::ChevronRightChevronRightChevronRightEquals, OperatorName::AssignmentBitwiseUnsignedRightShift),
  (TT::ChevronRightChevronRightEquals, OperatorName::AssignmentBitwiseRightShift),
  (TT::ChevronRightEquals, OperatorName::GreaterThanOrEqual),
  (TT::Comma, OperatorName::Comma),
  (TT::Dot, OperatorName::MemberAccess),
  (TT::Equals, OperatorName::Assignment),
  (TT::EqualsEquals, OperatorName::Equality),
  (TT::EqualsEqualsEquals, OperatorName::StrictEquality),
  (TT::ExclamationEquals, OperatorName::Inequality),
  (TT::ExclamationEqualsEquals, OperatorName::StrictInequality),
  (TT::Hyphen, OperatorName::Subtraction),
  (TT::HyphenEquals, OperatorName::AssignmentSubtraction),
  (TT::KeywordIn, OperatorName::In),
  (TT::KeywordInstanceof, OperatorName::Instanceof),
  (TT::ParenthesisOpen, OperatorName::Call),
  (TT::Percent, OperatorName::Remainder),
  (TT::PercentEquals, OperatorName::AssignmentRemainder),
  (TT::Plus, OperatorName::Addition),
  (TT::PlusEquals, OperatorName::AssignmentAddition),
  (TT::Question, OperatorName::Conditional),
  (TT::QuestionQuestion, OperatorName::NullishCoalescing),
  (TT::QuestionQuestionEquals, OperatorName::AssignmentNullishCoalescing),
  (TT::Slash, OperatorName::Division),
  (TT::SlashEquals, OperatorName::AssignmentDivision),
]));

// Postfix `++`/`--` share tokens with the prefix forms and are recognized by the expression parser.
#[rustfmt::skip]
pub static UNARY_OPERATOR_MAPPING: Lazy<HashMap<TT, &'static Operator>> = Lazy::new(|| by_token(&[
  (TT::Exclamation, OperatorName::LogicalNot),
  (TT::Hyphen, OperatorName::UnaryNegation),
  (TT::HyphenHyphen, OperatorName::PrefixDecrement),
  (TT::KeywordDelete, OperatorName::Delete),
  (TT::KeywordNew, OperatorName::New),
  (TT::KeywordTypeof, OperatorName::Typeof),
  (TT::KeywordVoid, OperatorName::Void),
  (TT::Plus, OperatorName::UnaryPlus),
  (TT::PlusPlus, OperatorName::PrefixIncrement),
  (TT::Tilde, OperatorName::BitwiseNot),
]));
