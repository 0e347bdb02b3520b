//! Operand type checking and type inference for SQL operators
//!
//! Validation binds each operator call to a [`CallBinding`], asks the
//! operator's [`OperandTypeChecker`] whether the operand types fit, and then
//! derives the call's type through a [`ReturnTypeInference`] strategy.
//! Ready-made checkers and strategies live in [`strategies`].

pub mod call_binding;
pub mod checker;
pub mod count_range;
pub mod inference;
pub mod strategies;

pub use call_binding::{CallBinding, Literal, OperandList, actual_signature, signature_error};
pub use checker::{
    AssignableChecker, ComparableChecker, CompositeChecker, CompositePolicy, ExplicitChecker,
    FamilyChecker, LiteralChecker, MultisetChecker, OperandTypeChecker,
    PositiveIntegerLiteralChecker, RecordMultisetChecker, SameChecker, SetOpChecker,
};
pub use count_range::OperandCountRange;
pub use inference::{OperandTypeInference, ReturnTypeInference, TypeTransform};
