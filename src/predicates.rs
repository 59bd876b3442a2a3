use crate::{
    config::VariableId,
    values::{FrequencyType, StringValue},
};

/// A reference to an attribute inside an expression: the textual name, plus
/// the variable id once `assign_variable_id` has run.
#[derive(Clone, Debug)]
pub struct AttrVar {
    pub(crate) attr: String,
    pub(crate) var: Option<VariableId>,
}

impl AttrVar {
    pub fn new(name: &str) -> Self {
        Self {
            attr: name.to_owned(),
            var: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.attr
    }

    /// The assigned variable id. Reading it before `assign_variable_id` has
    /// run is a caller bug.
    pub(crate) fn id(&self) -> VariableId {
        self.var.unwrap_or_else(|| {
            panic!(
                "variable id for attribute {:?} has not been assigned",
                self.attr
            )
        })
    }

    /// Compares by variable id when both sides are compiled, by name
    /// otherwise.
    pub(crate) fn eq_var(&self, other: &AttrVar) -> bool {
        match (self.var, other.var) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.attr == other.attr,
            _ => false,
        }
    }
}

/// A string literal inside an expression: the raw text, plus its interned
/// (variable, string id) pair once `assign_str_id` has run.
#[derive(Clone, Debug)]
pub struct StringOperand {
    pub(crate) literal: String,
    pub(crate) interned: Option<StringValue>,
}

impl StringOperand {
    pub fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_owned(),
            interned: None,
        }
    }

    /// The interned form. Reading it before `assign_str_id` has run is a
    /// caller bug.
    pub(crate) fn id(&self) -> StringValue {
        self.interned.unwrap_or_else(|| {
            panic!("string literal {:?} has not been interned", self.literal)
        })
    }

    pub(crate) fn eq_interned(&self, other: &StringOperand) -> bool {
        match (self.interned, other.interned) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.literal == other.literal,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum ComparisonOperator {
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

impl ComparisonOperator {
    /// Mirror of the operator, used when the literal is written on the
    /// left: `15 < price` means `price > 15`.
    pub(crate) fn flip(self) -> Self {
        match self {
            ComparisonOperator::LessThan => ComparisonOperator::GreaterThan,
            ComparisonOperator::LessThanEqual => ComparisonOperator::GreaterThanEqual,
            ComparisonOperator::GreaterThan => ComparisonOperator::LessThan,
            ComparisonOperator::GreaterThanEqual => ComparisonOperator::LessThanEqual,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ComparisonValue {
    Integer(i64),
    Float(f64),
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum EqualityOperator {
    Equal,
    NotEqual,
}

#[derive(Clone, Debug)]
pub enum EqualityValue {
    Integer(i64),
    Float(f64),
    String(StringOperand),
}

impl EqualityValue {
    pub fn string(literal: &str) -> Self {
        Self::String(StringOperand::new(literal))
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum SetOperator {
    In,
    NotIn,
}

/// The left side of a set expression. Exactly one of the two sides of a set
/// expression is a variable; [`Node::set`](crate::Node::set) enforces it.
#[derive(Clone, Debug)]
pub enum SetLeft {
    Integer(i64),
    String(StringOperand),
    Variable(AttrVar),
}

impl SetLeft {
    pub fn string(literal: &str) -> Self {
        Self::String(StringOperand::new(literal))
    }

    pub fn variable(name: &str) -> Self {
        Self::Variable(AttrVar::new(name))
    }

    pub(crate) fn is_variable(&self) -> bool {
        matches!(self, SetLeft::Variable(_))
    }
}

/// The right side of a set expression.
#[derive(Clone, Debug)]
pub enum SetRight {
    IntegerList(Vec<i64>),
    StringList(Vec<StringOperand>),
    Variable(AttrVar),
}

impl SetRight {
    /// An integer list literal, sorted and deduplicated.
    pub fn integers(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self::IntegerList(values)
    }

    /// A string list literal, sorted lexically and deduplicated.
    pub fn strings(values: Vec<&str>) -> Self {
        Self::StringList(sorted_string_operands(values))
    }

    pub fn variable(name: &str) -> Self {
        Self::Variable(AttrVar::new(name))
    }

    pub(crate) fn is_variable(&self) -> bool {
        matches!(self, SetRight::Variable(_))
    }
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum ListOperator {
    OneOf,
    NoneOf,
    AllOf,
}

/// The literal list of a list expression.
#[derive(Clone, Debug)]
pub enum ListLiteral {
    IntegerList(Vec<i64>),
    StringList(Vec<StringOperand>),
}

impl ListLiteral {
    /// An integer list literal, sorted and deduplicated.
    pub fn integers(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self::IntegerList(values)
    }

    /// A string list literal, sorted lexically and deduplicated.
    pub fn strings(values: Vec<&str>) -> Self {
        Self::StringList(sorted_string_operands(values))
    }
}

fn sorted_string_operands(mut values: Vec<&str>) -> Vec<StringOperand> {
    values.sort_unstable();
    values.dedup();
    values.into_iter().map(StringOperand::new).collect()
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum SegmentOperator {
    Within,
    Before,
}

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum StringMatchOperator {
    Contains,
    StartsWith,
    EndsWith,
}

/// The specialized predicates.
#[derive(Clone, Debug)]
pub(crate) enum SpecialExpr {
    Frequency(FrequencyExpr),
    Segment(SegmentExpr),
    Geo(GeoExpr),
    String(StringMatchExpr),
}

#[derive(Clone, Debug)]
pub(crate) struct FrequencyExpr {
    pub(crate) attr_var: AttrVar,
    pub(crate) cap_type: FrequencyType,
    pub(crate) namespace: StringOperand,
    pub(crate) value: i64,
    pub(crate) length: i64,
}

#[derive(Clone, Debug)]
pub(crate) struct SegmentExpr {
    pub(crate) op: SegmentOperator,
    pub(crate) attr_var: AttrVar,
    pub(crate) segment_id: i64,
    pub(crate) seconds: i64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct GeoExpr {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) radius: f64,
}

#[derive(Clone, Debug)]
pub(crate) struct StringMatchExpr {
    pub(crate) op: StringMatchOperator,
    pub(crate) attr_var: AttrVar,
    pub(crate) pattern: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_list_literals_are_sorted_and_deduplicated() {
        let literal = ListLiteral::integers(vec![3, 1, 2, 3, 1]);

        match literal {
            ListLiteral::IntegerList(values) => assert_eq!(vec![1, 2, 3], values),
            _ => panic!("expected an integer list"),
        }
    }

    #[test]
    fn string_list_literals_are_sorted_and_deduplicated() {
        let literal = ListLiteral::strings(vec!["deal-2", "deal-1", "deal-2"]);

        match literal {
            ListLiteral::StringList(values) => {
                let literals: Vec<_> = values.iter().map(|v| v.literal.as_str()).collect();
                assert_eq!(vec!["deal-1", "deal-2"], literals);
            }
            _ => panic!("expected a string list"),
        }
    }
}
