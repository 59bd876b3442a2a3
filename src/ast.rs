use crate::{
    error::ExpressionError,
    pred_map::PredicateId,
    predicates::{
        AttrVar, ComparisonOperator, ComparisonValue, EqualityOperator, EqualityValue,
        FrequencyExpr, GeoExpr, ListLiteral, ListOperator, SegmentExpr, SegmentOperator, SetLeft,
        SetOperator, SetRight, SpecialExpr, StringMatchExpr, StringMatchOperator, StringOperand,
    },
    values::{feq, FrequencyType},
};

/// Attribute read by the segment predicates when no explicit attribute is
/// named.
pub(crate) const DEFAULT_SEGMENTS_ATTR: &str = "segments_with_timestamp";

/// Attribute holding the frequency caps of an event.
pub(crate) const FREQUENCY_CAPS_ATTR: &str = "frequency_caps";

/// A node of a targeting expression tree.
///
/// Nodes are built by the constructors below (or by
/// [`parse`](crate::parse)), mutated only by the three compiler passes, and
/// read-only afterwards. The predicate id is `None` until
/// [`assign_pred_id`](crate::assign_pred_id) has run.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) id: Option<PredicateId>,
    pub(crate) expr: Expr,
}

#[derive(Clone, Debug)]
pub(crate) enum Expr {
    NumericCompare {
        op: ComparisonOperator,
        attr_var: AttrVar,
        value: ComparisonValue,
    },
    Equality {
        op: EqualityOperator,
        attr_var: AttrVar,
        value: EqualityValue,
    },
    Bool(BoolExpr),
    Set {
        op: SetOperator,
        left: SetLeft,
        right: SetRight,
    },
    List {
        op: ListOperator,
        attr_var: AttrVar,
        value: ListLiteral,
    },
    Special(SpecialExpr),
}

#[derive(Clone, Debug)]
pub(crate) enum BoolExpr {
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    Variable(AttrVar),
}

impl Node {
    fn new(expr: Expr) -> Self {
        Self { id: None, expr }
    }

    /// The predicate id, once [`assign_pred_id`](crate::assign_pred_id) has
    /// run.
    pub fn id(&self) -> Option<PredicateId> {
        self.id
    }

    pub fn numeric_compare(op: ComparisonOperator, attr: &str, value: ComparisonValue) -> Self {
        Self::new(Expr::NumericCompare {
            op,
            attr_var: AttrVar::new(attr),
            value,
        })
    }

    pub fn equality(op: EqualityOperator, attr: &str, value: EqualityValue) -> Self {
        Self::new(Expr::Equality {
            op,
            attr_var: AttrVar::new(attr),
            value,
        })
    }

    pub fn and(lhs: Node, rhs: Node) -> Self {
        Self::new(Expr::Bool(BoolExpr::And(Box::new(lhs), Box::new(rhs))))
    }

    pub fn or(lhs: Node, rhs: Node) -> Self {
        Self::new(Expr::Bool(BoolExpr::Or(Box::new(lhs), Box::new(rhs))))
    }

    pub fn negate(child: Node) -> Self {
        Self::new(Expr::Bool(BoolExpr::Not(Box::new(child))))
    }

    pub fn variable(attr: &str) -> Self {
        Self::new(Expr::Bool(BoolExpr::Variable(AttrVar::new(attr))))
    }

    /// A set membership expression. Exactly one side must be a variable.
    pub fn set(op: SetOperator, left: SetLeft, right: SetRight) -> Result<Self, ExpressionError> {
        if left.is_variable() == right.is_variable() {
            return Err(ExpressionError::InvalidSetExpression);
        }
        Ok(Self::set_unchecked(op, left, right))
    }

    pub(crate) fn set_unchecked(op: SetOperator, left: SetLeft, right: SetRight) -> Self {
        Self::new(Expr::Set { op, left, right })
    }

    pub fn list(op: ListOperator, attr: &str, value: ListLiteral) -> Self {
        Self::new(Expr::List {
            op,
            attr_var: AttrVar::new(attr),
            value,
        })
    }

    pub fn within_frequency_cap(
        cap_type: FrequencyType,
        namespace: &str,
        value: i64,
        length: i64,
    ) -> Self {
        Self::new(Expr::Special(SpecialExpr::Frequency(FrequencyExpr {
            attr_var: AttrVar::new(FREQUENCY_CAPS_ATTR),
            cap_type,
            namespace: StringOperand::new(namespace),
            value,
            length,
        })))
    }

    pub fn segment_within(attr: Option<&str>, segment_id: i64, seconds: i64) -> Self {
        Self::segment(SegmentOperator::Within, attr, segment_id, seconds)
    }

    pub fn segment_before(attr: Option<&str>, segment_id: i64, seconds: i64) -> Self {
        Self::segment(SegmentOperator::Before, attr, segment_id, seconds)
    }

    fn segment(op: SegmentOperator, attr: Option<&str>, segment_id: i64, seconds: i64) -> Self {
        let attr_var = AttrVar::new(attr.unwrap_or(DEFAULT_SEGMENTS_ATTR));
        Self::new(Expr::Special(SpecialExpr::Segment(SegmentExpr {
            op,
            attr_var,
            segment_id,
            seconds,
        })))
    }

    pub fn geo_within_radius(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self::new(Expr::Special(SpecialExpr::Geo(GeoExpr {
            latitude,
            longitude,
            radius,
        })))
    }

    pub fn contains(attr: &str, pattern: &str) -> Self {
        Self::string_match(StringMatchOperator::Contains, attr, pattern)
    }

    pub fn starts_with(attr: &str, pattern: &str) -> Self {
        Self::string_match(StringMatchOperator::StartsWith, attr, pattern)
    }

    pub fn ends_with(attr: &str, pattern: &str) -> Self {
        Self::string_match(StringMatchOperator::EndsWith, attr, pattern)
    }

    fn string_match(op: StringMatchOperator, attr: &str, pattern: &str) -> Self {
        Self::new(Expr::Special(SpecialExpr::String(StringMatchExpr {
            op,
            attr_var: AttrVar::new(attr),
            pattern: pattern.to_owned(),
        })))
    }

    /// Structural equality: compares tags and payloads, ignoring predicate
    /// ids. Floats compare with the crate equality epsilon, strings by
    /// their interned (variable, string id) pair.
    pub fn eq_expr(&self, other: &Node) -> bool {
        eq_expr(self, other)
    }
}

pub(crate) fn eq_expr(a: &Node, b: &Node) -> bool {
    match (&a.expr, &b.expr) {
        (
            Expr::NumericCompare {
                op: op_a,
                attr_var: var_a,
                value: value_a,
            },
            Expr::NumericCompare {
                op: op_b,
                attr_var: var_b,
                value: value_b,
            },
        ) => op_a == op_b && var_a.eq_var(var_b) && eq_comparison_value(value_a, value_b),
        (
            Expr::Equality {
                op: op_a,
                attr_var: var_a,
                value: value_a,
            },
            Expr::Equality {
                op: op_b,
                attr_var: var_b,
                value: value_b,
            },
        ) => op_a == op_b && var_a.eq_var(var_b) && eq_equality_value(value_a, value_b),
        (Expr::Bool(bool_a), Expr::Bool(bool_b)) => eq_bool_expr(bool_a, bool_b),
        (
            Expr::Set {
                op: op_a,
                left: left_a,
                right: right_a,
            },
            Expr::Set {
                op: op_b,
                left: left_b,
                right: right_b,
            },
        ) => op_a == op_b && eq_set_left(left_a, left_b) && eq_set_right(right_a, right_b),
        (
            Expr::List {
                op: op_a,
                attr_var: var_a,
                value: value_a,
            },
            Expr::List {
                op: op_b,
                attr_var: var_b,
                value: value_b,
            },
        ) => op_a == op_b && var_a.eq_var(var_b) && eq_list_literal(value_a, value_b),
        (Expr::Special(special_a), Expr::Special(special_b)) => {
            eq_special_expr(special_a, special_b)
        }
        _ => false,
    }
}

fn eq_comparison_value(a: &ComparisonValue, b: &ComparisonValue) -> bool {
    match (a, b) {
        (ComparisonValue::Integer(a), ComparisonValue::Integer(b)) => a == b,
        (ComparisonValue::Float(a), ComparisonValue::Float(b)) => feq(*a, *b),
        _ => false,
    }
}

fn eq_equality_value(a: &EqualityValue, b: &EqualityValue) -> bool {
    match (a, b) {
        (EqualityValue::Integer(a), EqualityValue::Integer(b)) => a == b,
        (EqualityValue::Float(a), EqualityValue::Float(b)) => feq(*a, *b),
        (EqualityValue::String(a), EqualityValue::String(b)) => a.eq_interned(b),
        _ => false,
    }
}

fn eq_bool_expr(a: &BoolExpr, b: &BoolExpr) -> bool {
    match (a, b) {
        (BoolExpr::And(lhs_a, rhs_a), BoolExpr::And(lhs_b, rhs_b))
        | (BoolExpr::Or(lhs_a, rhs_a), BoolExpr::Or(lhs_b, rhs_b)) => {
            eq_expr(lhs_a, lhs_b) && eq_expr(rhs_a, rhs_b)
        }
        (BoolExpr::Not(child_a), BoolExpr::Not(child_b)) => eq_expr(child_a, child_b),
        (BoolExpr::Variable(var_a), BoolExpr::Variable(var_b)) => var_a.eq_var(var_b),
        _ => false,
    }
}

fn eq_set_left(a: &SetLeft, b: &SetLeft) -> bool {
    match (a, b) {
        (SetLeft::Integer(a), SetLeft::Integer(b)) => a == b,
        (SetLeft::String(a), SetLeft::String(b)) => a.eq_interned(b),
        (SetLeft::Variable(a), SetLeft::Variable(b)) => a.eq_var(b),
        _ => false,
    }
}

fn eq_set_right(a: &SetRight, b: &SetRight) -> bool {
    match (a, b) {
        (SetRight::IntegerList(a), SetRight::IntegerList(b)) => a == b,
        (SetRight::StringList(a), SetRight::StringList(b)) => eq_string_list(a, b),
        (SetRight::Variable(a), SetRight::Variable(b)) => a.eq_var(b),
        _ => false,
    }
}

fn eq_list_literal(a: &ListLiteral, b: &ListLiteral) -> bool {
    match (a, b) {
        (ListLiteral::IntegerList(a), ListLiteral::IntegerList(b)) => a == b,
        (ListLiteral::StringList(a), ListLiteral::StringList(b)) => eq_string_list(a, b),
        _ => false,
    }
}

fn eq_string_list(a: &[StringOperand], b: &[StringOperand]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.eq_interned(b))
}

fn eq_special_expr(a: &SpecialExpr, b: &SpecialExpr) -> bool {
    match (a, b) {
        (SpecialExpr::Frequency(a), SpecialExpr::Frequency(b)) => {
            a.attr_var.eq_var(&b.attr_var)
                && a.cap_type == b.cap_type
                && a.namespace.eq_interned(&b.namespace)
                && a.value == b.value
                && a.length == b.length
        }
        (SpecialExpr::Segment(a), SpecialExpr::Segment(b)) => {
            a.op == b.op
                && a.attr_var.eq_var(&b.attr_var)
                && a.segment_id == b.segment_id
                && a.seconds == b.seconds
        }
        (SpecialExpr::Geo(a), SpecialExpr::Geo(b)) => {
            feq(a.latitude, b.latitude) && feq(a.longitude, b.longitude) && feq(a.radius, b.radius)
        }
        (SpecialExpr::String(a), SpecialExpr::String(b)) => {
            a.op == b.op && a.attr_var.eq_var(&b.attr_var) && a.pattern == b.pattern
        }
        _ => false,
    }
}
