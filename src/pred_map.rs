use crate::{
    ast::{eq_expr, BoolExpr, Expr, Node},
    predicates::{
        AttrVar, ComparisonValue, EqualityValue, ListLiteral, SetLeft, SetRight, SpecialExpr,
        StringOperand,
    },
};
use std::{
    collections::{hash_map::DefaultHasher, HashMap},
    hash::{Hash, Hasher},
};

/// A dense id identifying a structurally canonical predicate or subtree.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash, Debug)]
pub struct PredicateId(pub(crate) usize);

impl PredicateId {
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Content-addressed registry of canonical predicates. Assigns every
/// structurally unique node a dense id from zero and keeps a deep clone of
/// each canonical representative.
#[derive(Default)]
pub(crate) struct PredicateMap {
    buckets: HashMap<u64, Vec<PredicateId>>,
    nodes: Vec<Node>,
}

impl PredicateMap {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Assigns ids post-order so that shared subtrees across expressions
    /// converge on the same canonical id.
    pub(crate) fn assign(&mut self, node: &mut Node) {
        match &mut node.expr {
            Expr::Bool(BoolExpr::And(lhs, rhs)) | Expr::Bool(BoolExpr::Or(lhs, rhs)) => {
                self.assign(lhs);
                self.assign(rhs);
            }
            Expr::Bool(BoolExpr::Not(child)) => self.assign(child),
            _ => {}
        }
        let key = structural_hash(node);
        let bucket = self.buckets.entry(key).or_default();
        for id in bucket.iter() {
            if eq_expr(&self.nodes[id.0], node) {
                node.id = Some(*id);
                return;
            }
        }
        let id = PredicateId(self.nodes.len());
        node.id = Some(id);
        let canonical = node.clone();
        self.nodes.push(canonical);
        self.buckets.entry(key).or_default().push(id);
    }
}

/// Hash over the structural content of a node. Float payloads contribute
/// only their presence, since they compare with an epsilon; candidates in
/// the same bucket are discriminated by `eq_expr`.
fn structural_hash(node: &Node) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_node(node, &mut hasher);
    hasher.finish()
}

fn hash_node(node: &Node, hasher: &mut impl Hasher) {
    match &node.expr {
        Expr::NumericCompare {
            op,
            attr_var,
            value,
        } => {
            hasher.write_u8(0);
            op.hash(hasher);
            hash_attr_var(attr_var, hasher);
            hash_comparison_value(value, hasher);
        }
        Expr::Equality {
            op,
            attr_var,
            value,
        } => {
            hasher.write_u8(1);
            op.hash(hasher);
            hash_attr_var(attr_var, hasher);
            hash_equality_value(value, hasher);
        }
        Expr::Bool(bool_expr) => {
            hasher.write_u8(2);
            hash_bool_expr(bool_expr, hasher);
        }
        Expr::Set { op, left, right } => {
            hasher.write_u8(3);
            op.hash(hasher);
            hash_set_left(left, hasher);
            hash_set_right(right, hasher);
        }
        Expr::List {
            op,
            attr_var,
            value,
        } => {
            hasher.write_u8(4);
            op.hash(hasher);
            hash_attr_var(attr_var, hasher);
            hash_list_literal(value, hasher);
        }
        Expr::Special(special) => {
            hasher.write_u8(5);
            hash_special_expr(special, hasher);
        }
    }
}

fn hash_bool_expr(bool_expr: &BoolExpr, hasher: &mut impl Hasher) {
    match bool_expr {
        BoolExpr::And(lhs, rhs) => {
            hasher.write_u8(0);
            hash_node(lhs, hasher);
            hash_node(rhs, hasher);
        }
        BoolExpr::Or(lhs, rhs) => {
            hasher.write_u8(1);
            hash_node(lhs, hasher);
            hash_node(rhs, hasher);
        }
        BoolExpr::Not(child) => {
            hasher.write_u8(2);
            hash_node(child, hasher);
        }
        BoolExpr::Variable(attr_var) => {
            hasher.write_u8(3);
            hash_attr_var(attr_var, hasher);
        }
    }
}

fn hash_attr_var(attr_var: &AttrVar, hasher: &mut impl Hasher) {
    match attr_var.var {
        Some(var) => {
            hasher.write_u8(1);
            hasher.write_usize(var.0);
        }
        None => {
            hasher.write_u8(0);
            attr_var.attr.hash(hasher);
        }
    }
}

fn hash_string_operand(operand: &StringOperand, hasher: &mut impl Hasher) {
    match operand.interned {
        Some(value) => {
            hasher.write_u8(1);
            hasher.write_usize(value.var.0);
            hasher.write_usize(value.str_id.0);
        }
        None => {
            hasher.write_u8(0);
            operand.literal.hash(hasher);
        }
    }
}

fn hash_comparison_value(value: &ComparisonValue, hasher: &mut impl Hasher) {
    match value {
        ComparisonValue::Integer(integer) => {
            hasher.write_u8(0);
            hasher.write_i64(*integer);
        }
        ComparisonValue::Float(_) => hasher.write_u8(1),
    }
}

fn hash_equality_value(value: &EqualityValue, hasher: &mut impl Hasher) {
    match value {
        EqualityValue::Integer(integer) => {
            hasher.write_u8(0);
            hasher.write_i64(*integer);
        }
        EqualityValue::Float(_) => hasher.write_u8(1),
        EqualityValue::String(operand) => {
            hasher.write_u8(2);
            hash_string_operand(operand, hasher);
        }
    }
}

fn hash_set_left(left: &SetLeft, hasher: &mut impl Hasher) {
    match left {
        SetLeft::Integer(integer) => {
            hasher.write_u8(0);
            hasher.write_i64(*integer);
        }
        SetLeft::String(operand) => {
            hasher.write_u8(1);
            hash_string_operand(operand, hasher);
        }
        SetLeft::Variable(attr_var) => {
            hasher.write_u8(2);
            hash_attr_var(attr_var, hasher);
        }
    }
}

fn hash_set_right(right: &SetRight, hasher: &mut impl Hasher) {
    match right {
        SetRight::IntegerList(values) => {
            hasher.write_u8(0);
            values.hash(hasher);
        }
        SetRight::StringList(values) => {
            hasher.write_u8(1);
            hasher.write_usize(values.len());
            for value in values {
                hash_string_operand(value, hasher);
            }
        }
        SetRight::Variable(attr_var) => {
            hasher.write_u8(2);
            hash_attr_var(attr_var, hasher);
        }
    }
}

fn hash_list_literal(value: &ListLiteral, hasher: &mut impl Hasher) {
    match value {
        ListLiteral::IntegerList(values) => {
            hasher.write_u8(0);
            values.hash(hasher);
        }
        ListLiteral::StringList(values) => {
            hasher.write_u8(1);
            hasher.write_usize(values.len());
            for value in values {
                hash_string_operand(value, hasher);
            }
        }
    }
}

fn hash_special_expr(special: &SpecialExpr, hasher: &mut impl Hasher) {
    match special {
        SpecialExpr::Frequency(frequency) => {
            hasher.write_u8(0);
            frequency.cap_type.hash(hasher);
            hash_attr_var(&frequency.attr_var, hasher);
            hash_string_operand(&frequency.namespace, hasher);
            hasher.write_i64(frequency.value);
            hasher.write_i64(frequency.length);
        }
        SpecialExpr::Segment(segment) => {
            hasher.write_u8(1);
            segment.op.hash(hasher);
            hash_attr_var(&segment.attr_var, hasher);
            hasher.write_i64(segment.segment_id);
            hasher.write_i64(segment.seconds);
        }
        // Geo payloads are all floats; the tag alone buckets them.
        SpecialExpr::Geo(_) => hasher.write_u8(2),
        SpecialExpr::String(string) => {
            hasher.write_u8(3);
            string.op.hash(hasher);
            hash_attr_var(&string.attr_var, hasher);
            string.pattern.hash(hasher);
        }
    }
}
