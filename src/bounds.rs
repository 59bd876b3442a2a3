use crate::{
    ast::{BoolExpr, Expr, Node},
    config::{AttrDomain, DomainBound},
    predicates::{
        AttrVar, ComparisonOperator, ComparisonValue, EqualityOperator, EqualityValue,
    },
    strings::StringId,
};

/// The interval over a single attribute that an expression can constrain it
/// to.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ValueBound {
    Boolean { min: bool, max: bool },
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    String { min: StringId, max: StringId },
}

/// Computes the tightest value interval over `domain`'s attribute that
/// `node` can constrain it to. An expression that never mentions the
/// attribute yields the full domain bound.
///
/// Conjunctions intersect their children's constraints and disjunctions
/// take the convex hull; under an odd number of negations the two swap, and
/// each comparison leaf contributes the interval of its negation. Set, list
/// and special predicates contribute nothing.
///
/// The domain must be boolean, integer, float or a bounded string; asking
/// for a bound on any other domain is a caller bug.
pub fn get_variable_bound(domain: &AttrDomain, node: &Node) -> ValueBound {
    let full = full_domain_bound(domain);
    bound_inner(domain, node, false, full).unwrap_or(full)
}

fn full_domain_bound(domain: &AttrDomain) -> ValueBound {
    match domain.bound() {
        DomainBound::Boolean { min, max } => ValueBound::Boolean { min, max },
        DomainBound::Integer { min, max } => ValueBound::Integer { min, max },
        DomainBound::Float { min, max } => ValueBound::Float { min, max },
        DomainBound::String {
            max_cardinality: Some(max),
        } => ValueBound::String {
            min: StringId(0),
            max: StringId(max),
        },
        DomainBound::String {
            max_cardinality: None,
        }
        | DomainBound::None => panic!(
            "attribute {:?} has no domain usable for bound analysis",
            domain.name()
        ),
    }
}

fn bound_inner(
    domain: &AttrDomain,
    node: &Node,
    is_reversed: bool,
    full: ValueBound,
) -> Option<ValueBound> {
    match &node.expr {
        Expr::List { .. } | Expr::Set { .. } | Expr::Special(_) => None,
        Expr::Bool(bool_expr) => match bool_expr {
            BoolExpr::Variable(attr_var) => {
                if !references(domain, attr_var) {
                    return None;
                }
                match full {
                    ValueBound::Boolean { .. } => {}
                    _ => type_mismatch(domain),
                }
                let value = !is_reversed;
                Some(ValueBound::Boolean {
                    min: value,
                    max: value,
                })
            }
            BoolExpr::Not(child) => bound_inner(domain, child, !is_reversed, full),
            BoolExpr::And(lhs, rhs) | BoolExpr::Or(lhs, rhs) => {
                let and_like = matches!(bool_expr, BoolExpr::And(_, _)) != is_reversed;
                let lhs = bound_inner(domain, lhs, is_reversed, full);
                let rhs = bound_inner(domain, rhs, is_reversed, full);
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => Some(if and_like {
                        intersect(lhs, rhs)
                    } else {
                        hull(lhs, rhs)
                    }),
                    (Some(bound), None) | (None, Some(bound)) => Some(bound),
                    (None, None) => None,
                }
            }
        },
        Expr::Equality {
            op,
            attr_var,
            value,
        } => {
            if !references(domain, attr_var) {
                return None;
            }
            Some(equality_bound(domain, *op, value, is_reversed, full))
        }
        Expr::NumericCompare {
            op,
            attr_var,
            value,
        } => {
            if !references(domain, attr_var) {
                return None;
            }
            Some(comparison_bound(domain, *op, value, is_reversed, full))
        }
    }
}

fn references(domain: &AttrDomain, attr_var: &AttrVar) -> bool {
    match attr_var.var {
        Some(var) => var == domain.variable(),
        None => attr_var.attr == domain.name(),
    }
}

fn equality_bound(
    domain: &AttrDomain,
    op: EqualityOperator,
    value: &EqualityValue,
    is_reversed: bool,
    full: ValueBound,
) -> ValueBound {
    // `x != k` constrains nothing; reversed it pins the value, and
    // symmetrically for `x == k`.
    let pins = (op == EqualityOperator::Equal) != is_reversed;
    match (value, full) {
        (EqualityValue::Integer(literal), ValueBound::Integer { .. }) => {
            if pins {
                ValueBound::Integer {
                    min: *literal,
                    max: *literal,
                }
            } else {
                full
            }
        }
        (EqualityValue::Float(literal), ValueBound::Float { .. }) => {
            if pins {
                ValueBound::Float {
                    min: *literal,
                    max: *literal,
                }
            } else {
                full
            }
        }
        (EqualityValue::String(operand), ValueBound::String { .. }) => {
            if pins {
                let str_id = operand.id().str_id;
                ValueBound::String {
                    min: str_id,
                    max: str_id,
                }
            } else {
                full
            }
        }
        _ => type_mismatch(domain),
    }
}

fn comparison_bound(
    domain: &AttrDomain,
    op: ComparisonOperator,
    value: &ComparisonValue,
    is_reversed: bool,
    full: ValueBound,
) -> ValueBound {
    let op = if is_reversed { reverse(op) } else { op };
    match (value, full) {
        (ComparisonValue::Integer(literal), ValueBound::Integer { min, max }) => {
            let literal = *literal;
            match op {
                ComparisonOperator::LessThan => ValueBound::Integer {
                    min,
                    max: literal.saturating_sub(1),
                },
                ComparisonOperator::LessThanEqual => ValueBound::Integer { min, max: literal },
                ComparisonOperator::GreaterThan => ValueBound::Integer {
                    min: literal.saturating_add(1),
                    max,
                },
                ComparisonOperator::GreaterThanEqual => ValueBound::Integer { min: literal, max },
            }
        }
        (ComparisonValue::Float(literal), ValueBound::Float { min, max }) => {
            let literal = *literal;
            match op {
                ComparisonOperator::LessThan => ValueBound::Float {
                    min,
                    max: literal - f64::EPSILON,
                },
                ComparisonOperator::LessThanEqual => ValueBound::Float { min, max: literal },
                ComparisonOperator::GreaterThan => ValueBound::Float {
                    min: literal + f64::EPSILON,
                    max,
                },
                ComparisonOperator::GreaterThanEqual => ValueBound::Float { min: literal, max },
            }
        }
        _ => type_mismatch(domain),
    }
}

fn reverse(op: ComparisonOperator) -> ComparisonOperator {
    match op {
        ComparisonOperator::LessThan => ComparisonOperator::GreaterThanEqual,
        ComparisonOperator::LessThanEqual => ComparisonOperator::GreaterThan,
        ComparisonOperator::GreaterThan => ComparisonOperator::LessThanEqual,
        ComparisonOperator::GreaterThanEqual => ComparisonOperator::LessThan,
    }
}

fn intersect(a: ValueBound, b: ValueBound) -> ValueBound {
    match (a, b) {
        (
            ValueBound::Boolean {
                min: min_a,
                max: max_a,
            },
            ValueBound::Boolean {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Boolean {
            min: min_a || min_b,
            max: max_a && max_b,
        },
        (
            ValueBound::Integer {
                min: min_a,
                max: max_a,
            },
            ValueBound::Integer {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Integer {
            min: min_a.max(min_b),
            max: max_a.min(max_b),
        },
        (
            ValueBound::Float {
                min: min_a,
                max: max_a,
            },
            ValueBound::Float {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Float {
            min: min_a.max(min_b),
            max: max_a.min(max_b),
        },
        (
            ValueBound::String {
                min: min_a,
                max: max_a,
            },
            ValueBound::String {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::String {
            min: min_a.max(min_b),
            max: max_a.min(max_b),
        },
        _ => unreachable!("bounds over one domain share a kind"),
    }
}

fn hull(a: ValueBound, b: ValueBound) -> ValueBound {
    match (a, b) {
        (
            ValueBound::Boolean {
                min: min_a,
                max: max_a,
            },
            ValueBound::Boolean {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Boolean {
            min: min_a && min_b,
            max: max_a || max_b,
        },
        (
            ValueBound::Integer {
                min: min_a,
                max: max_a,
            },
            ValueBound::Integer {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Integer {
            min: min_a.min(min_b),
            max: max_a.max(max_b),
        },
        (
            ValueBound::Float {
                min: min_a,
                max: max_a,
            },
            ValueBound::Float {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::Float {
            min: min_a.min(min_b),
            max: max_a.max(max_b),
        },
        (
            ValueBound::String {
                min: min_a,
                max: max_a,
            },
            ValueBound::String {
                min: min_b,
                max: max_b,
            },
        ) => ValueBound::String {
            min: min_a.min(min_b),
            max: max_a.max(max_b),
        },
        _ => unreachable!("bounds over one domain share a kind"),
    }
}

fn type_mismatch(domain: &AttrDomain) -> ! {
    panic!(
        "domain and expression type mismatch for attribute {:?}",
        domain.name()
    )
}
