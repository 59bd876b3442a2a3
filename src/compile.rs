use crate::{
    ast::{BoolExpr, Expr, Node},
    config::{Config, DomainBound, VariableId},
    predicates::{
        AttrVar, EqualityValue, ListLiteral, SetLeft, SetRight, SpecialExpr, StringOperand,
    },
    values::StringValue,
};

/// Runs the three compiler passes in order. After this the tree is ready to
/// be matched.
pub fn compile(config: &mut Config, node: &mut Node) {
    assign_variable_id(config, node);
    assign_str_id(config, node);
    assign_pred_id(config, node);
}

/// First pass: replaces every textual attribute reference with its interned
/// variable id.
pub fn assign_variable_id(config: &mut Config, node: &mut Node) {
    match &mut node.expr {
        Expr::NumericCompare { attr_var, .. }
        | Expr::Equality { attr_var, .. }
        | Expr::List { attr_var, .. } => stamp_variable(config, attr_var),
        Expr::Bool(bool_expr) => match bool_expr {
            BoolExpr::And(lhs, rhs) | BoolExpr::Or(lhs, rhs) => {
                assign_variable_id(config, lhs);
                assign_variable_id(config, rhs);
            }
            BoolExpr::Not(child) => assign_variable_id(config, child),
            BoolExpr::Variable(attr_var) => stamp_variable(config, attr_var),
        },
        Expr::Set { left, right, .. } => {
            if let SetLeft::Variable(attr_var) = left {
                stamp_variable(config, attr_var);
            }
            if let SetRight::Variable(attr_var) = right {
                stamp_variable(config, attr_var);
            }
        }
        Expr::Special(special) => match special {
            SpecialExpr::Frequency(frequency) => stamp_variable(config, &mut frequency.attr_var),
            SpecialExpr::Segment(segment) => stamp_variable(config, &mut segment.attr_var),
            SpecialExpr::Geo(_) => {}
            SpecialExpr::String(string) => stamp_variable(config, &mut string.attr_var),
        },
    }
}

fn stamp_variable(config: &mut Config, attr_var: &mut AttrVar) {
    attr_var.var = Some(config.get_id_for_attr(&attr_var.attr));
}

/// Second pass: interns every string literal under its owning attribute and
/// stamps the (variable, string id) pair. For set expressions the owning
/// attribute is whichever side is the variable; frequency cap namespaces
/// intern under the expression's frequency caps attribute.
pub fn assign_str_id(config: &mut Config, node: &mut Node) {
    match &mut node.expr {
        Expr::NumericCompare { .. } => {}
        Expr::Equality { attr_var, value, .. } => {
            if let EqualityValue::String(operand) = value {
                let owner = attr_var.id();
                stamp_string(config, owner, operand);
            }
        }
        Expr::Bool(bool_expr) => match bool_expr {
            BoolExpr::And(lhs, rhs) | BoolExpr::Or(lhs, rhs) => {
                assign_str_id(config, lhs);
                assign_str_id(config, rhs);
            }
            BoolExpr::Not(child) => assign_str_id(config, child),
            BoolExpr::Variable(_) => {}
        },
        Expr::Set { left, right, .. } => {
            if let (SetLeft::String(operand), SetRight::Variable(attr_var)) = (&mut *left, &*right)
            {
                let owner = attr_var.id();
                stamp_string(config, owner, operand);
            }
            if let (SetLeft::Variable(attr_var), SetRight::StringList(operands)) =
                (&*left, &mut *right)
            {
                let owner = attr_var.id();
                for operand in operands {
                    stamp_string(config, owner, operand);
                }
            }
        }
        Expr::List { attr_var, value, .. } => {
            if let ListLiteral::StringList(operands) = value {
                let owner = attr_var.id();
                for operand in operands {
                    stamp_string(config, owner, operand);
                }
            }
        }
        Expr::Special(special) => {
            if let SpecialExpr::Frequency(frequency) = special {
                let owner = frequency.attr_var.id();
                stamp_string(config, owner, &mut frequency.namespace);
            }
        }
    }
}

fn stamp_string(config: &mut Config, owner: VariableId, operand: &mut StringOperand) {
    let str_id = config.get_id_for_string(owner, &operand.literal);
    operand.interned = Some(StringValue { var: owner, str_id });
}

/// Third pass: deduplicates every node through the config's predicate map,
/// assigning dense predicate ids.
pub fn assign_pred_id(config: &mut Config, node: &mut Node) {
    config.pred_map.assign(node);
}

/// Validates that every attribute the expression references has been
/// registered. Expressions failing this are discarded before compilation.
pub fn all_variables_in_config(config: &Config, node: &Node) -> bool {
    match &node.expr {
        Expr::NumericCompare { attr_var, .. }
        | Expr::Equality { attr_var, .. }
        | Expr::List { attr_var, .. } => config.var_exists(&attr_var.attr),
        Expr::Bool(bool_expr) => match bool_expr {
            BoolExpr::And(lhs, rhs) | BoolExpr::Or(lhs, rhs) => {
                all_variables_in_config(config, lhs) && all_variables_in_config(config, rhs)
            }
            BoolExpr::Not(child) => all_variables_in_config(config, child),
            BoolExpr::Variable(attr_var) => config.var_exists(&attr_var.attr),
        },
        Expr::Set { left, right, .. } => {
            if let SetLeft::Variable(attr_var) = left {
                return config.var_exists(&attr_var.attr);
            }
            if let SetRight::Variable(attr_var) = right {
                return config.var_exists(&attr_var.attr);
            }
            unreachable!("a set expression always has a variable side")
        }
        Expr::Special(special) => match special {
            SpecialExpr::Frequency(frequency) => config.var_exists(&frequency.attr_var.attr),
            SpecialExpr::Segment(segment) => config.var_exists(&segment.attr_var.attr),
            SpecialExpr::Geo(_) => true,
            SpecialExpr::String(string) => config.var_exists(&string.attr_var.attr),
        },
    }
}

/// Validates every equality-to-string literal against its attribute's
/// bounded string domain: the literal must already be interned or the
/// interner must have capacity remaining.
pub fn all_bounded_strings_valid(config: &Config, node: &Node) -> bool {
    match &node.expr {
        Expr::Equality { attr_var, value, .. } => match value {
            EqualityValue::String(operand) => str_valid(config, &attr_var.attr, &operand.literal),
            _ => true,
        },
        Expr::Bool(bool_expr) => match bool_expr {
            BoolExpr::And(lhs, rhs) | BoolExpr::Or(lhs, rhs) => {
                all_bounded_strings_valid(config, lhs) && all_bounded_strings_valid(config, rhs)
            }
            BoolExpr::Not(child) => all_bounded_strings_valid(config, child),
            BoolExpr::Variable(_) => true,
        },
        _ => true,
    }
}

fn str_valid(config: &Config, attr: &str, literal: &str) -> bool {
    let Some(domain) = config.attr_domain(attr) else {
        return false;
    };
    let max_cardinality = match domain.bound() {
        DomainBound::String { max_cardinality } => match max_cardinality {
            Some(max) => max,
            None => return true,
        },
        _ => return false,
    };
    let var = domain.variable();
    if config.string_interned(var, literal) {
        return true;
    }
    config.string_count(var) + 1 < max_cardinality
}
