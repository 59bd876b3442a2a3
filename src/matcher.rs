use crate::{
    ast::{BoolExpr, Expr, Node},
    config::{Config, VariableId},
    events::Event,
    memoize::{MatchReport, Memoize},
    predicates::{
        ComparisonOperator, ComparisonValue, EqualityOperator, EqualityValue, FrequencyExpr,
        GeoExpr, ListLiteral, ListOperator, SegmentExpr, SegmentOperator, SetLeft, SetOperator,
        SetRight, SpecialExpr, StringMatchExpr, StringMatchOperator, StringOperand,
    },
    special,
    values::{feq, fne, EventString, Value},
};

/// Outcome of evaluating a subtree. A predicate over an absent
/// allowed-undefined attribute is Undefined: negation leaves it intact and
/// it collapses to false at the top level, so an undefined attribute never
/// satisfies an expression, not even through `not`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Eval {
    True,
    False,
    Undefined,
}

impl Eval {
    fn from_bool(value: bool) -> Self {
        if value {
            Eval::True
        } else {
            Eval::False
        }
    }

    fn negate(self) -> Self {
        match self {
            Eval::True => Eval::False,
            Eval::False => Eval::True,
            Eval::Undefined => Eval::Undefined,
        }
    }

    /// Only decided results enter the memoize bitsets.
    fn as_decided(self) -> Option<bool> {
        match self {
            Eval::True => Some(true),
            Eval::False => Some(false),
            Eval::Undefined => None,
        }
    }
}

/// Evaluates a compiled expression tree against an event.
///
/// `memoize` caches per-predicate results across calls for the same event;
/// pass a fresh [`Memoize`] per event and share it across the trees of one
/// search. `report` accumulates memoization counters.
///
/// Contract violations (a type mismatch between an attribute's domain and
/// the observed value, a missing attribute that is not allowed-undefined,
/// comparing strings of different variables) panic.
pub fn match_node(
    config: &Config,
    event: &Event,
    node: &Node,
    memoize: Option<&mut Memoize>,
    report: Option<&mut MatchReport>,
) -> bool {
    let mut evaluator = Evaluator {
        config,
        event,
        memoize,
        report,
    };
    evaluator.eval(node, true) == Eval::True
}

struct Evaluator<'a> {
    config: &'a Config,
    event: &'a Event,
    memoize: Option<&'a mut Memoize>,
    report: Option<&'a mut MatchReport>,
}

impl Evaluator<'_> {
    fn eval(&mut self, node: &Node, is_top_level: bool) -> Eval {
        if let (Some(id), Some(memoize)) = (node.id, self.memoize.as_deref()) {
            if let Some(result) = memoize.check(id) {
                if let Some(report) = self.report.as_deref_mut() {
                    report.record_memoized(is_top_level);
                }
                return Eval::from_bool(result);
            }
        }
        let result = match &node.expr {
            Expr::NumericCompare {
                op,
                attr_var,
                value,
            } => self.eval_numeric_compare(*op, attr_var.id(), value),
            Expr::Equality {
                op,
                attr_var,
                value,
            } => self.eval_equality(*op, attr_var.id(), value),
            Expr::Bool(bool_expr) => self.eval_bool(bool_expr),
            Expr::Set { op, left, right } => self.eval_set(*op, left, right),
            Expr::List {
                op,
                attr_var,
                value,
            } => self.eval_list(*op, attr_var.id(), value),
            Expr::Special(special) => self.eval_special(special),
        };
        if let (Some(id), Some(decided)) = (node.id, result.as_decided()) {
            if let Some(memoize) = self.memoize.as_deref_mut() {
                memoize.record(id, decided);
            }
        }
        result
    }

    fn eval_bool(&mut self, bool_expr: &BoolExpr) -> Eval {
        match bool_expr {
            BoolExpr::And(lhs, rhs) => {
                let lhs = self.eval(lhs, false);
                if lhs == Eval::False {
                    return Eval::False;
                }
                match self.eval(rhs, false) {
                    Eval::False => Eval::False,
                    Eval::Undefined => Eval::Undefined,
                    Eval::True => lhs,
                }
            }
            BoolExpr::Or(lhs, rhs) => {
                let lhs = self.eval(lhs, false);
                if lhs == Eval::True {
                    return Eval::True;
                }
                match self.eval(rhs, false) {
                    Eval::True => Eval::True,
                    Eval::Undefined => Eval::Undefined,
                    Eval::False => lhs,
                }
            }
            BoolExpr::Not(child) => self.eval(child, false).negate(),
            BoolExpr::Variable(attr_var) => {
                let var = attr_var.id();
                match self.resolve(var) {
                    None => Eval::Undefined,
                    Some(Value::Boolean(value)) => Eval::from_bool(*value),
                    Some(other) => self.type_mismatch(var, "a boolean", other),
                }
            }
        }
    }

    fn eval_numeric_compare(
        &self,
        op: ComparisonOperator,
        var: VariableId,
        value: &ComparisonValue,
    ) -> Eval {
        let Some(observed) = self.resolve(var) else {
            return Eval::Undefined;
        };
        let result = match (value, observed) {
            (ComparisonValue::Integer(literal), Value::Integer(observed)) => match op {
                ComparisonOperator::LessThan => observed < literal,
                ComparisonOperator::LessThanEqual => observed <= literal,
                ComparisonOperator::GreaterThan => observed > literal,
                ComparisonOperator::GreaterThanEqual => observed >= literal,
            },
            // Raw IEEE ordering, no epsilon.
            (ComparisonValue::Float(literal), Value::Float(observed)) => match op {
                ComparisonOperator::LessThan => observed < literal,
                ComparisonOperator::LessThanEqual => observed <= literal,
                ComparisonOperator::GreaterThan => observed > literal,
                ComparisonOperator::GreaterThanEqual => observed >= literal,
            },
            (_, observed) => self.type_mismatch(var, "a numeric compare operand", observed),
        };
        Eval::from_bool(result)
    }

    fn eval_equality(&self, op: EqualityOperator, var: VariableId, value: &EqualityValue) -> Eval {
        let Some(observed) = self.resolve(var) else {
            return Eval::Undefined;
        };
        let result = match (value, observed) {
            (EqualityValue::Integer(literal), Value::Integer(observed)) => match op {
                EqualityOperator::Equal => observed == literal,
                EqualityOperator::NotEqual => observed != literal,
            },
            (EqualityValue::Float(literal), Value::Float(observed)) => match op {
                EqualityOperator::Equal => feq(*observed, *literal),
                EqualityOperator::NotEqual => fne(*observed, *literal),
            },
            (EqualityValue::String(literal), Value::String(observed)) => {
                let literal = literal.id();
                assert!(
                    literal.var == observed.interned.var,
                    "string of attribute {:?} does not belong to the compared variable",
                    self.config.domain(var).name()
                );
                match op {
                    EqualityOperator::Equal => observed.interned.str_id == literal.str_id,
                    EqualityOperator::NotEqual => observed.interned.str_id != literal.str_id,
                }
            }
            (_, observed) => self.type_mismatch(var, "an equality operand", observed),
        };
        Eval::from_bool(result)
    }

    fn eval_set(&self, op: SetOperator, left: &SetLeft, right: &SetRight) -> Eval {
        let is_in = match (left, right) {
            (SetLeft::Integer(literal), SetRight::Variable(attr_var)) => {
                let var = attr_var.id();
                match self.resolve(var) {
                    None => return Eval::Undefined,
                    Some(Value::IntegerList(observed)) => observed.contains(literal),
                    Some(other) => self.type_mismatch(var, "an integer list", other),
                }
            }
            (SetLeft::String(literal), SetRight::Variable(attr_var)) => {
                let var = attr_var.id();
                match self.resolve(var) {
                    None => return Eval::Undefined,
                    Some(Value::StringList(observed)) => {
                        let literal = literal.id();
                        observed.iter().any(|value| value.interned == literal)
                    }
                    Some(other) => self.type_mismatch(var, "a string list", other),
                }
            }
            (SetLeft::Variable(attr_var), SetRight::IntegerList(literals)) => {
                let var = attr_var.id();
                match self.resolve(var) {
                    None => return Eval::Undefined,
                    Some(Value::Integer(observed)) => literals.contains(observed),
                    Some(other) => self.type_mismatch(var, "an integer", other),
                }
            }
            (SetLeft::Variable(attr_var), SetRight::StringList(literals)) => {
                let var = attr_var.id();
                match self.resolve(var) {
                    None => return Eval::Undefined,
                    Some(Value::String(observed)) => literals
                        .iter()
                        .any(|literal| literal.id() == observed.interned),
                    Some(other) => self.type_mismatch(var, "a string", other),
                }
            }
            _ => unreachable!("a set expression always has exactly one variable side"),
        };
        match op {
            SetOperator::In => Eval::from_bool(is_in),
            SetOperator::NotIn => Eval::from_bool(!is_in),
        }
    }

    fn eval_list(&self, op: ListOperator, var: VariableId, value: &ListLiteral) -> Eval {
        let Some(observed) = self.resolve(var) else {
            return Eval::Undefined;
        };
        let result = match op {
            ListOperator::OneOf | ListOperator::NoneOf => {
                let shares_one = match (value, observed) {
                    (ListLiteral::IntegerList(literals), Value::IntegerList(observed)) => observed
                        .iter()
                        .any(|observed| literals.contains(observed)),
                    (ListLiteral::StringList(literals), Value::StringList(observed)) => observed
                        .iter()
                        .any(|observed| {
                            literals
                                .iter()
                                .any(|literal| self.eq_list_string(var, literal, observed))
                        }),
                    (_, observed) => self.type_mismatch(var, "a list", observed),
                };
                match op {
                    ListOperator::OneOf => shares_one,
                    _ => !shares_one,
                }
            }
            ListOperator::AllOf => match (value, observed) {
                (ListLiteral::IntegerList(literals), Value::IntegerList(observed)) => literals
                    .iter()
                    .all(|literal| observed.contains(literal)),
                (ListLiteral::StringList(literals), Value::StringList(observed)) => {
                    literals.iter().all(|literal| {
                        observed
                            .iter()
                            .any(|observed| self.eq_list_string(var, literal, observed))
                    })
                }
                (_, observed) => self.type_mismatch(var, "a list", observed),
            },
        };
        Eval::from_bool(result)
    }

    fn eq_list_string(&self, var: VariableId, literal: &StringOperand, observed: &EventString) -> bool {
        let literal = literal.id();
        assert!(
            literal.var == observed.interned.var,
            "string of attribute {:?} does not belong to the compared variable",
            self.config.domain(var).name()
        );
        literal.str_id == observed.interned.str_id
    }

    fn eval_special(&self, special: &SpecialExpr) -> Eval {
        match special {
            SpecialExpr::Frequency(frequency) => self.eval_frequency(frequency),
            SpecialExpr::Segment(segment) => self.eval_segment(segment),
            SpecialExpr::Geo(geo) => self.eval_geo(geo),
            SpecialExpr::String(string) => self.eval_string_match(string),
        }
    }

    fn eval_frequency(&self, frequency: &FrequencyExpr) -> Eval {
        let Some(now) = self.resolve_integer_attr("now") else {
            return Eval::Undefined;
        };
        let var = frequency.attr_var.id();
        let caps = match self.resolve(var) {
            None => return Eval::Undefined,
            Some(Value::FrequencyCaps(caps)) => caps,
            Some(other) => self.type_mismatch(var, "a frequency caps list", other),
        };
        Eval::from_bool(special::within_frequency_caps(
            caps,
            frequency.cap_type,
            frequency.cap_type.object_id(),
            frequency.namespace.id(),
            frequency.value,
            frequency.length,
            now,
        ))
    }

    fn eval_segment(&self, segment: &SegmentExpr) -> Eval {
        let Some(now) = self.resolve_integer_attr("now") else {
            return Eval::Undefined;
        };
        let var = segment.attr_var.id();
        let segments = match self.resolve(var) {
            None => return Eval::Undefined,
            Some(Value::Segments(segments)) => segments,
            Some(other) => self.type_mismatch(var, "a segments list", other),
        };
        let result = match segment.op {
            SegmentOperator::Within => {
                special::segment_within(segment.segment_id, segment.seconds, segments, now)
            }
            SegmentOperator::Before => {
                special::segment_before(segment.segment_id, segment.seconds, segments, now)
            }
        };
        Eval::from_bool(result)
    }

    fn eval_geo(&self, geo: &GeoExpr) -> Eval {
        let Some(latitude) = self.resolve_float_attr("latitude") else {
            return Eval::Undefined;
        };
        let Some(longitude) = self.resolve_float_attr("longitude") else {
            return Eval::Undefined;
        };
        Eval::from_bool(special::geo_within_radius(
            geo.latitude,
            geo.longitude,
            latitude,
            longitude,
            geo.radius,
        ))
    }

    fn eval_string_match(&self, string: &StringMatchExpr) -> Eval {
        let var = string.attr_var.id();
        let observed = match self.resolve(var) {
            None => return Eval::Undefined,
            Some(Value::String(observed)) => observed,
            Some(other) => self.type_mismatch(var, "a string", other),
        };
        let result = match string.op {
            StringMatchOperator::Contains => special::contains(&observed.raw, &string.pattern),
            StringMatchOperator::StartsWith => special::starts_with(&observed.raw, &string.pattern),
            StringMatchOperator::EndsWith => special::ends_with(&observed.raw, &string.pattern),
        };
        Eval::from_bool(result)
    }

    /// `None` means the attribute is absent but allowed-undefined. A
    /// missing attribute that is not allowed-undefined is a caller bug.
    fn resolve(&self, var: VariableId) -> Option<&Value> {
        match self.event.get(var) {
            Some(value) => Some(value),
            None => {
                if self.config.is_variable_allow_undefined(var) {
                    None
                } else {
                    panic!(
                        "attribute {:?} is missing from the event",
                        self.config.domain(var).name()
                    );
                }
            }
        }
    }

    fn resolve_integer_attr(&self, name: &str) -> Option<i64> {
        let var = self.auxiliary_attr(name);
        match self.resolve(var) {
            None => None,
            Some(Value::Integer(value)) => Some(*value),
            Some(other) => self.type_mismatch(var, "an integer", other),
        }
    }

    fn resolve_float_attr(&self, name: &str) -> Option<f64> {
        let var = self.auxiliary_attr(name);
        match self.resolve(var) {
            None => None,
            Some(Value::Float(value)) => Some(*value),
            Some(other) => self.type_mismatch(var, "a float", other),
        }
    }

    fn auxiliary_attr(&self, name: &str) -> VariableId {
        self.config
            .existing_id(name)
            .unwrap_or_else(|| panic!("attribute {name:?} is not registered"))
    }

    fn type_mismatch(&self, var: VariableId, expected: &str, observed: &Value) -> ! {
        panic!(
            "attribute {:?} is not {expected}: observed {:?}",
            self.config.domain(var).name(),
            observed.kind()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        compile::compile,
        config::AttributeDefinition,
        values::{FrequencyCap, FrequencyType, Segment},
    };

    #[test]
    fn matches_a_conjunction_of_a_comparison_and_a_set_membership() {
        let mut config = define_config();
        let mut node = Node::and(
            Node::numeric_compare(
                ComparisonOperator::GreaterThanEqual,
                "age",
                ComparisonValue::Integer(18),
            ),
            Node::set(
                SetOperator::In,
                SetLeft::variable("country"),
                SetRight::strings(vec!["US", "CA"]),
            )
            .unwrap(),
        );
        compile(&mut config, &mut node);

        let adult_us = event(&config, 21, "US");
        let minor_us = event(&config, 17, "US");
        let adult_mx = event(&config, 21, "MX");

        assert!(match_node(&config, &adult_us, &node, None, None));
        assert!(!match_node(&config, &minor_us, &node, None, None));
        assert!(!match_node(&config, &adult_mx, &node, None, None));
    }

    #[test]
    fn or_short_circuits_without_touching_the_right_side() {
        let mut config = define_config();
        // The right side would panic if evaluated: `age` is not in the
        // event and is not allowed-undefined.
        let mut node = Node::or(
            Node::variable("private"),
            Node::numeric_compare(
                ComparisonOperator::GreaterThan,
                "age",
                ComparisonValue::Integer(0),
            ),
        );
        compile(&mut config, &mut node);

        let mut builder = config.make_event();
        builder.with_boolean("private", true).unwrap();
        let event = builder.build().unwrap();

        assert!(match_node(&config, &event, &node, None, None));
    }

    #[test]
    fn and_short_circuits_without_touching_the_right_side() {
        let mut config = define_config();
        let mut node = Node::and(
            Node::variable("private"),
            Node::numeric_compare(
                ComparisonOperator::GreaterThan,
                "age",
                ComparisonValue::Integer(0),
            ),
        );
        compile(&mut config, &mut node);

        let mut builder = config.make_event();
        builder.with_boolean("private", false).unwrap();
        let event = builder.build().unwrap();

        assert!(!match_node(&config, &event, &node, None, None));
    }

    #[test]
    fn all_of_requires_every_literal_element() {
        let mut config = define_config();
        let mut node = Node::list(
            ListOperator::AllOf,
            "tags",
            ListLiteral::integers(vec![1, 2, 3]),
        );
        compile(&mut config, &mut node);

        let covering = event_with_tags(&config, &[3, 1, 2, 4]);
        let partial = event_with_tags(&config, &[1, 2]);

        assert!(match_node(&config, &covering, &node, None, None));
        assert!(!match_node(&config, &partial, &node, None, None));
    }

    #[test]
    fn one_of_and_none_of_check_the_intersection() {
        let mut config = define_config();
        let mut one_of = Node::list(
            ListOperator::OneOf,
            "tags",
            ListLiteral::integers(vec![1, 2]),
        );
        let mut none_of = Node::list(
            ListOperator::NoneOf,
            "tags",
            ListLiteral::integers(vec![1, 2]),
        );
        compile(&mut config, &mut one_of);
        compile(&mut config, &mut none_of);

        let overlapping = event_with_tags(&config, &[2, 9]);
        let disjoint = event_with_tags(&config, &[8, 9]);

        assert!(match_node(&config, &overlapping, &one_of, None, None));
        assert!(!match_node(&config, &disjoint, &one_of, None, None));
        assert!(!match_node(&config, &overlapping, &none_of, None, None));
        assert!(match_node(&config, &disjoint, &none_of, None, None));
    }

    #[test]
    fn geo_within_radius_reads_latitude_and_longitude() {
        let mut config = define_config();
        let mut node = Node::geo_within_radius(45.5017, -73.5673, 10.0);
        compile(&mut config, &mut node);

        let mut builder = config.make_event();
        builder.with_float("latitude", 45.5088).unwrap();
        builder.with_float("longitude", -73.5878).unwrap();
        let montreal = builder.build().unwrap();

        let mut builder = config.make_event();
        builder.with_float("latitude", 40.7128).unwrap();
        builder.with_float("longitude", -74.0060).unwrap();
        let new_york = builder.build().unwrap();

        assert!(match_node(&config, &montreal, &node, None, None));
        assert!(!match_node(&config, &new_york, &node, None, None));
    }

    #[test]
    fn frequency_caps_compare_the_requested_value() {
        let mut config = define_config();
        let mut capped = Node::within_frequency_cap(FrequencyType::Campaign, "home", 3, 0);
        let mut under = Node::within_frequency_cap(FrequencyType::Campaign, "home", 4, 0);
        compile(&mut config, &mut capped);
        compile(&mut config, &mut under);

        let event = event_with_caps(&config);

        assert!(!match_node(&config, &event, &capped, None, None));
        assert!(match_node(&config, &event, &under, None, None));
    }

    #[test]
    fn segment_predicates_read_the_default_segments_attribute() {
        let mut config = define_config();
        let mut within = Node::segment_within(None, 1, 120);
        let mut before = Node::segment_before(None, 1, 30);
        compile(&mut config, &mut within);
        compile(&mut config, &mut before);

        let mut builder = config.make_event();
        builder.with_integer("now", 1_600_000_060).unwrap();
        builder
            .with_segments(
                "segments_with_timestamp",
                &[Segment::new(1, 1_600_000_000_000_000)],
            )
            .unwrap();
        let event = builder.build().unwrap();

        assert!(match_node(&config, &event, &within, None, None));
        assert!(match_node(&config, &event, &before, None, None));
    }

    #[test]
    fn string_matching_operates_on_the_raw_event_string() {
        let mut config = define_config();
        let mut contains = Node::contains("country", "S");
        let mut starts = Node::starts_with("country", "U");
        let mut ends = Node::ends_with("country", "A");
        compile(&mut config, &mut contains);
        compile(&mut config, &mut starts);
        compile(&mut config, &mut ends);

        let event = event(&config, 21, "US");

        assert!(match_node(&config, &event, &contains, None, None));
        assert!(match_node(&config, &event, &starts, None, None));
        assert!(!match_node(&config, &event, &ends, None, None));
    }

    #[test]
    fn negation_does_not_flip_an_undefined_predicate() {
        let mut config = define_config();
        let mut node = Node::negate(Node::equality(
            EqualityOperator::Equal,
            "optional_score",
            EqualityValue::Integer(5),
        ));
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");

        assert!(!match_node(&config, &event, &node, None, None));
    }

    #[test]
    fn not_equal_on_an_undefined_attribute_is_false() {
        let mut config = define_config();
        let mut node = Node::equality(
            EqualityOperator::NotEqual,
            "optional_score",
            EqualityValue::Integer(5),
        );
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");

        assert!(!match_node(&config, &event, &node, None, None));
    }

    #[test]
    fn an_undefined_branch_does_not_block_a_true_disjunction() {
        let mut config = define_config();
        let mut node = Node::or(
            Node::equality(
                EqualityOperator::Equal,
                "optional_score",
                EqualityValue::Integer(5),
            ),
            Node::numeric_compare(
                ComparisonOperator::GreaterThanEqual,
                "age",
                ComparisonValue::Integer(18),
            ),
        );
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");

        assert!(match_node(&config, &event, &node, None, None));
    }

    #[test]
    #[should_panic(expected = "missing from the event")]
    fn a_missing_attribute_that_is_not_allowed_undefined_panics() {
        let mut config = define_config();
        let mut node = Node::numeric_compare(
            ComparisonOperator::GreaterThan,
            "age",
            ComparisonValue::Integer(0),
        );
        compile(&mut config, &mut node);

        let mut builder = config.make_event();
        builder.with_boolean("private", true).unwrap();
        let event = builder.build().unwrap();

        match_node(&config, &event, &node, None, None);
    }

    #[test]
    fn memoized_results_are_reused_across_evaluations() {
        let mut config = define_config();
        let mut node = Node::and(
            Node::numeric_compare(
                ComparisonOperator::GreaterThanEqual,
                "age",
                ComparisonValue::Integer(18),
            ),
            Node::set(
                SetOperator::In,
                SetLeft::variable("country"),
                SetRight::strings(vec!["US", "CA"]),
            )
            .unwrap(),
        );
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");
        let mut memoize = Memoize::new(config.pred_count());
        let mut report = MatchReport::new();

        let first = match_node(&config, &event, &node, Some(&mut memoize), Some(&mut report));
        assert!(first);
        assert_eq!(0, report.sub_expressions_memoized);

        let second = match_node(&config, &event, &node, Some(&mut memoize), Some(&mut report));
        assert!(second);
        assert_eq!(1, report.expressions_memoized);
        assert_eq!(1, report.sub_expressions_memoized);
    }

    #[test]
    fn memoization_does_not_change_the_result() {
        let mut config = define_config();
        let mut node = Node::or(
            Node::numeric_compare(
                ComparisonOperator::LessThan,
                "age",
                ComparisonValue::Integer(18),
            ),
            Node::set(
                SetOperator::In,
                SetLeft::variable("country"),
                SetRight::strings(vec!["US", "CA"]),
            )
            .unwrap(),
        );
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");
        let bare = match_node(&config, &event, &node, None, None);

        let mut empty = Memoize::new(config.pred_count());
        let with_empty = match_node(&config, &event, &node, Some(&mut empty), None);

        let mut warmed = Memoize::new(config.pred_count());
        match_node(&config, &event, &node, Some(&mut warmed), None);
        let with_warmed = match_node(&config, &event, &node, Some(&mut warmed), None);

        assert_eq!(bare, with_empty);
        assert_eq!(bare, with_warmed);
    }

    #[test]
    fn undefined_results_are_not_memoized() {
        let mut config = define_config();
        let mut node = Node::negate(Node::equality(
            EqualityOperator::Equal,
            "optional_score",
            EqualityValue::Integer(5),
        ));
        compile(&mut config, &mut node);

        let event = event(&config, 21, "US");
        let mut memoize = Memoize::new(config.pred_count());

        assert!(!match_node(&config, &event, &node, Some(&mut memoize), None));
        assert!(!match_node(&config, &event, &node, Some(&mut memoize), None));
    }

    fn define_config() -> Config {
        let mut config = Config::new();
        for definition in [
            AttributeDefinition::integer_in("age", 0, 120),
            AttributeDefinition::bounded_string("country", 10),
            AttributeDefinition::boolean("private"),
            AttributeDefinition::integer_list("tags"),
            AttributeDefinition::integer("now"),
            AttributeDefinition::float("latitude"),
            AttributeDefinition::float("longitude"),
            AttributeDefinition::segments("segments_with_timestamp"),
            AttributeDefinition::frequency_caps("frequency_caps"),
            AttributeDefinition::integer("optional_score").allow_undefined(),
        ] {
            config.add_attr_domain(definition).unwrap();
        }
        config
    }

    fn event(config: &Config, age: i64, country: &str) -> Event {
        let mut builder = config.make_event();
        builder.with_integer("age", age).unwrap();
        builder.with_string("country", country).unwrap();
        builder.build().unwrap()
    }

    fn event_with_tags(config: &Config, tags: &[i64]) -> Event {
        let mut builder = config.make_event();
        builder.with_integer_list("tags", tags).unwrap();
        builder.build().unwrap()
    }

    fn event_with_caps(config: &Config) -> Event {
        let mut builder = config.make_event();
        builder.with_integer("now", 1_600_000_060).unwrap();
        builder
            .with_frequency_caps(
                "frequency_caps",
                &[FrequencyCap::new(
                    FrequencyType::Campaign,
                    30,
                    "home",
                    3,
                    Some(1_600_000_000_000_000),
                )],
            )
            .unwrap();
        builder.build().unwrap()
    }
}
