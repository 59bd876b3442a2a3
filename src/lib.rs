//! A matching engine for arbitrary boolean targeting expressions (ABE)
//! against typed events, as used in ad-serving and real-time decisioning
//! pipelines.
//!
//! Expressions are trees of typed predicates joined by boolean operators.
//! They are parsed (or built through the [`Node`] constructors), validated
//! and compiled against a [`Config`]: attribute names become dense variable
//! ids, string literals become per-attribute interned ids and every
//! structurally unique predicate gets a dense predicate id. The matcher
//! then evaluates compiled trees against events with short-circuit
//! evaluation and an optional per-event [`Memoize`] cache, so a predicate
//! shared by thousands of expressions is evaluated once per event.
//!
//! # Examples
//!
//! ```
//! use abe_matcher::{
//!     all_variables_in_config, compile, match_node, AttributeDefinition, Config, Memoize,
//! };
//!
//! let mut config = Config::new();
//! config.add_attr_domain(AttributeDefinition::integer_in("age", 0, 120)).unwrap();
//! config.add_attr_domain(AttributeDefinition::bounded_string("country", 10)).unwrap();
//!
//! let mut expression = abe_matcher::parse(r#"age >= 18 and country in ("US", "CA")"#).unwrap();
//! assert!(all_variables_in_config(&config, &expression));
//! compile(&mut config, &mut expression);
//!
//! let mut builder = config.make_event();
//! builder.with_integer("age", 21).unwrap();
//! builder.with_string("country", "US").unwrap();
//! let event = builder.build().unwrap();
//!
//! let mut memoize = Memoize::new(config.pred_count());
//! assert!(match_node(&config, &event, &expression, Some(&mut memoize), None));
//! ```
//!
//! The expression language supports comparisons (`<`, `<=`, `>`, `>=`),
//! equality (`=`, `<>`), boolean combinators (`and`, `or`, `not`, bare
//! variables), set membership (`in`, `not in`), list operators (`one of`,
//! `none of`, `all of`) and function syntax for the specialized
//! predicates: `within_frequency_cap`, `segment_within`, `segment_before`,
//! `geo_within_radius`, `contains`, `starts_with` and `ends_with`.

mod ast;
mod bounds;
mod compile;
mod config;
mod error;
mod events;
mod lexer;
mod matcher;
mod memoize;
mod parser;
mod pred_map;
mod predicates;
mod special;
mod strings;
mod values;

pub use crate::{
    ast::Node,
    bounds::{get_variable_bound, ValueBound},
    compile::{
        all_bounded_strings_valid, all_variables_in_config, assign_pred_id, assign_str_id,
        assign_variable_id, compile,
    },
    config::{AttrDomain, AttributeDefinition, Config, DomainBound, VariableId},
    error::{ConfigError, EventError, ExpressionError, ParserError},
    events::{Event, EventBuilder},
    matcher::match_node,
    memoize::{MatchReport, Memoize},
    parser::{parse, ExprParseError},
    pred_map::PredicateId,
    predicates::{
        AttrVar, ComparisonOperator, ComparisonValue, EqualityOperator, EqualityValue,
        ListLiteral, ListOperator, SegmentOperator, SetLeft, SetOperator, SetRight,
        StringMatchOperator, StringOperand,
    },
    strings::StringId,
    values::{
        AttributeKind, FrequencyCap, FrequencyType, Segment, EQUALITY_EPSILON,
    },
};
