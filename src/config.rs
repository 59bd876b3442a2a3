use crate::{
    error::ConfigError,
    events::EventBuilder,
    pred_map::PredicateMap,
    strings::{StringId, StringTable},
    values::AttributeKind,
};
use std::collections::HashMap;

/// A dense runtime id for a registered attribute.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash, Debug)]
pub struct VariableId(pub(crate) usize);

/// The declared value range of an attribute. Used by the bound analyzer and
/// to validate bounded-string expressions.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DomainBound {
    Boolean { min: bool, max: bool },
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    /// A string domain is "bounded" when a maximum cardinality is declared;
    /// its interned ids then range over `[0, max_cardinality]`.
    String { max_cardinality: Option<usize> },
    /// List, segment and frequency attributes carry no bound.
    None,
}

/// An attribute declaration, handed to [`Config::add_attr_domain`].
///
/// ```rust
/// use abe_matcher::AttributeDefinition;
///
/// let age = AttributeDefinition::integer_in("age", 0, 120);
/// let country = AttributeDefinition::bounded_string("country", 3);
/// let private = AttributeDefinition::boolean("private").allow_undefined();
/// ```
#[derive(Clone, Debug)]
pub struct AttributeDefinition {
    name: String,
    kind: AttributeKind,
    bound: DomainBound,
    allow_undefined: bool,
}

impl AttributeDefinition {
    fn new(name: &str, kind: AttributeKind, bound: DomainBound) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            bound,
            allow_undefined: false,
        }
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(
            name,
            AttributeKind::Boolean,
            DomainBound::Boolean {
                min: false,
                max: true,
            },
        )
    }

    pub fn integer(name: &str) -> Self {
        Self::integer_in(name, i64::MIN, i64::MAX)
    }

    pub fn integer_in(name: &str, min: i64, max: i64) -> Self {
        Self::new(name, AttributeKind::Integer, DomainBound::Integer { min, max })
    }

    pub fn float(name: &str) -> Self {
        Self::float_in(name, f64::MIN, f64::MAX)
    }

    pub fn float_in(name: &str, min: f64, max: f64) -> Self {
        Self::new(name, AttributeKind::Float, DomainBound::Float { min, max })
    }

    pub fn string(name: &str) -> Self {
        Self::new(
            name,
            AttributeKind::String,
            DomainBound::String {
                max_cardinality: None,
            },
        )
    }

    pub fn bounded_string(name: &str, max_cardinality: usize) -> Self {
        Self::new(
            name,
            AttributeKind::String,
            DomainBound::String {
                max_cardinality: Some(max_cardinality),
            },
        )
    }

    pub fn integer_list(name: &str) -> Self {
        Self::new(name, AttributeKind::IntegerList, DomainBound::None)
    }

    pub fn string_list(name: &str) -> Self {
        Self::new(name, AttributeKind::StringList, DomainBound::None)
    }

    pub fn segments(name: &str) -> Self {
        Self::new(name, AttributeKind::Segments, DomainBound::None)
    }

    pub fn frequency_caps(name: &str) -> Self {
        Self::new(name, AttributeKind::FrequencyCaps, DomainBound::None)
    }

    /// Mark the attribute as allowed to be absent from events. Every
    /// predicate referencing an absent allowed-undefined attribute
    /// evaluates to false.
    pub fn allow_undefined(mut self) -> Self {
        self.allow_undefined = true;
        self
    }
}

/// The registered domain of a single attribute.
#[derive(Clone, Debug)]
pub struct AttrDomain {
    attr: String,
    var: VariableId,
    kind: AttributeKind,
    bound: DomainBound,
    allow_undefined: bool,
}

impl AttrDomain {
    pub fn name(&self) -> &str {
        &self.attr
    }

    pub fn variable(&self) -> VariableId {
        self.var
    }

    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub fn bound(&self) -> DomainBound {
        self.bound
    }

    pub fn is_allow_undefined(&self) -> bool {
        self.allow_undefined
    }
}

/// The process-wide registry: attribute domains, per-attribute string
/// tables and the predicate map.
///
/// A `Config` is single-writer during the setup phase (domain registration
/// and expression compilation) and read-only during matching.
#[derive(Default)]
pub struct Config {
    by_names: HashMap<String, VariableId>,
    domains: Vec<AttrDomain>,
    strings: Vec<StringTable>,
    pub(crate) pred_map: PredicateMap,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute. Variable ids are allocated densely and never
    /// reused.
    pub fn add_attr_domain(
        &mut self,
        definition: AttributeDefinition,
    ) -> Result<VariableId, ConfigError> {
        if self.by_names.contains_key(&definition.name) {
            return Err(ConfigError::AlreadyPresent(definition.name));
        }
        let var = VariableId(self.domains.len());
        self.by_names.insert(definition.name.clone(), var);
        self.domains.push(AttrDomain {
            attr: definition.name,
            var,
            kind: definition.kind,
            bound: definition.bound,
            allow_undefined: definition.allow_undefined,
        });
        self.strings.push(StringTable::new());
        Ok(var)
    }

    /// Idempotent name-to-id interning. The first call for an unknown name
    /// registers it with a default domain (integer over the full range,
    /// undefined not allowed).
    pub fn get_id_for_attr(&mut self, name: &str) -> VariableId {
        if let Some(var) = self.by_names.get(name) {
            return *var;
        }
        self.add_attr_domain(AttributeDefinition::integer(name))
            .unwrap_or_else(|_| unreachable!("attribute presence was checked above"))
    }

    /// Intern `literal` in the string table of the attribute identified by
    /// `var`. Ids are dense, starting at zero per attribute.
    pub fn get_id_for_string(&mut self, var: VariableId, literal: &str) -> StringId {
        self.strings[var.0].get_or_insert(literal)
    }

    pub fn var_exists(&self, name: &str) -> bool {
        self.by_names.contains_key(name)
    }

    pub fn is_variable_allow_undefined(&self, var: VariableId) -> bool {
        self.domains[var.0].allow_undefined
    }

    /// Number of deduplicated predicates assigned so far. This is the size
    /// a [`Memoize`](crate::Memoize) should be allocated with.
    pub fn pred_count(&self) -> usize {
        self.pred_map.len()
    }

    pub fn attr_domain(&self, name: &str) -> Option<&AttrDomain> {
        self.by_names.get(name).map(|var| &self.domains[var.0])
    }

    pub fn make_event(&self) -> EventBuilder {
        EventBuilder::new(self)
    }

    pub(crate) fn existing_id(&self, name: &str) -> Option<VariableId> {
        self.by_names.get(name).copied()
    }

    pub(crate) fn domain(&self, var: VariableId) -> &AttrDomain {
        &self.domains[var.0]
    }

    pub(crate) fn lookup_string(&self, var: VariableId, literal: &str) -> StringId {
        self.strings[var.0].get(literal)
    }

    pub(crate) fn string_interned(&self, var: VariableId, literal: &str) -> bool {
        self.strings[var.0].contains(literal)
    }

    pub(crate) fn string_count(&self, var: VariableId) -> usize {
        self.strings[var.0].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_register_attribute_domains() {
        let mut config = Config::new();

        let age = config
            .add_attr_domain(AttributeDefinition::integer_in("age", 0, 120))
            .unwrap();
        let country = config
            .add_attr_domain(AttributeDefinition::bounded_string("country", 3))
            .unwrap();

        assert_eq!(VariableId(0), age);
        assert_eq!(VariableId(1), country);
        assert!(config.var_exists("age"));
        assert!(!config.var_exists("city"));
    }

    #[test]
    fn return_an_error_on_duplicate_attribute() {
        let mut config = Config::new();
        config
            .add_attr_domain(AttributeDefinition::integer("age"))
            .unwrap();

        let result = config.add_attr_domain(AttributeDefinition::float("age"));

        assert_eq!(Err(ConfigError::AlreadyPresent("age".to_string())), result);
    }

    #[test]
    fn attribute_interning_is_idempotent() {
        let mut config = Config::new();

        let first = config.get_id_for_attr("exchange_id");
        let second = config.get_id_for_attr("exchange_id");

        assert_eq!(first, second);
        assert_eq!(
            AttributeKind::Integer,
            config.attr_domain("exchange_id").unwrap().kind()
        );
    }

    #[test]
    fn string_ids_are_independent_per_attribute() {
        let mut config = Config::new();
        let country = config
            .add_attr_domain(AttributeDefinition::string("country"))
            .unwrap();
        let city = config
            .add_attr_domain(AttributeDefinition::string("city"))
            .unwrap();

        let country_us = config.get_id_for_string(country, "US");
        let country_ca = config.get_id_for_string(country, "CA");
        let city_us = config.get_id_for_string(city, "US");

        assert_eq!(StringId(0), country_us);
        assert_eq!(StringId(1), country_ca);
        assert_eq!(StringId(0), city_us);
        assert_eq!(country_us, config.get_id_for_string(country, "US"));
    }

    #[test]
    fn allow_undefined_is_recorded() {
        let mut config = Config::new();
        let private = config
            .add_attr_domain(AttributeDefinition::boolean("private").allow_undefined())
            .unwrap();
        let age = config
            .add_attr_domain(AttributeDefinition::integer("age"))
            .unwrap();

        assert!(config.is_variable_allow_undefined(private));
        assert!(!config.is_variable_allow_undefined(age));
    }
}
