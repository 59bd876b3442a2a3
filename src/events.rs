use crate::{
    config::{Config, VariableId},
    error::EventError,
    values::{EventString, FrequencyCap, InternedCap, Segment, StringValue, Value},
};

/// A typed event: an ordered list of `(variable id, value)` predicates,
/// sorted by variable id. Built through [`EventBuilder`].
pub struct Event {
    pub(crate) preds: Vec<(VariableId, Value)>,
}

impl Event {
    /// Linear scan of the predicate list, as the matcher resolves
    /// variables.
    pub(crate) fn get(&self, var: VariableId) -> Option<&Value> {
        self.preds
            .iter()
            .find(|(pred_var, _)| *pred_var == var)
            .map(|(_, value)| value)
    }
}

/// Builds an [`Event`], validating attribute names and value kinds against
/// the [`Config`].
///
/// ```rust
/// use abe_matcher::{AttributeDefinition, Config};
///
/// let mut config = Config::new();
/// config.add_attr_domain(AttributeDefinition::integer_in("age", 0, 120)).unwrap();
/// config.add_attr_domain(AttributeDefinition::string("country")).unwrap();
///
/// let mut builder = config.make_event();
/// builder.with_integer("age", 21).unwrap();
/// builder.with_string("country", "US").unwrap();
/// let event = builder.build().unwrap();
/// ```
pub struct EventBuilder<'a> {
    config: &'a Config,
    by_ids: Vec<(VariableId, Value)>,
}

impl<'a> EventBuilder<'a> {
    pub(crate) fn new(config: &'a Config) -> Self {
        Self {
            config,
            by_ids: Vec::new(),
        }
    }

    pub fn build(mut self) -> Result<Event, EventError> {
        self.by_ids.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(Event { preds: self.by_ids })
    }

    pub fn with_boolean(&mut self, name: &str, value: bool) -> Result<(), EventError> {
        self.add_value(name, |_| Value::Boolean(value))
    }

    pub fn with_integer(&mut self, name: &str, value: i64) -> Result<(), EventError> {
        self.add_value(name, |_| Value::Integer(value))
    }

    pub fn with_float(&mut self, name: &str, value: f64) -> Result<(), EventError> {
        self.add_value(name, |_| Value::Float(value))
    }

    pub fn with_string(&mut self, name: &str, value: &str) -> Result<(), EventError> {
        let config = self.config;
        self.add_value(name, |var| {
            Value::String(resolve_string(config, var, value))
        })
    }

    pub fn with_integer_list(&mut self, name: &str, values: &[i64]) -> Result<(), EventError> {
        self.add_value(name, |_| Value::IntegerList(values.to_vec()))
    }

    pub fn with_string_list(&mut self, name: &str, values: &[&str]) -> Result<(), EventError> {
        let config = self.config;
        self.add_value(name, |var| {
            let mut values: Vec<_> = values
                .iter()
                .map(|value| resolve_string(config, var, value))
                .collect();
            values.sort_by_key(|value| value.interned.str_id);
            Value::StringList(values)
        })
    }

    /// Segment lists are sorted ascending by segment id, as the segment
    /// predicates expect.
    pub fn with_segments(&mut self, name: &str, segments: &[Segment]) -> Result<(), EventError> {
        self.add_value(name, |_| {
            let mut segments = segments.to_vec();
            segments.sort_by_key(|segment| segment.id);
            Value::Segments(segments)
        })
    }

    /// Frequency cap namespaces are resolved against the attribute's string
    /// table; a namespace no compiled expression ever mentioned matches no
    /// cap predicate.
    pub fn with_frequency_caps(
        &mut self,
        name: &str,
        caps: &[FrequencyCap],
    ) -> Result<(), EventError> {
        let config = self.config;
        self.add_value(name, |var| {
            Value::FrequencyCaps(
                caps.iter()
                    .map(|cap| InternedCap {
                        cap_type: cap.cap_type,
                        id: cap.id,
                        namespace: StringValue {
                            var,
                            str_id: config.lookup_string(var, &cap.namespace),
                        },
                        value: cap.value,
                        timestamp: cap.timestamp,
                    })
                    .collect(),
            )
        })
    }

    fn add_value<F>(&mut self, name: &str, build: F) -> Result<(), EventError>
    where
        F: FnOnce(VariableId) -> Value,
    {
        let Some(domain) = self.config.attr_domain(name) else {
            return Err(EventError::NonExisting(name.to_string()));
        };
        let var = domain.variable();
        if self.by_ids.iter().any(|(existing, _)| *existing == var) {
            return Err(EventError::AlreadyPresent(name.to_string()));
        }
        let value = build(var);
        if value.kind() != domain.kind() {
            return Err(EventError::MismatchingTypes {
                name: name.to_string(),
                expected: domain.kind(),
                actual: value.kind(),
            });
        }
        self.by_ids.push((var, value));
        Ok(())
    }
}

fn resolve_string(config: &Config, var: VariableId, value: &str) -> EventString {
    EventString {
        raw: value.to_string(),
        interned: StringValue {
            var,
            str_id: config.lookup_string(var, value),
        },
    }
}
