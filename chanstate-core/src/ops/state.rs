//! Typed get/set accessors over an engine's state document.
//!
//! Setters merge a single key into the store, creating it on the first
//! attempt. Getters never fail because a key or the store is missing:
//! a missing store yields a documented fallback and a missing key leaves
//! the caller's output untouched, so units can probe optional keys from
//! any point of the graph without ordering constraints.

use chanstate_types::{ErrorKind, Phase, StateError, Value};

use super::{fail, OpResult};
use crate::config::Config;
use crate::registry::EngineHandle;

/// Outcome of a state read.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// The key holds a value of the requested kind.
    Found(T),
    /// Nothing usable was stored; write this sentinel/empty result.
    Fallback(T),
    /// Key absent: keep whatever the output held before.
    Untouched,
}

impl<T> Probe<T> {
    /// Collapse to the value the caller's output should hold, given its prior contents.
    pub fn resolve(self, prior: T) -> T {
        match self {
            Probe::Found(v) | Probe::Fallback(v) => v,
            Probe::Untouched => prior,
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Probe::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Probe::Found(_))
    }
}

/// Accessor family bound to one engine instance and one invocation phase.
pub struct StateAccessors<'a> {
    handle: &'a EngineHandle,
    config: &'a Config,
    phase: Phase,
}

impl<'a> StateAccessors<'a> {
    pub fn new(handle: &'a EngineHandle, config: &'a Config, phase: Phase) -> Self {
        Self {
            handle,
            config,
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_number(&self, key: &str, value: f64) -> OpResult<()> {
        self.write("setNumber", key, || {
            if !value.is_finite() {
                return Err(invalid_number(value));
            }
            Ok(Value::Number(value))
        })
    }

    /// Store `values` as an array; any length, including zero, is accepted.
    pub fn set_number_array(&self, key: &str, values: &[f64]) -> OpResult<()> {
        self.write("setNumberArray", key, || {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(invalid_number(*bad));
            }
            Ok(Value::NumberArray(values.to_vec()))
        })
    }

    /// Store `text`, read as JSON string content (escapes are decoded).
    pub fn set_string(&self, key: &str, text: &str) -> OpResult<()> {
        self.write("setString", key, || {
            if text.is_empty() {
                return Err(StateError::empty_payload("string value"));
            }
            Ok(Value::String(decode_string_content(text)?))
        })
    }

    /// Store `texts` as a string array. The array must not be empty; single
    /// elements may be.
    pub fn set_string_array<S: AsRef<str>>(&self, key: &str, texts: &[S]) -> OpResult<()> {
        self.write("setStringArray", key, || {
            if texts.is_empty() {
                return Err(StateError::empty_payload("string array"));
            }
            let decoded = texts
                .iter()
                .map(|t| decode_string_content(t.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::StringArray(decoded))
        })
    }

    /// Stored number; the configured sentinel (-1 by default) when no store exists.
    pub fn get_number(&self, key: &str) -> OpResult<Probe<f64>> {
        let missing = self.config.missing_number();
        self.read("getNumber", key, Probe::Fallback(missing), |value| {
            value.as_number().map_or(Probe::Untouched, Probe::Found)
        })
    }

    /// Stored array; `[sentinel]` when no store exists.
    pub fn get_number_array(&self, key: &str) -> OpResult<Probe<Vec<f64>>> {
        let missing = self.config.missing_number();
        self.read("getNumberArray", key, Probe::Fallback(vec![missing]), |value| {
            value
                .as_numbers()
                .map_or(Probe::Untouched, |v| Probe::Found(v.to_vec()))
        })
    }

    /// Stored string; empty when the store or the key is missing.
    pub fn get_string(&self, key: &str) -> OpResult<Probe<String>> {
        self.read("getString", key, Probe::Fallback(String::new()), |value| {
            value
                .as_str()
                .map_or(Probe::Fallback(String::new()), |s| Probe::Found(s.to_string()))
        })
        .map(|probe| match probe {
            Probe::Untouched => Probe::Fallback(String::new()),
            other => other,
        })
    }

    /// Stored string array; empty when the store or the key is missing.
    pub fn get_string_array(&self, key: &str) -> OpResult<Probe<Vec<String>>> {
        self.read("getStringArray", key, Probe::Fallback(Vec::new()), |value| {
            value
                .as_strings()
                .map_or(Probe::Fallback(Vec::new()), |v| Probe::Found(v.to_vec()))
        })
        .map(|probe| match probe {
            Probe::Untouched => Probe::Fallback(Vec::new()),
            other => other,
        })
    }

    fn write(
        &self,
        op: &str,
        key: &str,
        build: impl FnOnce() -> Result<Value, StateError>,
    ) -> OpResult<()> {
        // The store exists from the first attempt on, even if this one fails
        let result = self.handle.with_document_mut(|doc| {
            if key.is_empty() {
                return Err(StateError::empty_key());
            }
            let value = build()?;
            doc.merge(key, value);
            Ok(())
        });
        result.map_err(|e| fail("state", op, self.phase, e))
    }

    fn read<T>(
        &self,
        op: &str,
        key: &str,
        no_store: Probe<T>,
        pick: impl FnOnce(&Value) -> Probe<T>,
    ) -> OpResult<Probe<T>> {
        if key.is_empty() {
            return Err(fail("state", op, self.phase, StateError::empty_key()));
        }
        let probe = self.handle.with_document(|doc| match doc {
            None => None,
            Some(doc) => Some(doc.get(key).map_or(Probe::Untouched, pick)),
        });
        match probe {
            Some(probe) => Ok(probe),
            None => {
                log::debug!(
                    target: "state",
                    "{}: {}",
                    op,
                    StateError::new(ErrorKind::StoreUnavailable, "no data has been written to internal state")
                );
                Ok(no_store)
            }
        }
    }
}

fn invalid_number(value: f64) -> StateError {
    StateError::new(ErrorKind::InvalidNumber, format!("{} cannot be stored", value))
}

/// Decode `text` as the body of a JSON string literal.
///
/// Unescaped quotes, raw control characters and bad escapes are rejected.
pub(crate) fn decode_string_content(text: &str) -> Result<String, StateError> {
    let literal = format!("\"{}\"", text);
    serde_json::from_str::<String>(&literal)
        .map_err(|e| StateError::parse(format!("invalid string data {:?}: {}", text, e)))
}
