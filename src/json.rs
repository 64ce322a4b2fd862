use std::collections::HashSet;

use serde_json::Value as Json;

use crate::error::Error;
use crate::state::{to_object, BoundState};
use crate::value::Value;
use crate::{FromBound, Reflect};

/// The set of class names a decode is allowed to resolve, supplied by the
/// caller. Nested strings and arrays whose head resolves here are rebuilt
/// as symbols and objects during decode.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Reflect>(&mut self) -> &mut Self {
        self.names
            .insert(T::signature().class_name().to_string());
        self
    }

    pub fn with<T: Reflect>(mut self) -> Self {
        self.register::<T>();
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Lowers an instance to its wire value: `[className, args, kwargs]`.
pub fn encode<T: Reflect + ?Sized>(instance: &T) -> Result<Value, Error> {
    to_object(instance)
}

pub fn encode_str<T: Reflect + ?Sized>(instance: &T) -> Result<String, Error> {
    let value = encode(instance)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn decode_str<T: FromBound>(json: &str, registry: &Registry) -> Result<T, Error> {
    let raw: Json = serde_json::from_str(json)?;
    decode_value(&raw, registry)
}

/// Decodes a wire value into `T`. Accepts the 2-element `[name, args]` and
/// `[name, mapping]` elisions as well as the full 3-element form; anything
/// else is a structure error. The top-level name must match `T`.
pub fn decode_value<T: FromBound>(raw: &Json, registry: &Registry) -> Result<T, Error> {
    let (class, state) = split(raw, registry)?;
    let expected = T::signature().class_name();
    if class != expected {
        return Err(Error::ClassMismatch {
            expected: expected.to_string(),
            found: class,
        });
    }
    T::from_bound(state)
}

fn split(raw: &Json, registry: &Registry) -> Result<(String, BoundState), Error> {
    let items = raw.as_array().ok_or(Error::InvalidStructure)?;
    let (class, args, kwargs) = match items.as_slice() {
        [class, payload] => match payload {
            Json::Array(_) => (class, Some(payload), None),
            Json::Object(_) => (class, None, Some(payload)),
            _ => return Err(Error::InvalidStructure),
        },
        [class, args, kwargs] => (class, Some(args), Some(kwargs)),
        _ => return Err(Error::InvalidStructure),
    };
    let class = class.as_str().ok_or(Error::InvalidStructure)?.to_string();

    let mut state = BoundState::default();
    if let Some(args) = args {
        let args = args.as_array().ok_or(Error::InvalidStructure)?;
        state.args = args
            .iter()
            .map(|item| lower(item, registry))
            .collect::<Result<_, _>>()?;
    }
    if let Some(kwargs) = kwargs {
        let kwargs = kwargs.as_object().ok_or(Error::InvalidStructure)?;
        for (key, item) in kwargs {
            state.kwargs.push((key.clone(), lower(item, registry)?));
        }
    }
    Ok((class, state))
}

/// Converts raw JSON into a [`Value`], resolving registry names: a string
/// naming a registered class becomes a symbol, an array whose head resolves
/// becomes a nested object (falling back to a plain sequence when its
/// structure is invalid), and a JSON object with a resolving `"type"` entry
/// becomes a nested object with the remaining entries as keyword arguments.
fn lower(raw: &Json, registry: &Registry) -> Result<Value, Error> {
    match raw {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(match n.as_i64() {
            Some(n) => Value::Int(n),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        }),
        Json::String(s) if registry.contains(s) => Ok(Value::Symbol(s.clone())),
        Json::String(s) => Ok(Value::Str(s.clone())),
        Json::Array(items) => {
            if let Some(Json::String(head)) = items.first() {
                if registry.contains(head) {
                    match split(raw, registry) {
                        Ok((class, state)) => {
                            return Ok(Value::Object {
                                class,
                                args: state.args,
                                kwargs: state.kwargs,
                            })
                        }
                        Err(Error::InvalidStructure) => {}
                        Err(e) => return Err(e),
                    }
                }
            }
            Ok(Value::Seq(
                items
                    .iter()
                    .map(|item| lower(item, registry))
                    .collect::<Result<_, _>>()?,
            ))
        }
        Json::Object(map) => {
            let resolved = map
                .get("type")
                .and_then(Json::as_str)
                .filter(|t| registry.contains(t));
            if let Some(class) = resolved {
                let class = class.to_string();
                let mut kwargs = Vec::new();
                for (key, item) in map {
                    if key != "type" {
                        kwargs.push((key.clone(), lower(item, registry)?));
                    }
                }
                return Ok(Value::Object {
                    class,
                    args: Vec::new(),
                    kwargs,
                });
            }
            let mut entries = Vec::new();
            for (key, item) in map {
                entries.push((key.clone(), lower(item, registry)?));
            }
            Ok(Value::Map(entries))
        }
    }
}
