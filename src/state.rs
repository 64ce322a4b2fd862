use std::collections::VecDeque;

use crate::error::Error;
use crate::params::{ParamKind, Signature};
use crate::value::{FromValue, Value};
use crate::{FromBound, Reflect};

/// The canonical `(args, kwargs)` pair reconstructed from an instance's
/// stored state. Replaying it through the constructor reproduces an
/// equivalent instance, modulo values left at their declared default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundState {
    pub args: Vec<Value>,
    pub kwargs: Vec<(String, Value)>,
}

impl BoundState {
    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.kwargs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// Rebinds an instance's stored fields through its signature.
///
/// Fields structurally equal to their declared default are omitted. Remaining
/// parameters bind positionally while the positional phase holds; the first
/// omitted parameter or the variadic positional slot ends the phase and pushes
/// later named parameters into the keyword map. A variadic positional `Seq`
/// splices into the positional tail and a variadic keyword `Map` merges into
/// the keyword map.
pub fn rebind<T: Reflect + ?Sized>(instance: &T) -> Result<BoundState, Error> {
    let sig = T::signature();
    sig.validate()?;
    let raw = instance.raw_state();

    let mut state = BoundState::default();
    let mut tail: Vec<(String, Value)> = Vec::new();
    let mut positional = true;
    for param in sig.params() {
        let value = raw
            .iter()
            .find(|(name, _)| *name == param.name())
            .map(|(_, value)| value)
            .filter(|value| param.default() != Some(*value));
        match param.kind() {
            ParamKind::VarPositional => {
                positional = false;
                match value {
                    Some(Value::Seq(items)) => state.args.extend(items.iter().cloned()),
                    Some(other) => state.args.push(other.clone()),
                    None => {}
                }
            }
            ParamKind::VarKeyword => match value {
                Some(Value::Map(entries)) => tail.extend(entries.iter().cloned()),
                Some(other) => tail.push((param.name().to_string(), other.clone())),
                None => {}
            },
            ParamKind::Positional | ParamKind::Keyword => match value {
                Some(value) if positional => state.args.push(value.clone()),
                Some(value) => state.kwargs.push((param.name().to_string(), value.clone())),
                None => positional = false,
            },
        }
    }
    state.kwargs.extend(tail);
    Ok(state)
}

pub(crate) fn rebound<T: Reflect + ?Sized>(instance: &T) -> BoundState {
    rebind(instance).unwrap_or_else(|e| {
        panic!("cannot rebind {} state: {e}", T::signature().class_name())
    })
}

/// Equality over rebound state: positional arguments pairwise, keyword maps
/// over the union of both key sets (a key recorded on one side only is
/// unequal to its absence).
pub fn eq<T: Reflect + ?Sized, U: Reflect + ?Sized>(left: &T, right: &U) -> bool {
    let a = rebound(left);
    let b = rebound(right);
    if a.args != b.args {
        return false;
    }
    let mut keys: Vec<&str> = a.kwargs.iter().map(|(k, _)| k.as_str()).collect();
    for (key, _) in &b.kwargs {
        if !keys.contains(&key.as_str()) {
            keys.push(key);
        }
    }
    keys.into_iter()
        .all(|key| match (a.kwarg(key), b.kwarg(key)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        })
}

/// An instance is truthy iff every rebound argument, positional and keyword,
/// is itself truthy.
pub fn truthy<T: Reflect + ?Sized>(instance: &T) -> bool {
    let state = rebound(instance);
    state.args.iter().all(Value::is_truthy) && state.kwargs.iter().all(|(_, v)| v.is_truthy())
}

/// Shallow copy: replay the rebound arguments through the constructor.
pub fn duplicate<T: FromBound>(instance: &T) -> Result<T, Error> {
    T::from_bound(rebind(instance)?)
}

/// Lowers an instance to a nested [`Value::Object`].
pub fn to_object<T: Reflect + ?Sized>(instance: &T) -> Result<Value, Error> {
    let state = rebind(instance)?;
    Ok(Value::Object {
        class: T::signature().class_name().to_string(),
        args: state.args,
        kwargs: state.kwargs,
    })
}

/// Diagnostic serialization of the raw stored fields, unfiltered by
/// default-omission. This is the hash input; hashed instances must not be
/// mutated afterwards.
pub fn raw_repr<T: Reflect + ?Sized>(instance: &T) -> String {
    let entries: Vec<String> = instance
        .raw_state()
        .iter()
        .map(|(name, value)| {
            format!(
                "{name}: {}",
                crate::text::render_value(value, crate::text::Style::Diagnostic)
            )
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Consumes a [`BoundState`] parameter by parameter, in declaration order:
/// positional pop, keyword lookup, default refill, variadic drain. The
/// typed inverse of [`rebind`].
pub struct Binder {
    signature: &'static Signature,
    args: VecDeque<Value>,
    kwargs: Vec<(String, Value)>,
}

impl Binder {
    pub fn new(signature: &'static Signature, state: BoundState) -> Self {
        Binder {
            signature,
            args: state.args.into(),
            kwargs: state.kwargs,
        }
    }

    /// Takes the next parameter, which must be requested in declaration
    /// order so the variadic slot drains exactly the unclaimed tail.
    pub fn take<V: FromValue>(&mut self, name: &str) -> Result<V, Error> {
        let param = self
            .signature
            .param(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;
        let value = match param.kind() {
            ParamKind::Positional | ParamKind::Keyword => self
                .args
                .pop_front()
                .or_else(|| self.remove_kwarg(name))
                .or_else(|| param.default().cloned())
                .ok_or_else(|| Error::MissingArgument(name.to_string()))?,
            ParamKind::VarPositional => Value::Seq(self.args.drain(..).collect()),
            ParamKind::VarKeyword => Value::Map(std::mem::take(&mut self.kwargs)),
        };
        V::from_value(value)
    }

    /// Runs an embedded base type's own binding over the shared state, so
    /// chained construction populates ancestor parameters through the
    /// ancestor's constructor. When the base declares a variadic keyword
    /// slot, every keyword not naming a parameter of the outer signature
    /// follows it down; keywords for outer parameters stay behind.
    pub fn embedded<B: FromBound>(&mut self) -> Result<B, Error> {
        let mut sub = BoundState::default();
        for param in B::signature().params() {
            match param.kind() {
                ParamKind::Positional | ParamKind::Keyword => {
                    if let Some(value) = self.args.pop_front() {
                        sub.args.push(value);
                    } else if let Some(value) = self.remove_kwarg(param.name()) {
                        sub.kwargs.push((param.name().to_string(), value));
                    }
                }
                ParamKind::VarPositional => sub.args.extend(self.args.drain(..)),
                ParamKind::VarKeyword => {
                    let mut index = 0;
                    while index < self.kwargs.len() {
                        if self.signature.param(&self.kwargs[index].0).is_some() {
                            index += 1;
                        } else {
                            sub.kwargs.push(self.kwargs.remove(index));
                        }
                    }
                }
            }
        }
        B::from_bound(sub)
    }

    /// Fails if any argument was left unclaimed.
    pub fn finish(self) -> Result<(), Error> {
        if !self.args.is_empty() {
            return Err(Error::TooManyArguments(
                self.signature.class_name().to_string(),
            ));
        }
        if let Some((name, _)) = self.kwargs.into_iter().next() {
            return Err(Error::UnexpectedKeyword(name));
        }
        Ok(())
    }

    fn remove_kwarg(&mut self, name: &str) -> Option<Value> {
        let index = self.kwargs.iter().position(|(k, _)| k == name)?;
        Some(self.kwargs.remove(index).1)
    }
}
