use crate::error::Error;
use crate::value::Value;
use crate::Reflect;

/// The four semantic parameter categories a constructor slot can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ParamKind {
    #[strum(serialize = "positional")]
    Positional,
    #[strum(serialize = "variadic positional")]
    VarPositional,
    #[strum(serialize = "keyword")]
    Keyword,
    #[strum(serialize = "variadic keyword")]
    VarKeyword,
}

/// One declared constructor parameter: name, kind and optional default.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        ParameterSpec {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The ordered parameter list of a synthesized constructor, derived once per
/// type and shared as `'static` data afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    class_name: String,
    params: Vec<ParameterSpec>,
}

impl Signature {
    pub fn new(class_name: impl Into<String>, params: Vec<ParameterSpec>) -> Self {
        Signature {
            class_name: class_name.into(),
            params,
        }
    }

    pub fn builder(class_name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder {
            class_name: class_name.into(),
            params: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Caller-contract checks: at most one variadic slot of each kind and no
    /// duplicate names. Violations are configuration errors, surfaced when
    /// the instance state is first rebound.
    pub fn validate(&self) -> Result<(), Error> {
        for kind in [ParamKind::VarPositional, ParamKind::VarKeyword] {
            if self.params.iter().filter(|p| p.kind() == kind).count() > 1 {
                return Err(Error::MultipleVariadic(kind));
            }
        }
        for (index, param) in self.params.iter().enumerate() {
            if self.params[..index].iter().any(|p| p.name() == param.name()) {
                return Err(Error::DuplicateParameter(param.name().to_string()));
            }
        }
        Ok(())
    }
}

pub struct SignatureBuilder {
    class_name: String,
    params: Vec<ParameterSpec>,
}

impl SignatureBuilder {
    pub fn positional(mut self, name: &str) -> Self {
        self.params
            .push(ParameterSpec::new(name, ParamKind::Positional));
        self
    }

    pub fn keyword(mut self, name: &str, default: Option<Value>) -> Self {
        let mut param = ParameterSpec::new(name, ParamKind::Keyword);
        if let Some(default) = default {
            param = param.with_default(default);
        }
        self.params.push(param);
        self
    }

    pub fn var_positional(mut self, name: &str) -> Self {
        self.params
            .push(ParameterSpec::new(name, ParamKind::VarPositional));
        self
    }

    pub fn var_keyword(mut self, name: &str) -> Self {
        self.params
            .push(ParameterSpec::new(name, ParamKind::VarKeyword));
        self
    }

    /// Splices another type's parameters in at this position, so a derived
    /// signature carries every ancestor-declared parameter.
    pub fn embed<T: Reflect>(mut self) -> Self {
        self.params.extend(T::signature().params().iter().cloned());
        self
    }

    pub fn finish(self) -> Signature {
        Signature::new(self.class_name, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order() {
        let sig = Signature::builder("Abc")
            .positional("a")
            .var_positional("b")
            .keyword("c", None)
            .keyword("d", Some(Value::Int(4)))
            .var_keyword("f")
            .finish();
        let names: Vec<_> = sig.params().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "f"]);
        assert_eq!(sig.param("d").unwrap().default(), Some(&Value::Int(4)));
        assert_eq!(sig.param("b").unwrap().kind(), ParamKind::VarPositional);
        assert!(sig.validate().is_ok());
    }

    #[test]
    fn rejects_multiple_variadic_slots() {
        let sig = Signature::builder("Bad")
            .var_positional("b1")
            .var_positional("b2")
            .finish();
        let err = sig.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "found more than one variadic positional parameter"
        );

        let sig = Signature::builder("Bad")
            .var_keyword("f1")
            .var_keyword("f2")
            .finish();
        assert!(matches!(
            sig.validate(),
            Err(Error::MultipleVariadic(ParamKind::VarKeyword))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let sig = Signature::builder("Bad")
            .positional("a")
            .keyword("a", None)
            .finish();
        assert!(matches!(
            sig.validate(),
            Err(Error::DuplicateParameter(name)) if name == "a"
        ));
    }
}
