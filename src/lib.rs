//! Synthesize companion behaviors for a struct from its declared field list.
//!
//! `#[derive(Pretty)]` compiles a struct's fields into a constructor
//! [`Signature`] and derives everything else by replaying the stored state
//! through that signature's binding rules: a `new` constructor, textual
//! forms (`Display`/`Debug`), equality, truthiness, hashing, copy/restore
//! and a JSON round-trip, each independently toggled.
//!
//! ```
//! use prettystruct::{Pretty, PrettyJson, Registry};
//!
//! #[derive(Pretty)]
//! #[pretty(eq, json)]
//! struct Account {
//!     owner: String,
//!     #[pretty(default = 0)]
//!     balance: i64,
//! }
//!
//! let account = Account::new("alice".to_string(), 250);
//! assert_eq!(account.to_string(), "Account(alice, 250)");
//! assert_eq!(format!("{account:?}"), "Account(\"alice\", 250)");
//!
//! // parameters left at their declared default are omitted
//! assert_eq!(Account::new("bob".to_string(), 0).to_string(), "Account(bob)");
//!
//! let json = account.to_json().unwrap();
//! let back = Account::from_json(&json, &Registry::new()).unwrap();
//! assert_eq!(back, account);
//! ```

pub mod error;
pub mod json;
pub mod params;
pub mod state;
pub mod text;
pub mod value;

pub use error::Error;
pub use json::Registry;
pub use params::{ParamKind, ParameterSpec, Signature, SignatureBuilder};
pub use state::{Binder, BoundState};
pub use text::Style;
pub use value::{FromValue, Symbol, ToValue, Value, ValueKind};

pub use prettystruct_derive::Pretty;

/// Exposes a type's constructor signature and its stored state, the two
/// inputs every derived behavior is built from. Implemented by
/// `#[derive(Pretty)]`; hand-written impls work the same way.
pub trait Reflect {
    /// The ordered parameter list, derived once and shared afterwards.
    fn signature() -> &'static Signature;

    /// Every stored field in declaration order, unfiltered.
    fn raw_state(&self) -> Vec<(&'static str, Value)>;
}

/// Reconstructs an instance from a bound `(args, kwargs)` pair, refilling
/// omitted parameters from their declared defaults.
pub trait FromBound: Reflect + Sized {
    fn from_bound(state: BoundState) -> Result<Self, Error>;
}

/// Truthiness derived from the rebound state: falsy as soon as any rebound
/// argument is falsy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

/// Applies a raw field-name-to-value mapping directly onto an instance,
/// bypassing the constructor. The restore half of the externalization
/// protocol; the other half is [`state::rebind`].
pub trait Restore {
    fn restore(&mut self, state: &[(String, Value)]) -> Result<(), Error>;
}

/// JSON round-trip over the `[className, args, kwargs]` wire format.
pub trait PrettyJson: FromBound {
    fn to_json(&self) -> Result<String, Error> {
        json::encode_str(self)
    }

    /// Decodes from the wire format. The target type resolves implicitly;
    /// the registry supplies every other name the payload may reference.
    fn from_json(json: &str, registry: &Registry) -> Result<Self, Error> {
        let mut registry = registry.clone();
        registry.register::<Self>();
        json::decode_str(json, &registry)
    }
}
