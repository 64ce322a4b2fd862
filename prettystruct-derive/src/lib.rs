mod pretty;

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Synthesizes companion behaviors for a named struct from its field list:
/// a `new` constructor, `Display`/`Debug` textual forms, `Clone` by
/// constructor replay, restore, equality, truthiness, hashing and a JSON
/// round-trip, toggled via `#[pretty(...)]` container options. Field
/// options `default`, `variadic`, `kwargs` and `extends` set each slot's
/// binding kind.
#[proc_macro_derive(Pretty, attributes(pretty))]
pub fn derive_pretty(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    pretty::expand(&ast).into()
}
