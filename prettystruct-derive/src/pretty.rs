use darling::{ast, util, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, DeriveInput};

#[derive(Debug, FromField)]
#[darling(attributes(pretty))]
struct PrettyField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    default: Option<syn::Expr>,
    #[darling(default)]
    variadic: bool,
    #[darling(default)]
    kwargs: bool,
    #[darling(default)]
    extends: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(pretty), supports(struct_named))]
struct PrettyReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<util::Ignored, PrettyField>,
    #[darling(default)]
    init: Option<bool>,
    #[darling(default)]
    repr: Option<bool>,
    #[darling(default)]
    copy: Option<bool>,
    #[darling(default)]
    eq: Option<bool>,
    #[darling(default)]
    truthy: Option<bool>,
    #[darling(default)]
    hash: Option<bool>,
    #[darling(default)]
    json: Option<bool>,
}

/// How a field binds: the four parameter kinds plus the embedded-base slot
/// that splices an ancestor signature in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Positional,
    Keyword,
    VarPositional,
    VarKeyword,
    Embedded,
}

pub fn expand(input: &DeriveInput) -> TokenStream {
    let receiver = match PrettyReceiver::from_derive_input(input) {
        Ok(receiver) => receiver,
        Err(e) => return e.write_errors(),
    };
    match receiver.expand() {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
}

/// Classifies each field, enforcing the definition-time contract: at most
/// one variadic positional slot, at most one variadic keyword slot (which
/// must come last), at most one embedded base.
fn classify(fields: &[&PrettyField]) -> syn::Result<Vec<Slot>> {
    let mut slots = Vec::with_capacity(fields.len());
    let mut seen_variadic = false;
    let mut seen_kwargs = false;
    let mut seen_extends = false;
    for (index, field) in fields.iter().enumerate() {
        let ident = field.ident.as_ref().expect("named struct");
        let marks = field.variadic as u8 + field.kwargs as u8 + field.extends as u8;
        if marks > 1 {
            return Err(syn::Error::new(
                ident.span(),
                "`variadic`, `kwargs` and `extends` are mutually exclusive",
            ));
        }
        if field.default.is_some() && marks > 0 {
            return Err(syn::Error::new(
                ident.span(),
                "`default` only applies to plain parameter fields",
            ));
        }
        let slot = if field.extends {
            if seen_extends {
                return Err(syn::Error::new(
                    ident.span(),
                    "only one `extends` field is supported",
                ));
            }
            seen_extends = true;
            Slot::Embedded
        } else if field.variadic {
            if seen_variadic {
                return Err(syn::Error::new(
                    ident.span(),
                    "found more than one variadic positional slot",
                ));
            }
            seen_variadic = true;
            Slot::VarPositional
        } else if field.kwargs {
            if seen_kwargs {
                return Err(syn::Error::new(
                    ident.span(),
                    "found more than one variadic keyword slot",
                ));
            }
            if index + 1 != fields.len() {
                return Err(syn::Error::new(
                    ident.span(),
                    "the variadic keyword slot must be the last field",
                ));
            }
            seen_kwargs = true;
            Slot::VarKeyword
        } else if field.default.is_some() || seen_variadic {
            Slot::Keyword
        } else {
            Slot::Positional
        };
        slots.push(slot);
    }
    Ok(slots)
}

impl PrettyReceiver {
    fn expand(&self) -> syn::Result<TokenStream> {
        let fields = self
            .data
            .as_ref()
            .take_struct()
            .expect("darling only admits named structs")
            .fields;
        let slots = classify(&fields)?;

        let ident = &self.ident;
        let class_name = ident.to_string();

        // every generic parameter has to lower into the value model
        let mut generics = self.generics.clone();
        for param in generics.type_params_mut() {
            param.bounds.push(parse_quote!(::prettystruct::ToValue));
            param.bounds.push(parse_quote!(::prettystruct::FromValue));
        }
        let (imp, ty, wher) = generics.split_for_impl();

        let idents: Vec<&syn::Ident> = fields
            .iter()
            .map(|f| f.ident.as_ref().expect("named struct"))
            .collect();
        let types: Vec<&syn::Type> = fields.iter().map(|f| &f.ty).collect();
        let embedded = idents
            .iter()
            .zip(&slots)
            .find(|(_, slot)| **slot == Slot::Embedded)
            .map(|(ident, _)| *ident);

        let builder_calls = fields.iter().zip(&slots).map(|(field, slot)| {
            let name = field.ident.as_ref().expect("named struct").to_string();
            let fty = &field.ty;
            match slot {
                Slot::Embedded => quote! { .embed::<#fty>() },
                Slot::Positional => quote! { .positional(#name) },
                Slot::Keyword => match &field.default {
                    Some(default) => quote! {
                        .keyword(#name, ::std::option::Option::Some({
                            let default: #fty = #default;
                            ::prettystruct::ToValue::to_value(&default)
                        }))
                    },
                    None => quote! { .keyword(#name, ::std::option::Option::None) },
                },
                Slot::VarPositional => quote! { .var_positional(#name) },
                Slot::VarKeyword => quote! { .var_keyword(#name) },
            }
        });

        let raw_state = idents.iter().zip(&slots).map(|(fid, slot)| {
            let name = fid.to_string();
            match slot {
                Slot::Embedded => quote! {
                    state.extend(::prettystruct::Reflect::raw_state(&self.#fid));
                },
                _ => quote! {
                    state.push((#name, ::prettystruct::ToValue::to_value(&self.#fid)));
                },
            }
        });

        let bind = idents
            .iter()
            .zip(&types)
            .zip(&slots)
            .map(|((fid, fty), slot)| {
                let name = fid.to_string();
                match slot {
                    Slot::Embedded => quote! { let #fid: #fty = binder.embedded()?; },
                    _ => quote! { let #fid: #fty = binder.take(#name)?; },
                }
            });

        let mut tokens = quote! {
            impl #imp ::prettystruct::Reflect for #ident #ty #wher {
                fn signature() -> &'static ::prettystruct::Signature {
                    static SIGNATURE: ::std::sync::OnceLock<::prettystruct::Signature> =
                        ::std::sync::OnceLock::new();
                    SIGNATURE.get_or_init(|| {
                        ::prettystruct::Signature::builder(#class_name)
                            #(#builder_calls)*
                            .finish()
                    })
                }

                fn raw_state(&self) -> ::std::vec::Vec<(&'static str, ::prettystruct::Value)> {
                    let mut state = ::std::vec::Vec::new();
                    #(#raw_state)*
                    state
                }
            }

            impl #imp ::prettystruct::FromBound for #ident #ty #wher {
                fn from_bound(
                    state: ::prettystruct::BoundState,
                ) -> ::std::result::Result<Self, ::prettystruct::Error> {
                    let mut binder = ::prettystruct::Binder::new(
                        <Self as ::prettystruct::Reflect>::signature(),
                        state,
                    );
                    #(#bind)*
                    binder.finish()?;
                    ::std::result::Result::Ok(Self { #(#idents),* })
                }
            }

            impl #imp ::prettystruct::ToValue for #ident #ty #wher {
                fn to_value(&self) -> ::prettystruct::Value {
                    ::prettystruct::state::to_object(self)
                        .expect("lowering a well-formed instance to a value")
                }
            }

            impl #imp ::prettystruct::FromValue for #ident #ty #wher {
                fn from_value(
                    value: ::prettystruct::Value,
                ) -> ::std::result::Result<Self, ::prettystruct::Error> {
                    match value {
                        ::prettystruct::Value::Object { class, args, kwargs }
                            if class == #class_name =>
                        {
                            <Self as ::prettystruct::FromBound>::from_bound(
                                ::prettystruct::BoundState { args, kwargs },
                            )
                        }
                        other => ::std::result::Result::Err(::prettystruct::Error::TypeMismatch {
                            expected: ::prettystruct::ValueKind::Object,
                            found: other.kind(),
                        }),
                    }
                }
            }
        };

        if self.init.unwrap_or(true) {
            tokens.extend(quote! {
                impl #imp #ident #ty #wher {
                    /// Synthesized constructor: stores every declared
                    /// parameter as same-named state, running any embedded
                    /// base's constructor through its field.
                    pub fn new(#(#idents: #types),*) -> Self {
                        Self { #(#idents),* }
                    }
                }
            });
        }

        if self.repr.unwrap_or(true) {
            tokens.extend(quote! {
                impl #imp ::std::fmt::Display for #ident #ty #wher {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        f.write_str(&::prettystruct::text::render(
                            self,
                            ::prettystruct::Style::Display,
                        ))
                    }
                }

                impl #imp ::std::fmt::Debug for #ident #ty #wher {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        f.write_str(&::prettystruct::text::render(
                            self,
                            ::prettystruct::Style::Diagnostic,
                        ))
                    }
                }
            });
        }

        if self.copy.unwrap_or(true) {
            let fallback = match embedded {
                Some(base) => quote! {
                    {
                        let entry = [(name.clone(), value.clone())];
                        ::prettystruct::Restore::restore(&mut self.#base, &entry)?;
                    }
                },
                None => quote! {
                    return ::std::result::Result::Err(
                        ::prettystruct::Error::UnknownField(name.clone()),
                    )
                },
            };
            let restore_arms = idents.iter().zip(&slots).filter_map(|(fid, slot)| {
                if *slot == Slot::Embedded {
                    return None;
                }
                let name = fid.to_string();
                Some(quote! {
                    #name => self.#fid = ::prettystruct::FromValue::from_value(value.clone())?,
                })
            });
            tokens.extend(quote! {
                impl #imp ::std::clone::Clone for #ident #ty #wher {
                    fn clone(&self) -> Self {
                        ::prettystruct::state::duplicate(self)
                            .expect("replaying constructor arguments for a well-formed instance")
                    }
                }

                impl #imp ::prettystruct::Restore for #ident #ty #wher {
                    fn restore(
                        &mut self,
                        state: &[(::std::string::String, ::prettystruct::Value)],
                    ) -> ::std::result::Result<(), ::prettystruct::Error> {
                        for (name, value) in state {
                            match name.as_str() {
                                #(#restore_arms)*
                                _ => #fallback,
                            }
                        }
                        ::std::result::Result::Ok(())
                    }
                }
            });
        }

        if self.eq.unwrap_or(false) {
            tokens.extend(quote! {
                impl #imp ::std::cmp::PartialEq for #ident #ty #wher {
                    fn eq(&self, other: &Self) -> bool {
                        ::prettystruct::state::eq(self, other)
                    }
                }
            });
        }

        if self.truthy.unwrap_or(false) {
            tokens.extend(quote! {
                impl #imp ::prettystruct::Truthy for #ident #ty #wher {
                    fn is_truthy(&self) -> bool {
                        ::prettystruct::state::truthy(self)
                    }
                }
            });
        }

        if self.hash.unwrap_or(false) {
            tokens.extend(quote! {
                impl #imp ::std::hash::Hash for #ident #ty #wher {
                    fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                        ::std::hash::Hasher::write(
                            state,
                            ::prettystruct::state::raw_repr(self).as_bytes(),
                        );
                    }
                }
            });
        }

        if self.json.unwrap_or(false) {
            tokens.extend(quote! {
                impl #imp ::prettystruct::PrettyJson for #ident #ty #wher {}
            });
        }

        Ok(tokens)
    }
}
