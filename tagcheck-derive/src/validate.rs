use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, GenericParam, Ident, Index, LitStr, Member, ext::IdentExt,
    parse::Parse, parse::ParseStream, parse_macro_input, parse_quote,
};

/// Argument of `#[validate(...)]`: a directive string or `skip`
enum ValidateArg {
    Directive(LitStr),
    Skip,
}

impl Parse for ValidateArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(ValidateArg::Directive(input.parse()?));
        }

        let ident: Ident = input.parse()?;
        if ident == "skip" {
            Ok(ValidateArg::Skip)
        } else {
            Err(syn::Error::new(
                ident.span(),
                "expected a directive string or `skip`",
            ))
        }
    }
}

/// Validation attributes of one field
#[derive(Default)]
struct FieldAttrs {
    directive: Option<LitStr>,
    condition: Option<LitStr>,
    message: Option<LitStr>,
    rename: Option<LitStr>,
    skip: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs {
            let path = attr.path();
            if path.is_ident("validate") {
                match attr.parse_args::<ValidateArg>()? {
                    ValidateArg::Directive(lit) => set_once(&mut parsed.directive, lit, attr)?,
                    ValidateArg::Skip => parsed.skip = true,
                }
            } else if path.is_ident("validate_if") {
                set_once(&mut parsed.condition, attr.parse_args()?, attr)?;
            } else if path.is_ident("error_message") {
                set_once(&mut parsed.message, attr.parse_args()?, attr)?;
            } else if path.is_ident("rename") {
                set_once(&mut parsed.rename, attr.parse_args()?, attr)?;
            }
        }

        Ok(parsed)
    }
}

fn set_once(slot: &mut Option<LitStr>, lit: LitStr, attr: &Attribute) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(attr, "duplicate attribute"));
    }
    *slot = Some(lit);
    Ok(())
}

pub fn validate_derive_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "Validate can only be derived for structs",
        ));
    };

    let mut fields = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // tuple fields are named by position
        let (member, default_name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        };
        let field_name = attrs
            .rename
            .as_ref()
            .map(LitStr::value)
            .unwrap_or(default_name);

        let directive = attrs.directive.as_ref().map(|d| quote!(.validate(#d)));
        let condition = attrs.condition.as_ref().map(|c| quote!(.validate_if(#c)));
        let message = attrs.message.as_ref().map(|m| quote!(.error_message(#m)));

        fields.push(quote! {
            .field(::tagcheck::Field::new(#field_name, &self.#member) #directive #condition #message)
        });
    }

    let mut generics = input.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::tagcheck::ToValue));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagcheck::Validate for #struct_name #ty_generics #where_clause {
            fn record(&self) -> ::tagcheck::Record {
                ::tagcheck::Record::new(#type_name)
                    #(#fields)*
            }
        }

        impl #impl_generics ::tagcheck::ToValue for #struct_name #ty_generics #where_clause {
            fn to_value(&self) -> ::tagcheck::Value {
                ::tagcheck::Value::Record(::tagcheck::Validate::record(self))
            }
        }
    })
}
