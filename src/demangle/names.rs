//! Qualified names and template instantiations.
//!
//! ```text
//! <qualified-name> ::= <component>+ @            # innermost component first
//! <component>      ::= <identifier> @
//!                  ::= <digit>                    # name backreference
//!                  ::= ?$ <identifier> @ <template-arg>* @
//!                  ::= ?A <hash> @                # anonymous namespace
//!                  ::= ? <number>                 # numbered local scope
//!                  ::= ? <symbol>                 # enclosing function, `??g@@YAXXZ`
//! ```
//!
//! Template argument lists are decoded against fresh name and type tables, seeded with
//! the template's own base name. Once the argument list is done the outer tables are
//! restored and the whole instantiation is recorded in the outer name table, unless it
//! is the name of the declared function itself.

use std::mem;

use crate::demangle::{
    parser::SymbolParser,
    types::{Cv, DecodedSymbol, NameComponent, QualifiedName, TemplateArg, TypeNode},
};

impl SymbolParser<'_> {
    /// Decode an `@`-terminated qualified name
    ///
    /// The components come out outermost first, the reverse of their encoded order. End
    /// of input terminates the name like a final `@` would.
    pub fn decode_qualified_name(&mut self) -> QualifiedName {
        self.decode_name_chain(true)
    }

    /// Decode the name of the declared entity itself
    ///
    /// Identical to [`SymbolParser::decode_qualified_name`] except that an innermost
    /// template instantiation, a function template, is not recorded in the name table.
    pub(crate) fn decode_symbol_name(&mut self) -> QualifiedName {
        self.decode_name_chain(false)
    }

    fn decode_name_chain(&mut self, record_innermost: bool) -> QualifiedName {
        let mut components = Vec::new();

        loop {
            match self.cursor.peek() {
                None => break,
                Some('@') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {}
            }

            let start = self.cursor.pos();
            let component = if components.is_empty()
                && !record_innermost
                && self.cursor.rest().starts_with("?$")
            {
                self.decode_template(false)
            } else {
                self.decode_name_component()
            };
            components.push(component);
            if self.cursor.pos() == start {
                break;
            }
        }

        components.reverse();
        QualifiedName::new(components)
    }

    /// Decode a single name component, recording it in the name table
    pub(crate) fn decode_name_component(&mut self) -> NameComponent {
        if let Some(index) = self.cursor.consume_digit() {
            return match self.names.resolve(index) {
                Ok(component) => component.clone(),
                Err(e) => {
                    log::debug!("{e} in {:?}", self.cursor.rest());
                    NameComponent::Unsupported(index.to_string())
                }
            };
        }

        if self.cursor.peek() == Some('?') {
            return match self.cursor.peek_at(1) {
                Some('$') => self.decode_template(true),
                Some('?') => self.decode_nested_symbol(),
                Some('A') => {
                    self.cursor.advance();
                    self.cursor.read_until('@');
                    self.names.record(NameComponent::AnonymousNamespace);
                    NameComponent::AnonymousNamespace
                }
                _ => {
                    self.cursor.advance();
                    match self.cursor.read_number() {
                        Some(n) => NameComponent::LocalScope(n),
                        None => NameComponent::Unsupported(self.placeholder("?")),
                    }
                }
            };
        }

        let identifier = NameComponent::Identifier(self.cursor.read_until('@').to_string());
        self.names.record(identifier.clone());
        identifier
    }

    /// Decode `??<symbol>`, the enclosing function of a function-local entity
    ///
    /// The nested symbol gets its own tables and is not recorded in the outer name table.
    /// It ends where its own declaration ends; the outer chain carries on from there.
    fn decode_nested_symbol(&mut self) -> NameComponent {
        if let Err(e) = self.enter() {
            log::debug!("{e} decoding nested symbol in {:?}", self.cursor.rest());
            self.cursor.skip_to_end();
            return NameComponent::Unsupported("UNK(depth)".to_string());
        }

        self.cursor.advance();
        let start = self.cursor.pos();
        let outer_names = mem::take(&mut self.names);
        let outer_types = mem::take(&mut self.types);

        let (decl, qualified_name) = self.decode_symbol_body();
        let raw = self.cursor.slice_from(start).to_string();

        self.names = outer_names;
        self.types = outer_types;
        self.leave();

        NameComponent::NestedSymbol(Box::new(DecodedSymbol {
            raw,
            decl,
            qualified_name,
        }))
    }

    /// Decode `?$<base>@<args>@`, recording the instantiation in the name table if `record`
    pub(crate) fn decode_template(&mut self, record: bool) -> NameComponent {
        if let Err(e) = self.enter() {
            log::debug!("{e} decoding template in {:?}", self.cursor.rest());
            self.cursor.skip_to_end();
            return NameComponent::Unsupported("UNK(depth)".to_string());
        }

        self.cursor.consume("?$");
        let outer_names = mem::take(&mut self.names);
        let outer_types = mem::take(&mut self.types);

        let base = self.cursor.read_until('@').to_string();
        self.names.record(NameComponent::Identifier(base.clone()));
        let args = self.decode_template_args();

        self.names = outer_names;
        self.types = outer_types;
        self.leave();

        let instance = NameComponent::Template { base, args };
        if record {
            self.names.record(instance.clone());
        }
        instance
    }

    /// Decode a template argument list up to and including its `@`
    pub(crate) fn decode_template_args(&mut self) -> Vec<TemplateArg> {
        let mut args = Vec::new();

        loop {
            let start = self.cursor.pos();
            match self.cursor.peek() {
                None => break,
                Some('@') => {
                    self.cursor.advance();
                    break;
                }
                Some('a'..='z') => break,
                Some(index @ '0'..='9') => {
                    self.cursor.advance();
                    let arg = match index
                        .to_digit(10)
                        .map(|i| self.names.resolve(i as usize))
                    {
                        Some(Ok(component)) => component.clone(),
                        _ => NameComponent::Unsupported(index.to_string()),
                    };
                    args.push(TemplateArg::NameBackref(arg));
                }
                Some('$') if self.cursor.consume("$0") => {
                    args.push(TemplateArg::Integer(self.cursor.read_number().unwrap_or(0)));
                }
                Some('$') if self.cursor.consume("$$C") => {
                    let cv = self.decode_cv().unwrap_or_default();
                    let ty = self.decode_type();
                    args.push(TemplateArg::Type(if cv.is_empty() {
                        ty
                    } else {
                        TypeNode::Qualified {
                            ty: Box::new(ty),
                            cv,
                        }
                    }));
                }
                Some('$') if self.cursor.consume("$$V") || self.cursor.consume("$$Z") => {}
                Some(_) => {
                    let ty = self.decode_type();
                    if self.cursor.pos() - start > 1 {
                        self.types.record(ty.clone());
                    }
                    args.push(TemplateArg::Type(ty));
                }
            }

            if self.cursor.pos() == start {
                break;
            }
        }

        args
    }

    /// Decode an optional cv code
    pub(crate) fn decode_cv(&mut self) -> Option<Cv> {
        let cv = Cv::from_code(self.cursor.peek()?)?;
        self.cursor.advance();
        Some(cv)
    }
}

#[cfg(test)]
mod tests {
    use crate::demangle::{
        parser::SymbolParser,
        types::{NameComponent, TemplateArg, TypeNode},
    };

    fn ident(name: &str) -> NameComponent {
        NameComponent::Identifier(name.to_string())
    }

    #[test]
    fn test_nested_name() {
        let mut parser = SymbolParser::new("Inner@Outer@@rest");
        let name = parser.decode_qualified_name();
        assert_eq!(name.components, vec![ident("Outer"), ident("Inner")]);
        assert_eq!(parser.cursor.rest(), "rest");
    }

    #[test]
    fn test_name_backref() {
        let mut parser = SymbolParser::new("A@B@1@");
        let name = parser.decode_qualified_name();
        assert_eq!(name.components, vec![ident("B"), ident("B"), ident("A")]);
    }

    #[test]
    fn test_unresolved_name_backref() {
        let mut parser = SymbolParser::new("5@");
        let name = parser.decode_qualified_name();
        assert_eq!(
            name.components,
            vec![NameComponent::Unsupported("5".to_string())]
        );
    }

    #[test]
    fn test_truncated_name() {
        let mut parser = SymbolParser::new("Foo");
        let name = parser.decode_qualified_name();
        assert_eq!(name.components, vec![ident("Foo")]);
        assert!(parser.cursor.at_end());
    }

    #[test]
    fn test_template() {
        let mut parser = SymbolParser::new("?$Foo@H@@");
        let name = parser.decode_qualified_name();
        assert_eq!(
            name.components,
            vec![NameComponent::Template {
                base: "Foo".to_string(),
                args: vec![TemplateArg::Type(TypeNode::Int)],
            }]
        );
        assert!(parser.cursor.at_end());
    }

    #[test]
    fn test_template_restores_tables() {
        let mut parser = SymbolParser::new("?$Foo@VBar@@@Baz@@");
        parser.decode_qualified_name();

        // Bar lives in the template's own table; the outer table sees the instance and Baz
        assert_eq!(parser.names.len(), 2);
        assert!(matches!(
            parser.names.resolve(0).unwrap(),
            NameComponent::Template { .. }
        ));
        assert_eq!(parser.names.resolve(1).unwrap(), &ident("Baz"));
        assert!(parser.types.is_empty());
    }

    #[test]
    fn test_function_template_name_not_recorded() {
        let mut parser = SymbolParser::new("?$max@H@std@@");
        let name = parser.decode_symbol_name();
        assert_eq!(name.to_string(), "std::max<int>");
        assert_eq!(parser.names.len(), 1);
        assert_eq!(parser.names.resolve(0).unwrap(), &ident("std"));
    }

    #[test]
    fn test_template_integer_args() {
        let mut parser = SymbolParser::new("?$Array@H$0BA@@@");
        let name = parser.decode_qualified_name();
        let NameComponent::Template { args, .. } = &name.components[0] else {
            panic!("expected a template");
        };
        assert_eq!(
            args,
            &vec![TemplateArg::Type(TypeNode::Int), TemplateArg::Integer(16)]
        );
    }

    #[test]
    fn test_template_integer_one() {
        let mut parser = SymbolParser::new("?$Array@H$00@@");
        let name = parser.decode_qualified_name();
        let NameComponent::Template { args, .. } = &name.components[0] else {
            panic!("expected a template");
        };
        assert_eq!(args[1], TemplateArg::Integer(1));
        assert_eq!(name.to_string(), "Array<int,1>");
    }

    #[test]
    fn test_lowercase_ends_template_args() {
        // `std` starts the enclosing namespace, not another argument
        let mut parser = SymbolParser::new("?$Foo@Hstd@@");
        let name = parser.decode_qualified_name();
        assert_eq!(name.to_string(), "std::Foo<int>");
        assert!(parser.cursor.at_end());
    }

    #[test]
    fn test_nested_symbol_scope() {
        let mut parser = SymbolParser::new("f@?1??g@@YAXXZ@4HA");
        let name = parser.decode_qualified_name();

        let [NameComponent::NestedSymbol(enclosing), NameComponent::LocalScope(2), inner] =
            name.components.as_slice()
        else {
            panic!("unexpected components {:?}", name.components);
        };
        assert_eq!(enclosing.raw, "?g@@YAXXZ");
        assert_eq!(enclosing.to_string(), "void __cdecl g(void)");
        assert_eq!(inner, &ident("f"));
        assert_eq!(parser.cursor.rest(), "4HA");

        // The enclosing function never lands in the outer table
        assert_eq!(parser.names.len(), 1);
    }

    #[test]
    fn test_deep_nested_symbols_terminate() {
        let symbol = format!("f@{}", "??f@".repeat(500));
        let mut parser = SymbolParser::new(&symbol);
        let name = parser.decode_qualified_name();
        assert!(parser.cursor.at_end());
        assert!(name.to_string().contains("UNK(depth)"));
    }

    #[test]
    fn test_anonymous_namespace() {
        let mut parser = SymbolParser::new("Foo@?A0x1234abcd@@");
        let name = parser.decode_qualified_name();
        assert_eq!(
            name.components,
            vec![NameComponent::AnonymousNamespace, ident("Foo")]
        );
    }

    #[test]
    fn test_deep_template_nesting_terminates() {
        let symbol = "?$A@".repeat(200);
        let mut parser = SymbolParser::new(&symbol);
        parser.decode_qualified_name();
        assert!(parser.cursor.at_end());
    }
}
