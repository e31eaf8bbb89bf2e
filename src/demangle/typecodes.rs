//! Type codes.
//!
//! A type is a single letter for most primitives, `_` plus a letter for the extended
//! primitives, or a prefix letter followed by nested productions for pointers, references,
//! named types and function pointers:
//!
//! ```text
//! <type> ::= <primitive>
//!        ::= _ <letter>                        # extended primitive
//!        ::= (P | Q | R | S) <indirection>     # pointer, pointer cv none/const/volatile/cv
//!        ::= (A | B) <indirection>             # reference, none/volatile
//!        ::= $$Q <indirection> | $$R <indirection>
//!        ::= $$A6 <function> | $$A <type> | $$B <type> | $$T
//!        ::= (T | U | V) <qualified-name>      # union, struct, class
//!        ::= W4 <qualified-name>               # enum
//!        ::= ? <cv> <type>
//!        ::= <digit>                           # type backreference
//!
//! <indirection> ::= E* [F | I]* 6 <calling-convention> <return-type> <params>
//!               ::= E* [F | I]* [<cv>] <type>
//! ```

use crate::demangle::{
    parser::SymbolParser,
    types::{Cv, Indirection, NameComponent, TypeNode},
};

impl SymbolParser<'_> {
    /// Decode one type
    ///
    /// Every call nests one level deeper; past the recursion limit the rest of the input
    /// is dropped and a placeholder returned.
    pub fn decode_type(&mut self) -> TypeNode {
        if let Err(e) = self.enter() {
            log::debug!("{e} decoding type in {:?}", self.cursor.rest());
            self.cursor.skip_to_end();
            return TypeNode::Unsupported("UNK(depth)".to_string());
        }

        let ty = self.decode_type_code();
        self.leave();
        ty
    }

    fn decode_type_code(&mut self) -> TypeNode {
        if self.cursor.rest().starts_with("?$") {
            return self.decode_template_type();
        }

        let Some(code) = self.cursor.advance() else {
            return TypeNode::Unsupported("UNKNOWN".to_string());
        };

        match code {
            'X' => TypeNode::Void,
            'C' => TypeNode::SChar,
            'D' => TypeNode::Char,
            'E' => TypeNode::UChar,
            'F' => TypeNode::Short,
            'G' => TypeNode::UShort,
            'H' => TypeNode::Int,
            'I' => TypeNode::UInt,
            'J' => TypeNode::Long,
            'K' => TypeNode::ULong,
            'M' => TypeNode::Float,
            'N' => TypeNode::Double,
            'O' => TypeNode::LongDouble,
            '_' => self.decode_extended_type(),
            'P' => self.decode_indirection(Indirection::Pointer, Cv::empty()),
            'Q' => self.decode_indirection(Indirection::Pointer, Cv::CONST),
            'R' => self.decode_indirection(Indirection::Pointer, Cv::VOLATILE),
            'S' => self.decode_indirection(Indirection::Pointer, Cv::CONST | Cv::VOLATILE),
            'A' => self.decode_indirection(Indirection::Reference, Cv::empty()),
            'B' => self.decode_indirection(Indirection::Reference, Cv::VOLATILE),
            'T' => TypeNode::Union {
                name: self.decode_qualified_name(),
            },
            'U' => TypeNode::Struct {
                name: self.decode_qualified_name(),
            },
            'V' => TypeNode::Class {
                name: self.decode_qualified_name(),
            },
            'W' => {
                if self.cursor.consume_char('4') {
                    TypeNode::Enum {
                        name: self.decode_qualified_name(),
                    }
                } else {
                    TypeNode::WChar
                }
            }
            '?' => {
                let cv = self.decode_cv().unwrap_or_default();
                let ty = self.decode_type();
                if cv.is_empty() {
                    ty
                } else {
                    TypeNode::Qualified {
                        ty: Box::new(ty),
                        cv,
                    }
                }
            }
            '$' => self.decode_dollar_type(),
            '0'..='9' => self.resolve_type_backref(code),
            other => TypeNode::Unsupported(self.placeholder(&other.to_string())),
        }
    }

    /// `_` followed by the extended primitive letter
    fn decode_extended_type(&mut self) -> TypeNode {
        match self.cursor.advance() {
            Some('N') => TypeNode::Bool,
            Some('J') => TypeNode::Int64,
            Some('K') => TypeNode::UInt64,
            Some('W') => TypeNode::WChar,
            Some('Q') => TypeNode::Char8,
            Some('S') => TypeNode::Char16,
            Some('U') => TypeNode::Char32,
            Some(other) => TypeNode::Unsupported(self.placeholder(&format!("_{other}"))),
            None => TypeNode::Unsupported(self.placeholder("_")),
        }
    }

    /// `$`-prefixed types: rvalue references, `std::nullptr_t` and function/array forms
    fn decode_dollar_type(&mut self) -> TypeNode {
        if self.cursor.consume("$Q") {
            self.decode_indirection(Indirection::RValueReference, Cv::empty())
        } else if self.cursor.consume("$R") {
            self.decode_indirection(Indirection::RValueReference, Cv::VOLATILE)
        } else if self.cursor.consume("$T") {
            TypeNode::Nullptr
        } else if self.cursor.consume("$A6") {
            self.decode_function_pointer(Indirection::Pointer, Cv::empty())
        } else if self.cursor.consume("$A") || self.cursor.consume("$B") {
            self.decode_type()
        } else {
            let code = self.cursor.peek().map(String::from).unwrap_or_default();
            self.cursor.advance();
            TypeNode::Unsupported(self.placeholder(&format!("${code}")))
        }
    }

    /// A template instantiation in type position
    fn decode_template_type(&mut self) -> TypeNode {
        let name = self.decode_qualified_name();
        match name.components.as_slice() {
            [NameComponent::Template { base, args }] => TypeNode::TemplateInstance {
                base: base.clone(),
                args: args.clone(),
            },
            _ => TypeNode::Class { name },
        }
    }

    /// Decode the pointee or referent that follows an indirection prefix
    fn decode_indirection(&mut self, kind: Indirection, cv: Cv) -> TypeNode {
        let mut is64 = false;
        while self.cursor.consume_char('E') {
            is64 = true;
        }
        while matches!(self.cursor.peek(), Some('F' | 'I')) {
            self.cursor.advance();
        }

        if self.cursor.consume_char('6') {
            return self.decode_function_pointer(kind, cv);
        }

        let pointee_cv = self.decode_cv().unwrap_or_default();
        let pointee = self.decode_type();
        let to = Box::new(if pointee_cv.is_empty() {
            pointee
        } else {
            TypeNode::Qualified {
                ty: Box::new(pointee),
                cv: pointee_cv,
            }
        });

        match kind {
            Indirection::Pointer => TypeNode::Pointer { to, cv, is64 },
            Indirection::Reference => TypeNode::Reference { to, cv, is64 },
            Indirection::RValueReference => TypeNode::RValueReference { to, cv, is64 },
        }
    }

    /// Decode a function pointer or reference type, `6` already consumed
    fn decode_function_pointer(&mut self, kind: Indirection, cv: Cv) -> TypeNode {
        let conv = self.decode_calling_convention();
        let ret = if self.cursor.consume_char('@') {
            TypeNode::Void
        } else {
            self.decode_type()
        };
        let (params, is_variadic) = self.decode_param_list();

        TypeNode::FunctionPointer {
            kind,
            cv,
            conv,
            ret: Box::new(ret),
            params,
            is_variadic,
        }
    }

    /// Resolve a type backreference digit against the current type table
    fn resolve_type_backref(&mut self, digit: char) -> TypeNode {
        let index = digit.to_digit(10).unwrap_or_default() as usize;
        match self.types.resolve(index) {
            Ok(ty) => ty.clone(),
            Err(e) => {
                log::debug!("{e} in {:?}", self.cursor.rest());
                TypeNode::Unsupported(digit.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::demangle::{
        parser::SymbolParser,
        types::{CallingConvention, Cv, Indirection, TemplateArg, TypeNode},
    };

    fn decode(code: &str) -> TypeNode {
        SymbolParser::new(code).decode_type()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(decode("X"), TypeNode::Void);
        assert_eq!(decode("H"), TypeNode::Int);
        assert_eq!(decode("N"), TypeNode::Double);
        assert_eq!(decode("_N"), TypeNode::Bool);
        assert_eq!(decode("_J"), TypeNode::Int64);
        assert_eq!(decode("_W"), TypeNode::WChar);
        assert_eq!(decode("W"), TypeNode::WChar);
        assert_eq!(decode("$$T"), TypeNode::Nullptr);
    }

    #[test]
    fn test_pointer_to_const() {
        assert_eq!(
            decode("PEBD"),
            TypeNode::Pointer {
                to: Box::new(TypeNode::Qualified {
                    ty: Box::new(TypeNode::Char),
                    cv: Cv::CONST,
                }),
                cv: Cv::empty(),
                is64: true,
            }
        );
    }

    #[test]
    fn test_const_pointer() {
        let TypeNode::Pointer { cv, is64, .. } = decode("QEAH") else {
            panic!("expected a pointer");
        };
        assert_eq!(cv, Cv::CONST);
        assert!(is64);
    }

    #[test]
    fn test_references() {
        assert!(matches!(decode("AEAH"), TypeNode::Reference { .. }));
        assert!(matches!(
            decode("$$QEAH"),
            TypeNode::RValueReference { cv, .. } if cv.is_empty()
        ));
        assert!(matches!(
            decode("$$REAH"),
            TypeNode::RValueReference { cv, .. } if cv == Cv::VOLATILE
        ));
    }

    #[test]
    fn test_named_types() {
        let TypeNode::Class { name } = decode("VFoo@Bar@@") else {
            panic!("expected a class");
        };
        assert_eq!(name.to_string(), "Bar::Foo");
        assert!(matches!(decode("W4Color@@"), TypeNode::Enum { .. }));
        assert!(matches!(decode("UPoint@@"), TypeNode::Struct { .. }));
        assert!(matches!(decode("TValue@@"), TypeNode::Union { .. }));
    }

    #[test]
    fn test_function_pointer() {
        let TypeNode::FunctionPointer {
            conv, ret, params, ..
        } = decode("P6AHH@Z")
        else {
            panic!("expected a function pointer");
        };
        assert_eq!(conv, CallingConvention::Cdecl);
        assert_eq!(*ret, TypeNode::Int);
        assert_eq!(params, vec![TypeNode::Int]);
    }

    #[test]
    fn test_function_reference() {
        let ty = decode("A6AHH@Z");
        let TypeNode::FunctionPointer { kind, cv, .. } = &ty else {
            panic!("expected a function reference");
        };
        assert_eq!(*kind, Indirection::Reference);
        assert!(cv.is_empty());
        assert_eq!(ty.to_string(), "int (__cdecl&)(int)");

        let ty = decode("Q6AXXZ");
        assert!(matches!(
            ty,
            TypeNode::FunctionPointer {
                kind: Indirection::Pointer,
                cv,
                ..
            } if cv == Cv::CONST
        ));
        assert_eq!(ty.to_string(), "void (__cdecl*const)(void)");
    }

    #[test]
    fn test_template_type() {
        assert_eq!(
            decode("?$Foo@H@@"),
            TypeNode::TemplateInstance {
                base: "Foo".to_string(),
                args: vec![TemplateArg::Type(TypeNode::Int)],
            }
        );
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(decode(""), TypeNode::Unsupported("UNKNOWN".to_string()));
        assert_eq!(decode("L"), TypeNode::Unsupported("UNK(L)".to_string()));
        assert_eq!(decode("3"), TypeNode::Unsupported("3".to_string()));
        assert!(decode("PEA").has_placeholder());
    }

    #[test]
    fn test_recursion_limit() {
        let code = "PEA".repeat(500) + "H";
        let mut parser = SymbolParser::new(&code);
        let ty = parser.decode_type();
        assert!(ty.has_placeholder());
        assert!(parser.cursor.at_end());
    }
}
