use crate::{
    demangle::{
        cursor::Cursor,
        tables::{NameTable, TypeTable},
        types::{
            CallingConvention, Cv, DeclKind, DecodedSymbol, NameComponent, Operator,
            OperatorName, QualifiedName, Scope, Signature, SpecialName, TableKind, TypeNode,
        },
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum nesting depth of types and templates
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Decoder for a single decorated symbol
///
/// The parser owns the [`Cursor`] and both substitution tables for the duration of one
/// decode. Every production is infallible: unhandled codes become placeholders threaded
/// into the result, so [`SymbolParser::parse`] always produces a [`DecodedSymbol`].
///
/// # Example
///
/// ```rust
/// use undname::demangle::SymbolParser;
/// let symbol = SymbolParser::new("?Foo@@YAHH@Z").parse();
/// assert_eq!(symbol.to_string(), "int __cdecl Foo(int)");
/// ```
///
/// ## Notes:
/// - The parser is consumed by [`SymbolParser::parse`]; tables never leak from one symbol
///   into the next.
/// - The type table is scoped. The return type is decoded against one table, then the
///   parameter list starts over with an empty one while the name table carries on.
pub struct SymbolParser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) names: NameTable,
    pub(crate) types: TypeTable,
    depth: usize,
}

impl<'a> SymbolParser<'a> {
    /// Create a new `SymbolParser` for `symbol`
    ///
    /// ## Arguments
    /// * 'symbol' - The decorated name to decode
    #[must_use]
    pub fn new(symbol: &'a str) -> Self {
        SymbolParser {
            cursor: Cursor::new(symbol),
            names: NameTable::default(),
            types: TypeTable::default(),
            depth: 0,
        }
    }

    /// Decode the whole symbol
    #[must_use]
    pub fn parse(mut self) -> DecodedSymbol {
        let raw = self.cursor.rest().to_string();
        log::trace!("decoding {raw}");

        if !raw.starts_with('?') {
            return DecodedSymbol {
                raw,
                decl: DeclKind::Undecorated,
                qualified_name: QualifiedName::default(),
            };
        }

        let (decl, qualified_name) = self.decode_symbol_body();
        DecodedSymbol {
            raw,
            decl,
            qualified_name,
        }
    }

    /// Decode a decorated symbol starting at its leading `?`
    ///
    /// Shared by [`SymbolParser::parse`] and by nested symbols inside a name chain. The
    /// caller owns the tables, this only reads through them.
    pub(crate) fn decode_symbol_body(&mut self) -> (DeclKind, QualifiedName) {
        // `?$` at the very start is a bare template name; the component decoder wants to
        // see the `?` itself
        if !self.cursor.rest().starts_with("?$") {
            self.cursor.consume_char('?');
        }

        let special = if self.cursor.peek() == Some('?') && self.cursor.peek_at(1) != Some('$')
        {
            self.cursor.advance();
            Some(self.decode_special_name())
        } else {
            None
        };

        match special {
            Some(special) => {
                let class = self.decode_qualified_name();
                self.decode_special_member(special, class)
            }
            None => {
                let name = self.decode_symbol_name();
                let decl = self.decode_declaration(false);
                (decl, name)
            }
        }
    }

    /// Enter one level of type or template nesting
    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        self.depth += 1;
        Ok(())
    }

    /// Leave a level entered with [`SymbolParser::enter`]
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Build the placeholder for an unhandled code
    pub(crate) fn placeholder(&self, code: &str) -> String {
        log::debug!(
            "unsupported production '{code}' at offset {} of {:?}",
            self.cursor.pos(),
            self.cursor.rest()
        );
        format!("UNK({code})")
    }

    /// Decode the special-member code following `??`
    fn decode_special_name(&mut self) -> SpecialName {
        match self.cursor.advance() {
            Some('0') => SpecialName::Constructor,
            Some('1') => SpecialName::Destructor,
            Some('B') => SpecialName::Conversion,
            Some('_') => match self.cursor.advance() {
                Some('7') => SpecialName::Table(TableKind::VFTable),
                Some('8') => SpecialName::Table(TableKind::VBTable),
                Some(code) => match Operator::from_extended_code(code) {
                    Some(op) => SpecialName::Operator(op),
                    None => SpecialName::Unsupported(self.placeholder(&format!("_{code}"))),
                },
                None => SpecialName::Unsupported(self.placeholder("_")),
            },
            Some(code) => match Operator::from_code(code) {
                Some(op) => SpecialName::Operator(op),
                None => SpecialName::Unsupported(self.placeholder(&code.to_string())),
            },
            None => SpecialName::Unsupported(self.placeholder("")),
        }
    }

    /// Decode what follows the class name of a special member and assemble its name
    fn decode_special_member(
        &mut self,
        special: SpecialName,
        class: QualifiedName,
    ) -> (DeclKind, QualifiedName) {
        let class_component = class
            .last()
            .cloned()
            .unwrap_or(NameComponent::Identifier(String::new()));

        match special {
            SpecialName::Constructor => {
                let name = class.join(class_component);
                let decl = match self.decode_declaration(true) {
                    DeclKind::Function(sig) => DeclKind::Constructor { class, sig },
                    other => other,
                };
                (decl, name)
            }
            SpecialName::Destructor => {
                let name = class.join(NameComponent::Identifier(format!("~{class_component}")));
                let decl = match self.decode_declaration(true) {
                    DeclKind::Function(sig) => DeclKind::Destructor { class, sig },
                    other => other,
                };
                (decl, name)
            }
            SpecialName::Operator(op) => {
                let name = class.join(NameComponent::Identifier(op.to_string()));
                let decl = match self.decode_declaration(false) {
                    DeclKind::Function(sig) => DeclKind::Operator {
                        class,
                        op: OperatorName::Named(op),
                        sig,
                    },
                    other => other,
                };
                (decl, name)
            }
            SpecialName::Conversion => match self.decode_declaration(false) {
                DeclKind::Function(mut sig) => {
                    let target = sig.ret.take().unwrap_or(TypeNode::Void);
                    let name =
                        class.join(NameComponent::Identifier(format!("operator {target}")));
                    let decl = DeclKind::Operator {
                        class,
                        op: OperatorName::Conversion(target),
                        sig,
                    };
                    (decl, name)
                }
                other => (
                    other,
                    class.join(NameComponent::Identifier("operator".to_string())),
                ),
            },
            SpecialName::Table(kind) => {
                let name = class.join(NameComponent::Identifier(kind.to_string()));
                let decl = self.decode_special_table(class, kind);
                (decl, name)
            }
            SpecialName::Unsupported(text) => {
                let name = class.join(NameComponent::Unsupported(text.clone()));
                let decl = match self.decode_declaration(false) {
                    DeclKind::Function(sig) => DeclKind::Operator {
                        class,
                        op: OperatorName::Unsupported(text),
                        sig,
                    },
                    other => other,
                };
                (decl, name)
            }
        }
    }

    /// Dispatch on the code following the qualified name
    fn decode_declaration(&mut self, structor: bool) -> DeclKind {
        match self.cursor.peek() {
            None => DeclKind::NameOnly,
            Some('0'..='4') => self.decode_data(),
            Some(_) => self.decode_function(structor),
        }
    }

    /// Decode a function type: class code, `this` qualifiers, calling convention, return
    /// type and parameters
    fn decode_function(&mut self, structor: bool) -> DeclKind {
        let Some(code) = self.cursor.advance() else {
            return DeclKind::NameOnly;
        };
        let Some(scope) = Scope::from_class_code(code) else {
            return DeclKind::Unsupported(self.placeholder(&code.to_string()));
        };

        let mut is64 = false;
        let mut this_cv = Cv::empty();
        if scope.is_member() && !scope.is_static() {
            while self.cursor.consume_char('E') {
                is64 = true;
            }
            if let Some(cv) = self.cursor.peek().and_then(Cv::from_code) {
                self.cursor.advance();
                this_cv = cv;
            }
        }

        let conv = self.decode_calling_convention();

        let ret = if structor {
            self.cursor.consume_char('@');
            None
        } else {
            self.decode_return_type()
        };

        self.begin_parameter_scope();
        let (params, is_variadic) = self.decode_param_list();

        DeclKind::Function(Signature {
            scope,
            this_cv,
            is64,
            conv,
            ret,
            params,
            is_variadic,
        })
    }

    /// Decode a calling convention code
    pub(crate) fn decode_calling_convention(&mut self) -> CallingConvention {
        match self.cursor.advance() {
            Some(code) => {
                let conv = CallingConvention::from_code(code);
                if let CallingConvention::Unknown(text) = &conv {
                    log::debug!("unknown calling convention '{text}' in {:?}", self.cursor.rest());
                }
                conv
            }
            None => CallingConvention::Unknown(String::new()),
        }
    }

    /// Decode the return type, recording it in the return-scope type table
    ///
    /// `@` in return position means there is no return type.
    pub(crate) fn decode_return_type(&mut self) -> Option<TypeNode> {
        if self.cursor.consume_char('@') {
            return None;
        }

        Some(self.decode_recorded_type())
    }

    /// Start the parameter list with a fresh type table
    ///
    /// Types recorded while decoding the return type are dropped here, a backreference
    /// inside the parameter list never resolves to one of them.
    fn begin_parameter_scope(&mut self) {
        self.types = TypeTable::default();
    }

    /// Decode a parameter list including its throw specification
    ///
    /// ```text
    /// <params> ::= X Z            # (void)
    ///          ::= <type>+ @ Z    # (a, b)
    ///          ::= <type>* Z Z    # (a, b, ...)
    /// ```
    pub(crate) fn decode_param_list(&mut self) -> (Vec<TypeNode>, bool) {
        let mut params = Vec::new();

        if self.cursor.consume_char('X') {
            self.cursor.consume_char('Z');
            return (params, false);
        }

        loop {
            match self.cursor.peek() {
                None => return (params, false),
                Some('@') => {
                    self.cursor.advance();
                    self.cursor.consume_char('Z');
                    return (params, false);
                }
                Some('Z') => {
                    self.cursor.advance();
                    self.cursor.consume_char('Z');
                    return (params, true);
                }
                Some(_) => {}
            }

            let start = self.cursor.pos();
            params.push(self.decode_recorded_type());
            if self.cursor.pos() == start {
                return (params, false);
            }
        }
    }

    /// Decode a type and record it in the current type table
    ///
    /// Only types spelled with more than one character are recorded; single-letter
    /// primitives and backreference digits never are.
    fn decode_recorded_type(&mut self) -> TypeNode {
        let start = self.cursor.pos();
        let ty = self.decode_type();
        if self.cursor.pos() - start > 1 {
            self.types.record(ty.clone());
        }
        ty
    }

    /// Decode a data symbol: storage digit, type, pointer markers and qualifiers
    fn decode_data(&mut self) -> DeclKind {
        let scope = self
            .cursor
            .advance()
            .and_then(Scope::from_storage_code)
            .unwrap_or(Scope::GLOBAL);

        let ty = self.decode_type();

        let mut is64 = false;
        while self.cursor.consume_char('E') {
            is64 = true;
        }
        let cv = match self.cursor.peek().and_then(Cv::from_code) {
            Some(cv) => {
                self.cursor.advance();
                cv
            }
            None => Cv::empty(),
        };

        DeclKind::Data {
            scope,
            ty,
            cv,
            is64,
        }
    }

    /// Decode the tail of a vftable / vbtable symbol
    ///
    /// ```text
    /// <table> ::= (6 | 7) <cv> <qualified-name>* @
    /// ```
    fn decode_special_table(&mut self, class: QualifiedName, kind: TableKind) -> DeclKind {
        self.cursor.advance();

        let cv = match self.cursor.peek().and_then(Cv::from_code) {
            Some(cv) => {
                self.cursor.advance();
                cv
            }
            None => Cv::CONST,
        };

        let mut bases = Vec::new();
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
            bases.push(self.decode_qualified_name());
            if self.cursor.pos() == start {
                break;
            }
        }

        DeclKind::SpecialTable {
            class,
            kind,
            cv,
            bases,
        }
    }
}
