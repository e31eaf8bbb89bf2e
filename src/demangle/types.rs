use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// `const` / `volatile` qualification of a type, a pointer or a member function
    pub struct Cv: u8 {
        /// const
        const CONST = 0x01;
        /// volatile
        const VOLATILE = 0x02;
    }
}

impl Cv {
    /// Decode a cv code (`A` none, `B` const, `C` volatile, `D` const volatile)
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Cv::empty()),
            'B' => Some(Cv::CONST),
            'C' => Some(Cv::VOLATILE),
            'D' => Some(Cv::CONST | Cv::VOLATILE),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Access and storage of a decoded function or data symbol
    pub struct Scope: u8 {
        /// Private member
        const PRIVATE = 0x01;
        /// Protected member
        const PROTECTED = 0x02;
        /// Public member
        const PUBLIC = 0x04;
        /// Free function or global data, no access specifier
        const GLOBAL = 0x08;
        /// Static member
        const STATIC = 0x10;
        /// Virtual member function
        const VIRTUAL = 0x20;
        /// Far call (16-bit legacy), carried along but never rendered
        const FAR = 0x40;
    }
}

impl Scope {
    /// Decode the function class code that follows the name of a function symbol
    #[must_use]
    pub fn from_class_code(code: char) -> Option<Self> {
        Some(match code {
            'A' => Scope::PRIVATE,
            'B' => Scope::PRIVATE | Scope::FAR,
            'C' | 'D' => Scope::PRIVATE | Scope::STATIC,
            'E' | 'F' => Scope::PRIVATE | Scope::VIRTUAL,
            'I' => Scope::PROTECTED,
            'J' => Scope::PROTECTED | Scope::FAR,
            'K' | 'L' => Scope::PROTECTED | Scope::STATIC,
            'M' | 'N' => Scope::PROTECTED | Scope::VIRTUAL,
            'Q' => Scope::PUBLIC,
            'R' => Scope::PUBLIC | Scope::FAR,
            'S' | 'T' => Scope::PUBLIC | Scope::STATIC,
            'U' | 'V' => Scope::PUBLIC | Scope::VIRTUAL,
            'Y' => Scope::GLOBAL,
            'Z' => Scope::GLOBAL | Scope::FAR,
            _ => return None,
        })
    }

    /// Decode the storage digit that follows the name of a data symbol
    #[must_use]
    pub fn from_storage_code(code: char) -> Option<Self> {
        Some(match code {
            '0' => Scope::PRIVATE | Scope::STATIC,
            '1' => Scope::PROTECTED | Scope::STATIC,
            '2' => Scope::PUBLIC | Scope::STATIC,
            '3' | '4' => Scope::GLOBAL,
            _ => return None,
        })
    }

    /// The access specifier, `None` for free functions and global data
    #[must_use]
    pub fn access(self) -> Option<Access> {
        if self.contains(Scope::PUBLIC) {
            Some(Access::Public)
        } else if self.contains(Scope::PROTECTED) {
            Some(Access::Protected)
        } else if self.contains(Scope::PRIVATE) {
            Some(Access::Private)
        } else {
            None
        }
    }

    /// Static member
    #[must_use]
    pub fn is_static(self) -> bool {
        self.contains(Scope::STATIC)
    }

    /// Virtual member function
    #[must_use]
    pub fn is_virtual(self) -> bool {
        self.contains(Scope::VIRTUAL)
    }

    /// Member of a class, as opposed to a free function or global
    #[must_use]
    pub fn is_member(self) -> bool {
        !self.contains(Scope::GLOBAL)
    }
}

/// C++ member access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Access {
    /// private
    #[strum(to_string = "private")]
    Private,
    /// protected
    #[strum(to_string = "protected")]
    Protected,
    /// public
    #[strum(to_string = "public")]
    Public,
}

/// Calling convention of a function or function pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    /// __cdecl, also used for every x64 function
    Cdecl,
    /// __pascal
    Pascal,
    /// __thiscall
    Thiscall,
    /// __stdcall
    Stdcall,
    /// __fastcall
    Fastcall,
    /// __clrcall
    Clrcall,
    /// __vectorcall
    Vectorcall,
    /// Unrecognized code, kept verbatim
    Unknown(String),
}

impl CallingConvention {
    /// Decode a calling convention code
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            'A' | 'B' => CallingConvention::Cdecl,
            'C' | 'D' => CallingConvention::Pascal,
            'E' | 'F' => CallingConvention::Thiscall,
            'G' | 'H' => CallingConvention::Stdcall,
            'I' | 'J' => CallingConvention::Fastcall,
            'M' | 'N' => CallingConvention::Clrcall,
            'Q' => CallingConvention::Vectorcall,
            other => CallingConvention::Unknown(other.to_string()),
        }
    }
}

/// Named operators and compiler-generated special functions
///
/// The `Display` form is the name as it appears in a rendered declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[allow(missing_docs)]
pub enum Operator {
    #[strum(to_string = "operator new")]
    New,
    #[strum(to_string = "operator delete")]
    Delete,
    #[strum(to_string = "operator=")]
    Assign,
    #[strum(to_string = "operator>>")]
    ShiftRight,
    #[strum(to_string = "operator<<")]
    ShiftLeft,
    #[strum(to_string = "operator!")]
    LogicalNot,
    #[strum(to_string = "operator==")]
    Equal,
    #[strum(to_string = "operator!=")]
    NotEqual,
    #[strum(to_string = "operator[]")]
    Subscript,
    #[strum(to_string = "operator->")]
    Arrow,
    #[strum(to_string = "operator*")]
    Star,
    #[strum(to_string = "operator++")]
    Increment,
    #[strum(to_string = "operator--")]
    Decrement,
    #[strum(to_string = "operator-")]
    Minus,
    #[strum(to_string = "operator+")]
    Plus,
    #[strum(to_string = "operator&")]
    BitAnd,
    #[strum(to_string = "operator->*")]
    ArrowStar,
    #[strum(to_string = "operator/")]
    Divide,
    #[strum(to_string = "operator%")]
    Modulo,
    #[strum(to_string = "operator<")]
    Less,
    #[strum(to_string = "operator<=")]
    LessEqual,
    #[strum(to_string = "operator>")]
    Greater,
    #[strum(to_string = "operator>=")]
    GreaterEqual,
    #[strum(to_string = "operator,")]
    Comma,
    #[strum(to_string = "operator()")]
    Call,
    #[strum(to_string = "operator~")]
    BitNot,
    #[strum(to_string = "operator^")]
    BitXor,
    #[strum(to_string = "operator|")]
    BitOr,
    #[strum(to_string = "operator&&")]
    LogicalAnd,
    #[strum(to_string = "operator||")]
    LogicalOr,
    #[strum(to_string = "operator*=")]
    MultiplyAssign,
    #[strum(to_string = "operator+=")]
    PlusAssign,
    #[strum(to_string = "operator-=")]
    MinusAssign,
    #[strum(to_string = "operator/=")]
    DivideAssign,
    #[strum(to_string = "operator%=")]
    ModuloAssign,
    #[strum(to_string = "operator>>=")]
    ShiftRightAssign,
    #[strum(to_string = "operator<<=")]
    ShiftLeftAssign,
    #[strum(to_string = "operator&=")]
    BitAndAssign,
    #[strum(to_string = "operator|=")]
    BitOrAssign,
    #[strum(to_string = "operator^=")]
    BitXorAssign,
    #[strum(to_string = "`vcall'")]
    VCall,
    #[strum(to_string = "`vbase destructor'")]
    VBaseDestructor,
    #[strum(to_string = "`vector deleting destructor'")]
    VectorDeletingDestructor,
    #[strum(to_string = "`default constructor closure'")]
    DefaultCtorClosure,
    #[strum(to_string = "`scalar deleting destructor'")]
    ScalarDeletingDestructor,
    #[strum(to_string = "`vector constructor iterator'")]
    VectorCtorIterator,
    #[strum(to_string = "`vector destructor iterator'")]
    VectorDtorIterator,
    #[strum(to_string = "`copy constructor closure'")]
    CopyCtorClosure,
    #[strum(to_string = "operator new[]")]
    NewArray,
    #[strum(to_string = "operator delete[]")]
    DeleteArray,
}

impl Operator {
    /// Decode a single-character operator code (`2`..`Z`, without `B`)
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            '2' => Operator::New,
            '3' => Operator::Delete,
            '4' => Operator::Assign,
            '5' => Operator::ShiftRight,
            '6' => Operator::ShiftLeft,
            '7' => Operator::LogicalNot,
            '8' => Operator::Equal,
            '9' => Operator::NotEqual,
            'A' => Operator::Subscript,
            'C' => Operator::Arrow,
            'D' => Operator::Star,
            'E' => Operator::Increment,
            'F' => Operator::Decrement,
            'G' => Operator::Minus,
            'H' => Operator::Plus,
            'I' => Operator::BitAnd,
            'J' => Operator::ArrowStar,
            'K' => Operator::Divide,
            'L' => Operator::Modulo,
            'M' => Operator::Less,
            'N' => Operator::LessEqual,
            'O' => Operator::Greater,
            'P' => Operator::GreaterEqual,
            'Q' => Operator::Comma,
            'R' => Operator::Call,
            'S' => Operator::BitNot,
            'T' => Operator::BitXor,
            'U' => Operator::BitOr,
            'V' => Operator::LogicalAnd,
            'W' => Operator::LogicalOr,
            'X' => Operator::MultiplyAssign,
            'Y' => Operator::PlusAssign,
            'Z' => Operator::MinusAssign,
            _ => return None,
        })
    }

    /// Decode an underscore-prefixed operator code (the character after `_`)
    #[must_use]
    pub fn from_extended_code(code: char) -> Option<Self> {
        Some(match code {
            '0' => Operator::DivideAssign,
            '1' => Operator::ModuloAssign,
            '2' => Operator::ShiftRightAssign,
            '3' => Operator::ShiftLeftAssign,
            '4' => Operator::BitAndAssign,
            '5' => Operator::BitOrAssign,
            '6' => Operator::BitXorAssign,
            '9' => Operator::VCall,
            'D' => Operator::VBaseDestructor,
            'E' => Operator::VectorDeletingDestructor,
            'F' => Operator::DefaultCtorClosure,
            'G' => Operator::ScalarDeletingDestructor,
            'H' => Operator::VectorCtorIterator,
            'I' => Operator::VectorDtorIterator,
            'O' => Operator::CopyCtorClosure,
            'U' => Operator::NewArray,
            'V' => Operator::DeleteArray,
            _ => return None,
        })
    }
}

/// Compiler-generated dispatch tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TableKind {
    /// Virtual function table
    #[strum(to_string = "`vftable'")]
    VFTable,
    /// Virtual base table
    #[strum(to_string = "`vbtable'")]
    VBTable,
}

/// The flavor of an indirection prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Indirection {
    /// `P`, `Q`, `R`, `S`
    #[strum(to_string = "*")]
    Pointer,
    /// `A`, `B`
    #[strum(to_string = "&")]
    Reference,
    /// `$$Q`, `$$R`
    #[strum(to_string = "&&")]
    RValueReference,
}

/// The special-member code that follows `??`
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialName {
    /// `0`
    Constructor,
    /// `1`
    Destructor,
    /// Any named operator or closure
    Operator(Operator),
    /// `B`, the target type is the return type of the signature
    Conversion,
    /// `_7` / `_8`
    Table(TableKind),
    /// A special code this decoder does not handle
    Unsupported(String),
}

/// One component of a qualified name
#[derive(Debug, Clone, PartialEq)]
pub enum NameComponent {
    /// A plain identifier
    Identifier(String),
    /// A template instantiation, `base<args>`
    Template {
        /// Name of the template
        base: String,
        /// Arguments of the instantiation
        args: Vec<TemplateArg>,
    },
    /// `anonymous namespace'
    AnonymousNamespace,
    /// A numbered local scope, `n'
    LocalScope(i64),
    /// The function enclosing a function-local entity, `` `void __cdecl f(void)' ``
    NestedSymbol(Box<DecodedSymbol>),
    /// A component this decoder does not handle, kept as placeholder text
    Unsupported(String),
}

/// A `::` separated name, stored outermost scope first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualifiedName {
    /// The components, outermost first
    pub components: Vec<NameComponent>,
}

impl QualifiedName {
    /// Create a qualified name from components ordered outermost first
    #[must_use]
    pub fn new(components: Vec<NameComponent>) -> Self {
        QualifiedName { components }
    }

    /// Returns `true` if the name has no components
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The innermost (unqualified) component
    #[must_use]
    pub fn last(&self) -> Option<&NameComponent> {
        self.components.last()
    }

    /// The enclosing scope, i.e. every component but the last
    #[must_use]
    pub fn scope(&self) -> QualifiedName {
        let len = self.components.len().saturating_sub(1);
        QualifiedName::new(self.components[..len].to_vec())
    }

    /// A copy of this name with `component` appended as the new innermost component
    #[must_use]
    pub fn join(&self, component: NameComponent) -> QualifiedName {
        let mut components = self.components.clone();
        components.push(component);
        QualifiedName::new(components)
    }
}

/// One argument of a template instantiation
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateArg {
    /// A type argument
    Type(TypeNode),
    /// A name resolved through the name backreference table
    NameBackref(NameComponent),
    /// An integral non-type argument
    Integer(i64),
}

/// A decoded type
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum TypeNode {
    Void,
    Bool,
    SChar,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Int64,
    UInt64,
    Float,
    Double,
    LongDouble,
    WChar,
    Char8,
    Char16,
    Char32,
    Nullptr,
    /// A cv-qualified type, `int const`
    Qualified { ty: Box<TypeNode>, cv: Cv },
    /// `to *`, `cv` qualifies the pointer itself
    Pointer {
        to: Box<TypeNode>,
        cv: Cv,
        is64: bool,
    },
    /// `to &`
    Reference {
        to: Box<TypeNode>,
        cv: Cv,
        is64: bool,
    },
    /// `to &&`
    RValueReference {
        to: Box<TypeNode>,
        cv: Cv,
        is64: bool,
    },
    Class { name: QualifiedName },
    Struct { name: QualifiedName },
    Union { name: QualifiedName },
    Enum { name: QualifiedName },
    /// A bare template instantiation used as a type
    TemplateInstance {
        base: String,
        args: Vec<TemplateArg>,
    },
    /// `ret (conv*)(params)`, or `(conv&)` when `kind` is a reference
    FunctionPointer {
        kind: Indirection,
        cv: Cv,
        conv: CallingConvention,
        ret: Box<TypeNode>,
        params: Vec<TypeNode>,
        is_variadic: bool,
    },
    /// An unhandled production, `UNK(code)`, or an unresolved backreference digit
    Unsupported(String),
}

impl TypeNode {
    /// Returns `true` if this node, or anything nested in it, is a placeholder
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        match self {
            TypeNode::Unsupported(_) => true,
            TypeNode::Qualified { ty, .. } => ty.has_placeholder(),
            TypeNode::Pointer { to, .. }
            | TypeNode::Reference { to, .. }
            | TypeNode::RValueReference { to, .. } => to.has_placeholder(),
            TypeNode::FunctionPointer { ret, params, .. } => {
                ret.has_placeholder() || params.iter().any(TypeNode::has_placeholder)
            }
            _ => false,
        }
    }
}

/// Calling convention, qualifiers, return type and parameters of a function symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Access and storage
    pub scope: Scope,
    /// Qualification of the implicit `this`, i.e. a `const` member function
    pub this_cv: Cv,
    /// Implicit 64-bit `this` pointer (`__ptr64`)
    pub is64: bool,
    /// Calling convention
    pub conv: CallingConvention,
    /// Return type, `None` for constructors, destructors and conversion operators
    pub ret: Option<TypeNode>,
    /// Parameter types, empty for `(void)`
    pub params: Vec<TypeNode>,
    /// Trailing `...`
    pub is_variadic: bool,
}

impl Signature {
    /// Static member function
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.scope.is_static()
    }

    /// Virtual member function
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.scope.is_virtual()
    }

    /// `const` member function
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.this_cv.contains(Cv::CONST)
    }
}

/// What a decoded symbol declares
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// A free or member function
    Function(Signature),
    /// A constructor of `class`
    Constructor {
        /// The constructed class
        class: QualifiedName,
        /// Its signature
        sig: Signature,
    },
    /// A destructor of `class`
    Destructor {
        /// The destroyed class
        class: QualifiedName,
        /// Its signature
        sig: Signature,
    },
    /// An operator overload or compiler-generated closure
    Operator {
        /// The owning class, empty for free operators
        class: QualifiedName,
        /// Which operator
        op: OperatorName,
        /// Its signature
        sig: Signature,
    },
    /// A virtual function or virtual base table
    SpecialTable {
        /// The class the table belongs to
        class: QualifiedName,
        /// vftable or vbtable
        kind: TableKind,
        /// Qualification of the table object
        cv: Cv,
        /// The path of base classes this table is laid out for, if any
        bases: Vec<QualifiedName>,
    },
    /// A static member or global variable
    Data {
        /// Access and storage
        scope: Scope,
        /// Type of the variable
        ty: TypeNode,
        /// Qualification of the variable itself
        cv: Cv,
        /// The variable itself is `__ptr64`
        is64: bool,
    },
    /// A decorated name without any type information
    NameOnly,
    /// A symbol whose form is not handled, carrying the placeholder text
    Unsupported(String),
    /// Input that is not a decorated name, passed through verbatim
    Undecorated,
}

/// The operator of a [`DeclKind::Operator`]
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorName {
    /// A named operator or closure
    Named(Operator),
    /// `operator <type>`
    Conversion(TypeNode),
    /// A special code this decoder does not handle
    Unsupported(String),
}

/// The result of decoding one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// The input, verbatim
    pub raw: String,
    /// What the symbol declares
    pub decl: DeclKind,
    /// The fully qualified name of the declared entity
    pub qualified_name: QualifiedName,
}

impl DecodedSymbol {
    /// Returns `true` if the input was a decorated name
    #[must_use]
    pub fn is_decorated(&self) -> bool {
        !matches!(self.decl, DeclKind::Undecorated)
    }

    /// The signature, for every kind of function symbol
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        match &self.decl {
            DeclKind::Function(sig)
            | DeclKind::Constructor { sig, .. }
            | DeclKind::Destructor { sig, .. }
            | DeclKind::Operator { sig, .. } => Some(sig),
            _ => None,
        }
    }
}
