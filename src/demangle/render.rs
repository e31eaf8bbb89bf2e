//! Text rendering of decoded symbols.
//!
//! Every node of the decoded tree implements [`std::fmt::Display`], producing the same
//! spelling as the Microsoft `undname` tool:
//!
//! ```text
//! public: virtual int __cdecl CWnd::GetDlgCtrlID(void)const __ptr64
//! int (__cdecl*)(int)
//! const CDerived::`vftable'{for `CBase'}
//! ```
//!
//! Parameters are separated by a bare `,`, a variadic list ends in `...`, and a template
//! argument list whose last argument itself ends in `>` closes with ` >`.

use std::fmt::{self, Display, Formatter, Write};

use crate::demangle::types::{
    CallingConvention, Cv, DeclKind, DecodedSymbol, NameComponent, QualifiedName, Scope,
    Signature, TemplateArg, TypeNode,
};

/// ` const`, ` volatile`, ` const volatile` or nothing
fn cv_suffix(cv: Cv) -> &'static str {
    match (cv.contains(Cv::CONST), cv.contains(Cv::VOLATILE)) {
        (true, true) => " const volatile",
        (true, false) => " const",
        (false, true) => " volatile",
        (false, false) => "",
    }
}

fn write_params(f: &mut Formatter<'_>, params: &[TypeNode], is_variadic: bool) -> fmt::Result {
    f.write_char('(')?;
    if params.is_empty() && !is_variadic {
        f.write_str("void")?;
    }
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{param}")?;
    }
    if is_variadic {
        if !params.is_empty() {
            f.write_char(',')?;
        }
        f.write_str("...")?;
    }
    f.write_char(')')
}

fn write_template(f: &mut Formatter<'_>, base: &str, args: &[TemplateArg]) -> fmt::Result {
    let rendered = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    if rendered.ends_with('>') {
        write!(f, "{base}<{rendered} >")
    } else {
        write!(f, "{base}<{rendered}>")
    }
}

/// `public: `, `protected: static `, `private: virtual ` or nothing
fn write_scope(f: &mut Formatter<'_>, scope: Scope) -> fmt::Result {
    if let Some(access) = scope.access() {
        write!(f, "{access}: ")?;
    }
    if scope.is_static() {
        f.write_str("static ")?;
    }
    if scope.is_virtual() {
        f.write_str("virtual ")?;
    }
    Ok(())
}

fn write_function(f: &mut Formatter<'_>, name: &QualifiedName, sig: &Signature) -> fmt::Result {
    write_scope(f, sig.scope)?;
    if let Some(ret) = &sig.ret {
        write!(f, "{ret} ")?;
    }
    write!(f, "{} {name}", sig.conv)?;
    write_params(f, &sig.params, sig.is_variadic)?;
    f.write_str(cv_suffix(sig.this_cv).trim_start())?;
    if sig.is64 {
        f.write_str(" __ptr64")?;
    }
    Ok(())
}

impl Display for CallingConvention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CallingConvention::Cdecl => f.write_str("__cdecl"),
            CallingConvention::Pascal => f.write_str("__pascal"),
            CallingConvention::Thiscall => f.write_str("__thiscall"),
            CallingConvention::Stdcall => f.write_str("__stdcall"),
            CallingConvention::Fastcall => f.write_str("__fastcall"),
            CallingConvention::Clrcall => f.write_str("__clrcall"),
            CallingConvention::Vectorcall => f.write_str("__vectorcall"),
            CallingConvention::Unknown(code) => write!(f, "UNK({code})"),
        }
    }
}

impl Display for TemplateArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TemplateArg::Type(ty) => write!(f, "{ty}"),
            TemplateArg::NameBackref(component) => write!(f, "{component}"),
            TemplateArg::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl Display for NameComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NameComponent::Identifier(name) | NameComponent::Unsupported(name) => {
                f.write_str(name)
            }
            NameComponent::Template { base, args } => write_template(f, base, args),
            NameComponent::AnonymousNamespace => f.write_str("`anonymous namespace'"),
            NameComponent::LocalScope(n) => write!(f, "`{n}'"),
            NameComponent::NestedSymbol(symbol) => write!(f, "`{symbol}'"),
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let primitive = match self {
            TypeNode::Void => "void",
            TypeNode::Bool => "bool",
            TypeNode::SChar => "signed char",
            TypeNode::Char => "char",
            TypeNode::UChar => "unsigned char",
            TypeNode::Short => "short",
            TypeNode::UShort => "unsigned short",
            TypeNode::Int => "int",
            TypeNode::UInt => "unsigned int",
            TypeNode::Long => "long",
            TypeNode::ULong => "unsigned long",
            TypeNode::Int64 => "__int64",
            TypeNode::UInt64 => "unsigned __int64",
            TypeNode::Float => "float",
            TypeNode::Double => "double",
            TypeNode::LongDouble => "long double",
            TypeNode::WChar => "wchar_t",
            TypeNode::Char8 => "char8_t",
            TypeNode::Char16 => "char16_t",
            TypeNode::Char32 => "char32_t",
            TypeNode::Nullptr => "std::nullptr_t",
            TypeNode::Qualified { ty, cv } => return write!(f, "{ty}{}", cv_suffix(*cv)),
            TypeNode::Pointer { to, cv, is64 } => {
                return write_indirection(f, to, "*", *cv, *is64);
            }
            TypeNode::Reference { to, cv, is64 } => {
                return write_indirection(f, to, "&", *cv, *is64);
            }
            TypeNode::RValueReference { to, cv, is64 } => {
                return write_indirection(f, to, "&&", *cv, *is64);
            }
            TypeNode::Class { name } => return write!(f, "class {name}"),
            TypeNode::Struct { name } => return write!(f, "struct {name}"),
            TypeNode::Union { name } => return write!(f, "union {name}"),
            TypeNode::Enum { name } => return write!(f, "enum {name}"),
            TypeNode::TemplateInstance { base, args } => return write_template(f, base, args),
            TypeNode::FunctionPointer {
                kind,
                cv,
                conv,
                ret,
                params,
                is_variadic,
            } => {
                write!(f, "{ret} ({conv}{kind}{})", cv_suffix(*cv).trim_start())?;
                return write_params(f, params, *is_variadic);
            }
            TypeNode::Unsupported(text) => text.as_str(),
        };

        f.write_str(primitive)
    }
}

fn write_indirection(
    f: &mut Formatter<'_>,
    to: &TypeNode,
    sigil: &str,
    cv: Cv,
    is64: bool,
) -> fmt::Result {
    write!(f, "{to} {sigil}")?;
    if is64 {
        f.write_str(" __ptr64")?;
    }
    f.write_str(cv_suffix(cv))
}

impl Display for DecodedSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.qualified_name;
        match &self.decl {
            DeclKind::Undecorated => f.write_str(&self.raw),
            DeclKind::NameOnly => write!(f, "{name}"),
            DeclKind::Unsupported(text) => write!(f, "{name} {text}"),
            DeclKind::Function(sig)
            | DeclKind::Constructor { sig, .. }
            | DeclKind::Destructor { sig, .. }
            | DeclKind::Operator { sig, .. } => write_function(f, name, sig),
            DeclKind::Data {
                scope,
                ty,
                cv,
                is64,
            } => {
                write_scope(f, *scope)?;
                write!(f, "{ty}{}", cv_suffix(*cv))?;
                if *is64 {
                    f.write_str(" __ptr64")?;
                }
                write!(f, " {name}")
            }
            DeclKind::SpecialTable { cv, bases, .. } => {
                let qualifier = cv_suffix(*cv).trim_start();
                if !qualifier.is_empty() {
                    write!(f, "{qualifier} ")?;
                }
                write!(f, "{name}")?;
                if !bases.is_empty() {
                    let path = bases
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("'s `");
                    write!(f, "{{for `{path}'}}")?;
                }
                Ok(())
            }
        }
    }
}

impl DecodedSymbol {
    /// The fully qualified name without any type information
    ///
    /// Undecorated input is returned verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let symbol = undname::decode("?GetValue@CClass@@QEBAHXZ");
    /// assert_eq!(symbol.name_only(), "CClass::GetValue");
    /// assert_eq!(undname::decode("main").name_only(), "main");
    /// ```
    #[must_use]
    pub fn name_only(&self) -> String {
        if self.is_decorated() {
            self.qualified_name.to_string()
        } else {
            self.raw.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::demangle::{decode, decode_type};

    fn render(symbol: &str) -> String {
        decode(symbol).to_string()
    }

    #[test]
    fn test_primitive_spelling() {
        assert_eq!(decode_type("_J").to_string(), "__int64");
        assert_eq!(decode_type("K").to_string(), "unsigned long");
        assert_eq!(decode_type("C").to_string(), "signed char");
    }

    #[test]
    fn test_pointer_spelling() {
        assert_eq!(decode_type("PEAH").to_string(), "int * __ptr64");
        assert_eq!(decode_type("PEBD").to_string(), "char const * __ptr64");
        assert_eq!(decode_type("QEAH").to_string(), "int * __ptr64 const");
        assert_eq!(decode_type("PAH").to_string(), "int *");
        assert_eq!(
            decode_type("AEBVCString@@").to_string(),
            "class CString const & __ptr64"
        );
        assert_eq!(decode_type("$$QEAH").to_string(), "int && __ptr64");
    }

    #[test]
    fn test_function_pointer_spelling() {
        assert_eq!(decode_type("P6AHH@Z").to_string(), "int (__cdecl*)(int)");
        assert_eq!(decode_type("P6AXXZ").to_string(), "void (__cdecl*)(void)");
    }

    #[test]
    fn test_nested_template_spelling() {
        assert_eq!(
            decode_type("V?$vector@V?$basic_string@D@std@@@std@@").to_string(),
            "class std::vector<class std::basic_string<char> >"
        );
    }

    #[test]
    fn test_function_spelling() {
        assert_eq!(render("?Foo@@YAHH@Z"), "int __cdecl Foo(int)");
        assert_eq!(
            render("??0Bar@@QEAA@XZ"),
            "public: __cdecl Bar::Bar(void) __ptr64"
        );
        assert_eq!(
            render("??1Bar@@UEAA@XZ"),
            "public: virtual __cdecl Bar::~Bar(void) __ptr64"
        );
        assert_eq!(
            render("?GetValue@CClass@@QEBAHXZ"),
            "public: int __cdecl CClass::GetValue(void)const __ptr64"
        );
        assert_eq!(
            render("?Format@CString@@QEAAXPEB_WZZ"),
            "public: void __cdecl CString::Format(wchar_t const * __ptr64,...) __ptr64"
        );
    }

    #[test]
    fn test_operator_spelling() {
        assert_eq!(
            render("??4CString@@QEAAAEAV0@AEBV0@@Z"),
            "public: class CString & __ptr64 __cdecl CString::operator=(class CString const & __ptr64) __ptr64"
        );
        assert_eq!(
            render("??BCString@@QEBAPEBDXZ"),
            "public: __cdecl CString::operator char const * __ptr64(void)const __ptr64"
        );
    }

    #[test]
    fn test_data_spelling() {
        assert_eq!(
            render("?classCObject@CObject@@2UCRuntimeClass@@B"),
            "public: static struct CRuntimeClass const CObject::classCObject"
        );
        assert_eq!(render("?p@@3PEAHEA"), "int * __ptr64 __ptr64 p");
        assert_eq!(render("?n@@3HA"), "int n");
    }

    #[test]
    fn test_table_spelling() {
        assert_eq!(render("??_7CWnd@@6B@"), "const CWnd::`vftable'");
        assert_eq!(
            render("??_7CDerived@@6BCBase@@@"),
            "const CDerived::`vftable'{for `CBase'}"
        );
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(render("main"), "main");
        assert_eq!(render(""), "");
        assert_eq!(render("?Foo@@"), "Foo");
    }
}
