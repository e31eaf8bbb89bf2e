use undname::{
    decode, decode_all,
    demangle::{decode_type, Access, CallingConvention, DeclKind, TemplateArg, TypeNode},
};

#[test]
fn undecorated_input_passes_through() {
    for input in ["main", "DllMain", "_malloc", "@foo@8", "not ? decorated", ""] {
        let symbol = decode(input);
        assert!(!symbol.is_decorated() || input.is_empty());
        assert_eq!(symbol.to_string(), input);
    }
}

#[test]
fn decode_is_deterministic() {
    let symbols = [
        "?Foo@@YAHH@Z",
        "??4CString@@QEAAAEAV0@AEBV0@@Z",
        "??$make_pair@AEAHAEAH@std@@YA?AU?$pair@HH@0@AEAH0@Z",
    ];
    for symbol in symbols {
        assert_eq!(decode(symbol), decode(symbol));
    }
}

#[test]
fn primitive_codes() {
    let cases = [
        ("X", "void"),
        ("D", "char"),
        ("E", "unsigned char"),
        ("F", "short"),
        ("G", "unsigned short"),
        ("H", "int"),
        ("I", "unsigned int"),
        ("J", "long"),
        ("K", "unsigned long"),
        ("M", "float"),
        ("N", "double"),
        ("O", "long double"),
        ("W", "wchar_t"),
        ("_N", "bool"),
        ("_J", "__int64"),
        ("_K", "unsigned __int64"),
        ("_W", "wchar_t"),
        ("_S", "char16_t"),
        ("_U", "char32_t"),
    ];

    for (code, expected) in cases {
        assert_eq!(decode_type(code).to_string(), expected, "code {code}");
    }
}

#[test]
fn free_function() {
    let symbol = decode("?Foo@@YAHH@Z");
    assert_eq!(symbol.qualified_name.to_string(), "Foo");

    let DeclKind::Function(sig) = &symbol.decl else {
        panic!("expected a function, got {:?}", symbol.decl);
    };
    assert_eq!(sig.conv, CallingConvention::Cdecl);
    assert_eq!(sig.ret, Some(TypeNode::Int));
    assert_eq!(sig.params, vec![TypeNode::Int]);
    assert!(!sig.is_variadic);
    assert_eq!(sig.scope.access(), None);
}

#[test]
fn constructor_and_destructor() {
    let ctor = decode("??0Bar@@QEAA@XZ");
    assert_eq!(ctor.qualified_name.to_string(), "Bar::Bar");
    let DeclKind::Constructor { class, sig } = &ctor.decl else {
        panic!("expected a constructor, got {:?}", ctor.decl);
    };
    assert_eq!(class.to_string(), "Bar");
    assert_eq!(sig.scope.access(), Some(Access::Public));
    assert!(!sig.is_static());
    assert!(sig.params.is_empty());
    assert!(sig.is64);
    assert_eq!(ctor.to_string(), "public: __cdecl Bar::Bar(void) __ptr64");

    let dtor = decode("??1Bar@@QEAA@XZ");
    assert_eq!(dtor.qualified_name.to_string(), "Bar::~Bar");
    let DeclKind::Destructor { sig, .. } = &dtor.decl else {
        panic!("expected a destructor, got {:?}", dtor.decl);
    };
    assert_eq!(sig.scope.access(), Some(Access::Public));
    assert!(sig.is64);
}

#[test]
fn template_class_constructor() {
    let symbol = decode("??0?$Foo@H@@QEAA@XZ");
    assert_eq!(symbol.qualified_name.to_string(), "Foo<int>::Foo<int>");
}

#[test]
fn public_virtual_order() {
    let rendered = decode("?Serialize@CObject@@UEAAXAEAVCArchive@@@Z").to_string();
    let public = rendered.find("public").unwrap();
    let virtual_ = rendered.find("virtual").unwrap();
    assert!(public < virtual_);
}

#[test]
fn parameter_backrefs_ignore_return_type() {
    // Return and first parameter are both `class Foo *`; the `0` must resolve to the
    // first parameter recorded in the parameter scope
    let symbol = decode("?f@@YAPEAVFoo@@PEAV1@0@Z");
    let sig = symbol.signature().unwrap();

    assert_eq!(sig.params.len(), 2);
    assert_eq!(sig.params[0], sig.params[1]);
    assert_eq!(
        symbol.to_string(),
        "class Foo * __ptr64 __cdecl f(class Foo * __ptr64,class Foo * __ptr64)"
    );

    // With nothing recorded in the parameter scope the digit stays unresolved
    let symbol = decode("?f@@YAPEAVFoo@@0@Z");
    assert_eq!(
        symbol.signature().unwrap().params,
        vec![TypeNode::Unsupported("0".to_string())]
    );
}

#[test]
fn template_instance_type() {
    assert_eq!(
        decode_type("?$Foo@H@@"),
        TypeNode::TemplateInstance {
            base: "Foo".to_string(),
            args: vec![TemplateArg::Type(TypeNode::Int)],
        }
    );
}

#[test]
fn unsupported_codes_degrade_to_placeholders() {
    let symbol = decode("?f@@YAXL@Z");
    let sig = symbol.signature().unwrap();
    assert!(sig.params[0].has_placeholder());
    assert_eq!(symbol.to_string(), "void __cdecl f(UNK(L))");
}

#[test]
fn truncated_input_is_total() {
    let symbol = "?Serialize@CObject@@UEAAXAEAVCArchive@@@Z";
    for end in 0..symbol.len() {
        let _ = decode(&symbol[..end]).to_string();
    }
    assert_eq!(decode("?Foo").to_string(), "Foo");
}

#[test]
fn adversarial_nesting_is_bounded() {
    let deep_pointers = format!("?f@@YAX{}H@Z", "PEA".repeat(10_000));
    assert!(decode(&deep_pointers).to_string().contains("UNK(depth)"));

    let deep_templates = format!("?f@@YAXV{}@Z", "?$A@V".repeat(10_000));
    let _ = decode(&deep_templates).to_string();
}

#[test]
fn batch_preserves_order() {
    let symbols = ["?Foo@@YAHH@Z", "main", "??0Bar@@QEAA@XZ"];
    let decoded = decode_all(&symbols);

    assert_eq!(decoded.len(), 3);
    for (symbol, decoded) in symbols.iter().zip(&decoded) {
        assert_eq!(&decoded.raw, symbol);
        assert_eq!(*decoded, decode(symbol));
    }
}
