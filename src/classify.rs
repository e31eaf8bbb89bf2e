//! Symbol classification.
//!
//! Export tables of C++ libraries are usually inspected per class: which constructors,
//! virtual methods and statics a class exports, and how many of each kind exist overall.
//! This module derives that from a [`DecodedSymbol`] without looking at the raw text.
//!
//! # Examples
//!
//! ```rust
//! use undname::{classify::{classify, class_name, SymbolCategory}, decode};
//!
//! let symbol = decode("?GetThisClass@CObject@@SAPEAUCRuntimeClass@@XZ");
//! assert_eq!(classify(&symbol), SymbolCategory::StaticMethod);
//! assert_eq!(class_name(&symbol).as_deref(), Some("CObject"));
//! ```

use std::collections::BTreeMap;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::demangle::{DeclKind, DecodedSymbol};

/// Group key for symbols that do not belong to a class
pub const GLOBAL_GROUP: &str = "<global>";

/// The kind of entity a symbol declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumCount)]
pub enum SymbolCategory {
    /// Class constructor
    #[strum(to_string = "constructors")]
    Constructor,
    /// Class destructor
    #[strum(to_string = "destructors")]
    Destructor,
    /// Operator overload, conversion operator or compiler-generated closure
    #[strum(to_string = "operators")]
    Operator,
    /// Virtual member function
    #[strum(to_string = "virtual_methods")]
    VirtualMethod,
    /// Static member function
    #[strum(to_string = "static_methods")]
    StaticMethod,
    /// Non-virtual, non-static member function
    #[strum(to_string = "member_functions")]
    MemberFunction,
    /// Free function
    #[strum(to_string = "global_functions")]
    GlobalFunction,
    /// Static member or global variable
    #[strum(to_string = "data")]
    Data,
    /// vftable or vbtable
    #[strum(to_string = "special_tables")]
    SpecialTable,
    /// Undecorated, name-only or unsupported symbols
    #[strum(to_string = "other")]
    Other,
}

/// Assign a [`SymbolCategory`] to a decoded symbol
#[must_use]
pub fn classify(symbol: &DecodedSymbol) -> SymbolCategory {
    match &symbol.decl {
        DeclKind::Constructor { .. } => SymbolCategory::Constructor,
        DeclKind::Destructor { .. } => SymbolCategory::Destructor,
        DeclKind::Operator { .. } => SymbolCategory::Operator,
        DeclKind::SpecialTable { .. } => SymbolCategory::SpecialTable,
        DeclKind::Data { .. } => SymbolCategory::Data,
        DeclKind::Function(sig) => {
            if sig.is_virtual() {
                SymbolCategory::VirtualMethod
            } else if sig.is_static() {
                SymbolCategory::StaticMethod
            } else if sig.scope.is_member() {
                SymbolCategory::MemberFunction
            } else {
                SymbolCategory::GlobalFunction
            }
        }
        DeclKind::NameOnly | DeclKind::Unsupported(_) | DeclKind::Undecorated => {
            SymbolCategory::Other
        }
    }
}

/// The class a symbol belongs to, `None` for free functions and global data
#[must_use]
pub fn class_name(symbol: &DecodedSymbol) -> Option<String> {
    let class = match &symbol.decl {
        DeclKind::Constructor { class, .. }
        | DeclKind::Destructor { class, .. }
        | DeclKind::Operator { class, .. }
        | DeclKind::SpecialTable { class, .. } => class.clone(),
        DeclKind::Function(sig) if sig.scope.is_member() => symbol.qualified_name.scope(),
        DeclKind::Data { scope, .. } if scope.is_member() => symbol.qualified_name.scope(),
        _ => return None,
    };

    if class.is_empty() {
        None
    } else {
        Some(class.to_string())
    }
}

/// Bucket symbols by owning class
///
/// Symbols without a class are collected under [`GLOBAL_GROUP`]. Within a bucket the
/// input order is kept.
#[must_use]
pub fn group_by_class(symbols: &[DecodedSymbol]) -> BTreeMap<String, Vec<&DecodedSymbol>> {
    let mut groups: BTreeMap<String, Vec<&DecodedSymbol>> = BTreeMap::new();
    for symbol in symbols {
        let key = class_name(symbol).unwrap_or_else(|| GLOBAL_GROUP.to_string());
        groups.entry(key).or_default().push(symbol);
    }
    groups
}

/// Number of symbols per [`SymbolCategory`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; SymbolCategory::COUNT],
}

impl CategoryCounts {
    /// Tally a batch of symbols
    #[must_use]
    pub fn from_symbols(symbols: &[DecodedSymbol]) -> Self {
        let mut counts = CategoryCounts::default();
        for symbol in symbols {
            counts.add(classify(symbol));
        }
        counts
    }

    /// Count one more symbol of `category`
    pub fn add(&mut self, category: SymbolCategory) {
        self.counts[category as usize] += 1;
    }

    /// Number of symbols counted for `category`
    #[must_use]
    pub fn get(&self, category: SymbolCategory) -> usize {
        self.counts[category as usize]
    }

    /// Number of symbols counted overall
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every category with its count, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (SymbolCategory, usize)> + '_ {
        SymbolCategory::iter().map(|category| (category, self.get(category)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn test_categories() {
        let cases = [
            ("??0CWnd@@QEAA@XZ", SymbolCategory::Constructor),
            ("??1CWnd@@UEAA@XZ", SymbolCategory::Destructor),
            ("??4CString@@QEAAAEAV0@AEBV0@@Z", SymbolCategory::Operator),
            ("?Serialize@CObject@@UEAAXAEAVCArchive@@@Z", SymbolCategory::VirtualMethod),
            ("?GetThisClass@CObject@@SAPEAUCRuntimeClass@@XZ", SymbolCategory::StaticMethod),
            ("?GetValue@CClass@@QEBAHXZ", SymbolCategory::MemberFunction),
            ("?Foo@@YAHH@Z", SymbolCategory::GlobalFunction),
            ("?classCObject@CObject@@2UCRuntimeClass@@B", SymbolCategory::Data),
            ("??_7CWnd@@6B@", SymbolCategory::SpecialTable),
            ("DllMain", SymbolCategory::Other),
        ];

        for (symbol, expected) in cases {
            assert_eq!(classify(&decode(symbol)), expected, "{symbol}");
        }
    }

    #[test]
    fn test_class_name() {
        assert_eq!(
            class_name(&decode("?GetValue@CClass@@QEBAHXZ")).as_deref(),
            Some("CClass")
        );
        assert_eq!(
            class_name(&decode("??0Inner@Outer@@QEAA@XZ")).as_deref(),
            Some("Outer::Inner")
        );
        assert_eq!(class_name(&decode("?Foo@@YAHH@Z")), None);
        assert_eq!(class_name(&decode("?n@@3HA")), None);
    }

    #[test]
    fn test_group_by_class() {
        let symbols = crate::decode_all(&[
            "??0CWnd@@QEAA@XZ",
            "?Foo@@YAHH@Z",
            "?GetDlgCtrlID@CWnd@@QEBAHXZ",
        ]);
        let groups = group_by_class(&symbols);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["CWnd"].len(), 2);
        assert_eq!(groups[GLOBAL_GROUP][0].raw, "?Foo@@YAHH@Z");
    }

    #[test]
    fn test_counts() {
        let symbols = crate::decode_all(&["??0A@@QEAA@XZ", "??0B@@QEAA@XZ", "?f@@YAXXZ"]);
        let counts = CategoryCounts::from_symbols(&symbols);

        assert_eq!(counts.get(SymbolCategory::Constructor), 2);
        assert_eq!(counts.get(SymbolCategory::GlobalFunction), 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.iter().count(), SymbolCategory::COUNT);
    }
}
