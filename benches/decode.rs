//! Benchmarks for decorated name decoding.
//!
//! Tests decoding performance for the common symbol shapes of a C++ export table:
//! - Free functions with primitive parameters
//! - Member functions, constructors and operators
//! - Template-heavy standard library signatures
//! - Rendering to text
//! - Parallel batch decoding

extern crate undname;

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use undname::{decode, decode_all};

const EXPORTS: &[&str] = &[
    "?Foo@@YAHH@Z",
    "??0CWnd@@QEAA@XZ",
    "??1CWnd@@UEAA@XZ",
    "?GetDlgCtrlID@CWnd@@QEBAHXZ",
    "??4CString@@QEAAAEAV0@AEBV0@@Z",
    "?Serialize@CObject@@UEAAXAEAVCArchive@@@Z",
    "?classCObject@CObject@@2UCRuntimeClass@@B",
    "??_7CDerived@@6BCBase@@@",
    "??$make_pair@AEAHAEAH@std@@YA?AU?$pair@HH@0@AEAH0@Z",
    "DllMain",
];

/// Benchmark a free function with a single primitive parameter.
/// Symbol: int __cdecl Foo(int)
fn bench_decode_free_function(c: &mut Criterion) {
    c.bench_function("decode_free_function", |b| {
        b.iter(|| black_box(decode(black_box("?Foo@@YAHH@Z"))));
    });
}

/// Benchmark a member operator whose parameters use name and type backreferences.
/// Symbol: class CString & CString::operator=(class CString const &)
fn bench_decode_operator_backrefs(c: &mut Criterion) {
    c.bench_function("decode_operator_backrefs", |b| {
        b.iter(|| black_box(decode(black_box("??4CString@@QEAAAEAV0@AEBV0@@Z"))));
    });
}

/// Benchmark a function template with nested template arguments.
fn bench_decode_templates(c: &mut Criterion) {
    let symbol = "?push_back@?$vector@V?$basic_string@DU?$char_traits@D@std@@V?$allocator@D@2@@std@@V?$allocator@V?$basic_string@DU?$char_traits@D@std@@V?$allocator@D@2@@std@@@2@@std@@QEAAXAEBV?$basic_string@DU?$char_traits@D@std@@V?$allocator@D@2@@2@@Z";

    c.bench_function("decode_templates", |b| {
        b.iter(|| black_box(decode(black_box(symbol))));
    });
}

/// Benchmark decoding plus rendering to text.
fn bench_decode_and_render(c: &mut Criterion) {
    c.bench_function("decode_and_render", |b| {
        b.iter(|| {
            for symbol in EXPORTS {
                black_box(decode(black_box(symbol)).to_string());
            }
        });
    });
}

/// Benchmark the parallel batch path on a larger export table.
fn bench_decode_all(c: &mut Criterion) {
    let batch: Vec<&str> = EXPORTS.iter().copied().cycle().take(10_000).collect();

    c.bench_function("decode_all_10k", |b| {
        b.iter(|| black_box(decode_all(black_box(&batch))));
    });
}

criterion_group!(
    benches,
    bench_decode_free_function,
    bench_decode_operator_backrefs,
    bench_decode_templates,
    bench_decode_and_render,
    bench_decode_all
);
criterion_main!(benches);
