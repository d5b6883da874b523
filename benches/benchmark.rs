//! Benchmarks for rotorcrypt machine operations.
//!
//! Measures configuration parsing, single-symbol conversion, whole-message
//! conversion, and conversion cost as the number of pawls grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rotorcrypt::config::{MachineConfig, Setting};
use rotorcrypt::Machine;

/// Naval rotor catalogue shared by all benchmarks.
const NAVAL: &str = include_str!("../testdata/naval.conf");

/// Setting line used consistently across all benchmarks.
const BENCH_SETTING: &str = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)";

/// Message length for the whole-message benchmark.
const MESSAGE_LEN: usize = 4096;

fn configured() -> Machine {
    let mut machine = MachineConfig::parse(NAVAL).unwrap().build().unwrap();
    Setting::parse(BENCH_SETTING, machine.num_rotors())
        .unwrap()
        .apply(&mut machine)
        .unwrap();
    machine
}

/// Benchmarks parsing the naval catalogue and building its machine.
fn bench_config_build(c: &mut Criterion) {
    c.bench_function("config_build", |b| {
        b.iter(|| MachineConfig::parse(black_box(NAVAL)).unwrap().build().unwrap());
    });
}

/// Benchmarks `Machine::convert_symbol()` on a configured naval machine.
///
/// Rotor offsets advance naturally between iterations, so the double-step
/// path is exercised as often as it is in real traffic.
fn bench_convert_symbol(c: &mut Criterion) {
    let mut machine = configured();

    let mut group = c.benchmark_group("convert_symbol");
    group.throughput(Throughput::Elements(1));
    group.bench_function("naval", |b| {
        b.iter(|| machine.convert_symbol(black_box('A')).unwrap());
    });
    group.finish();
}

/// Benchmarks `Machine::convert()` over a long message, grouping included.
fn bench_convert_message(c: &mut Criterion) {
    let mut machine = configured();
    let message: String = "FROMHISSHOULDERHIAWATHA"
        .chars()
        .cycle()
        .take(MESSAGE_LEN)
        .collect();

    let mut group = c.benchmark_group("convert_message");
    group.throughput(Throughput::Elements(MESSAGE_LEN as u64));
    group.bench_function("naval", |b| {
        b.iter(|| machine.convert(black_box(&message)).unwrap());
    });
    group.finish();
}

/// Benchmarks symbol conversion as more slots carry pawls.
fn bench_pawl_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_pawl_scaling");
    group.throughput(Throughput::Elements(1));

    for pawls in [1usize, 2, 3] {
        let config = NAVAL.replacen("5 3", &format!("5 {}", pawls), 1);
        let mut machine = MachineConfig::parse(&config).unwrap().build().unwrap();
        Setting::parse("* B Beta I II III AAAA", 5)
            .unwrap()
            .apply(&mut machine)
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(pawls), &pawls, |b, _| {
            b.iter(|| machine.convert_symbol(black_box('Q')).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_config_build,
    bench_convert_symbol,
    bench_convert_message,
    bench_pawl_scaling,
);
criterion_main!(benches);
