//! Coding benchmarks for slide-rlnc.
//!
//! - Field kernels (`vector_multiply_add`) per field and symbol size
//! - Coefficient generation
//! - Encoding a coded symbol over a full window
//! - Decoding a full window from coded symbols
//!
//! Benchmarks use deterministic inputs (fixed seeds) to ensure reproducibility.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use slide_rlnc::util::DetRng;
use slide_rlnc::{
    Binary, Binary16, Binary4, Binary8, CoefficientGenerator, DecoderFactory, EncoderFactory,
    Field, FiniteField,
};

const SEED: u64 = 0xBE5C_0DE5;

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = DetRng::new(seed);
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn source_symbols(count: usize, symbol_size: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| random_bytes(symbol_size, SEED + i as u64))
        .collect()
}

// =============================================================================
// FIELD KERNELS
// =============================================================================

fn bench_kernel<F: FiniteField>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("multiply_add/{}", F::FIELD));
    for size in [64usize, 1400, 8192] {
        let src = random_bytes(size, SEED);
        let mut dst = random_bytes(size, SEED + 1);
        let scalar = 0x1D & F::MAX_VALUE;
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| F::vector_multiply_add(black_box(&mut dst), black_box(&src), scalar));
        });
    }
    group.finish();
}

fn bench_field_kernels(c: &mut Criterion) {
    bench_kernel::<Binary>(c);
    bench_kernel::<Binary4>(c);
    bench_kernel::<Binary8>(c);
    bench_kernel::<Binary16>(c);
}

// =============================================================================
// COEFFICIENT GENERATION
// =============================================================================

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for symbols in [16usize, 64, 256] {
        let mut out = vec![0u8; Binary8::elements_to_bytes(symbols)];
        let mut generator = CoefficientGenerator::default();
        let mut seed = 0u64;
        group.bench_with_input(BenchmarkId::from_parameter(symbols), &symbols, |b, &n| {
            b.iter(|| {
                generator.set_seed(seed);
                seed = seed.wrapping_add(1);
                generator.generate::<Binary8>(black_box(&mut out), n);
            });
        });
    }
    group.finish();
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

fn bench_encode(c: &mut Criterion) {
    const SYMBOL_SIZE: usize = 1400;
    let mut group = c.benchmark_group("encode_window");
    for field in [Field::Binary, Field::Binary8, Field::Binary16] {
        for window in [16usize, 64] {
            let source = source_symbols(window, SYMBOL_SIZE);
            let mut encoder = EncoderFactory::new(field, SYMBOL_SIZE).build().unwrap();
            for symbol in &source {
                encoder.push_front_symbol(symbol);
            }
            encoder.set_window(0, window);
            let mut coefficients = vec![0u8; encoder.coefficient_vector_size()];
            let mut coded = vec![0u8; SYMBOL_SIZE];
            encoder.set_seed(SEED);
            encoder.generate(&mut coefficients);

            group.throughput(Throughput::Bytes((window * SYMBOL_SIZE) as u64));
            group.bench_function(BenchmarkId::new(field.as_str(), window), |b| {
                b.iter(|| encoder.write_symbol(black_box(&mut coded), black_box(&coefficients)));
            });
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    const SYMBOL_SIZE: usize = 1400;
    const WINDOW: usize = 32;
    let mut group = c.benchmark_group("decode_window");
    group.sample_size(20);
    for field in [Field::Binary4, Field::Binary8, Field::Binary16] {
        let source = source_symbols(WINDOW, SYMBOL_SIZE);
        let mut encoder = EncoderFactory::new(field, SYMBOL_SIZE).build().unwrap();
        for symbol in &source {
            encoder.push_front_symbol(symbol);
        }
        encoder.set_window(0, WINDOW);

        // Precompute enough coded symbols for a full decode.
        let mut packets = Vec::new();
        let mut seed = 0;
        while packets.len() < WINDOW * 2 {
            let mut coefficients = vec![0u8; encoder.coefficient_vector_size()];
            let mut coded = vec![0u8; SYMBOL_SIZE];
            encoder.set_seed(seed);
            encoder.generate(&mut coefficients);
            encoder.write_symbol(&mut coded, &coefficients);
            packets.push((coded, coefficients));
            seed += 1;
        }

        group.throughput(Throughput::Bytes((WINDOW * SYMBOL_SIZE) as u64));
        group.bench_function(field.as_str(), |b| {
            b.iter(|| {
                let mut buffers = vec![vec![0u8; SYMBOL_SIZE]; WINDOW];
                let mut decoder = DecoderFactory::new(field, SYMBOL_SIZE).build().unwrap();
                for buffer in &mut buffers {
                    decoder.push_front_symbol(buffer);
                }
                decoder.set_window(0, WINDOW);
                for (coded, coefficients) in &packets {
                    if decoder.rank() == WINDOW {
                        break;
                    }
                    let mut scratch = coded.clone();
                    decoder.read_symbol(&mut scratch, coefficients);
                }
                black_box(decoder.symbols_decoded())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_field_kernels,
    bench_generation,
    bench_encode,
    bench_decode
);
criterion_main!(benches);
