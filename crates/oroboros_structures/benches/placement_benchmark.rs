//! Benchmark for structure placement.
//!
//! TARGET: gate checks for a full 32x32-chunk cell in under 1ms
//!
//! Run with: cargo bench --package oroboros_structures --bench placement_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oroboros_structures::{
    BlockPos, CandidateSampler, CubePos, PlacementValidator, RegionCoord, SamplingMode,
    StructureConfig, StructureGenerator, TerrainWorld, WorldSeed,
};

fn benchmark_candidate_sampling(c: &mut Criterion) {
    let world = TerrainWorld::new(WorldSeed::new(42));
    let grid = StructureConfig::default().grid();

    for mode in [SamplingMode::Single, SamplingMode::Averaged] {
        let sampler = CandidateSampler::new(grid, mode);
        c.bench_function(&format!("candidate_{mode:?}"), |b| {
            let mut x = 0;
            b.iter(|| {
                x += 1;
                black_box(sampler.candidate_for(&world, black_box(RegionCoord::new(x, -x))))
            });
        });
    }
}

fn benchmark_gate_full_cell(c: &mut Criterion) {
    let world = TerrainWorld::new(WorldSeed::new(42));
    let config = StructureConfig::default();
    let gate = PlacementValidator::new(config.grid(), config.allowed_biomes, config.viability_radius);

    let mut group = c.benchmark_group("gate");
    group.throughput(Throughput::Elements(32 * 32));

    group.bench_function("full_cell_1024_cubes", |b| {
        b.iter(|| {
            let mut accepted = 0;
            for x in 0..32 {
                for z in 0..32 {
                    if gate.is_canonical_and_viable(&world, CubePos::new(x, 4, z)) {
                        accepted += 1;
                    }
                }
            }
            black_box(accepted)
        });
    });

    group.finish();
}

fn benchmark_nearest_search(c: &mut Criterion) {
    let world = TerrainWorld::new(WorldSeed::new(42));
    let generator = StructureGenerator::new(StructureConfig::default(), ())
        .unwrap_or_else(|e| panic!("default config must validate: {e}"));

    let mut group = c.benchmark_group("nearest_search");
    group.sample_size(20);

    group.bench_function("from_origin", |b| {
        b.iter(|| black_box(generator.find_nearest(&world, black_box(BlockPos::new(0, 64, 0)), false)));
    });

    group.bench_function("unexplored_far", |b| {
        b.iter(|| {
            black_box(generator.find_nearest(&world, black_box(BlockPos::new(-40_000, 64, 25_000)), true))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_candidate_sampling,
    benchmark_gate_full_cell,
    benchmark_nearest_search
);
criterion_main!(benches);
