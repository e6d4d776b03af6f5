use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use probe_hash::FnvBuildHasher;
use probe_hash::HashMap as ProbeHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

const SIZES: &[usize] = &[(1 << 10), (1 << 12), (1 << 14), (1 << 16), (1 << 18)];

const SEED: u64 = 0x5eed_cafe;

trait BenchKey: Clone + Eq + core::hash::Hash + probe_hash::Key {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

fn random_keys<K: BenchKey>(count: usize, rng: &mut SmallRng) -> Vec<K> {
    (0..count).map(|_| K::new(rng.random::<u64>())).collect()
}

fn bench_insert<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(SEED);
    for &size in SIZES {
        let keys: Vec<K> = random_keys(size, &mut rng);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = ProbeHashMap::with_capacity(2).unwrap();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = HashbrownHashMap::with_hasher(FnvBuildHasher::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = StdHashMap::with_hasher(FnvBuildHasher::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(SEED);
    for &size in SIZES {
        let keys: Vec<K> = random_keys(size, &mut rng);
        let mut probes: Vec<K> = keys.iter().step_by(2).cloned().collect();
        probes.extend(random_keys::<K>(size / 2, &mut rng));
        probes.shuffle(&mut rng);

        let mut probe_map = ProbeHashMap::with_capacity(size).unwrap();
        let mut hashbrown_map = HashbrownHashMap::with_hasher(FnvBuildHasher::default());
        let mut std_map = StdHashMap::with_hasher(FnvBuildHasher::default());
        for (i, key) in keys.iter().enumerate() {
            probe_map.insert(key.clone(), i).unwrap();
            hashbrown_map.insert(key.clone(), i);
            std_map.insert(key.clone(), i);
        }

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(probe_map.get(key));
                }
            })
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(hashbrown_map.get(key));
                }
            })
        });
        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(std_map.get(key));
                }
            })
        });
    }

    group.finish();
}

/// Lookups skewed towards a few hot keys.
fn bench_find_zipf<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_zipf_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(SEED);
    for &size in SIZES {
        let keys: Vec<K> = random_keys(size, &mut rng);
        let distr = Zipf::new(size as f64, 1.1).unwrap();
        let probes: Vec<K> = (0..size)
            .map(|_| keys[(rng.sample(distr) as usize - 1).min(size - 1)].clone())
            .collect();

        let mut probe_map = ProbeHashMap::with_capacity(size).unwrap();
        let mut hashbrown_map = HashbrownHashMap::with_hasher(FnvBuildHasher::default());
        for (i, key) in keys.iter().enumerate() {
            probe_map.insert(key.clone(), i).unwrap();
            hashbrown_map.insert(key.clone(), i);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(probe_map.get(key));
                }
            })
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(hashbrown_map.get(key));
                }
            })
        });
    }

    group.finish();
}

/// Interleaved removes and inserts at a steady population, which keeps the
/// table full of tombstones.
fn bench_churn<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(SEED);
    for &size in SIZES {
        let live: Vec<K> = random_keys(size / 2, &mut rng);
        let fresh: Vec<K> = random_keys(size / 2, &mut rng);

        let mut probe_map = ProbeHashMap::with_capacity(size).unwrap();
        let mut hashbrown_map = HashbrownHashMap::with_hasher(FnvBuildHasher::default());
        for (i, key) in live.iter().enumerate() {
            probe_map.insert(key.clone(), i).unwrap();
            hashbrown_map.insert(key.clone(), i);
        }

        group.throughput(Throughput::Elements(live.len() as u64 * 2));
        group.bench_function(format!("probe_hash/{size}"), |b| {
            b.iter_batched(
                || probe_map.clone(),
                |mut map| {
                    for (old, new) in live.iter().zip(&fresh) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 0).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown_map.clone(),
                |mut map| {
                    for (old, new) in live.iter().zip(&fresh) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 0));
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert::<u64>,
    bench_insert::<String>,
    bench_find_hit_miss::<u64>,
    bench_find_hit_miss::<String>,
    bench_find_zipf::<u64>,
    bench_find_zipf::<String>,
    bench_churn::<u64>,
    bench_churn::<String>,
);
criterion_main!(benches);
