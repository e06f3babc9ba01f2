//! Fleetloop Performance Benchmarks
//!
//! Hot paths of the controller:
//! - Repository registration and lookup
//! - Ordered QoS record insertion
//! - Solution encoding build per session
//! - Genome decoding and actuation planning

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fleetloop::common::{Direction, Objective, Primitive, QualityOfService, Vm};
use fleetloop::encoding::SolutionEncoding;
use fleetloop::repository::Repository;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Repository with `vms` VMs and one objective per VM driven by its memory and CPU
fn fleet(vms: usize) -> (Repository, Vec<Arc<Objective>>) {
    let repository = Repository::new();
    let mut objectives = Vec::with_capacity(vms);
    for i in 0..vms {
        let id = format!("vm-{i}");
        let vm = Vm::new(id.as_str());
        let mem = vm.add_hardware_primitive("mem");
        let cpu = vm.add_hardware_primitive("cpu");
        repository.register_vm(&id, Arc::new(vm)).unwrap();

        let objective = Arc::new(Objective::from_primitives(
            format!("cost-{i}"),
            vec![mem.clone(), cpu.clone()],
        ));
        repository.declare_direct_primitive(&objective, mem);
        repository.declare_direct_primitive(&objective, cpu);
        objectives.push(objective);
    }
    (repository, objectives)
}

// ============ REPOSITORY BENCHMARKS ============

fn bench_repository(c: &mut Criterion) {
    let mut group = c.benchmark_group("repository");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("register_vm", |b| {
        let repository = Repository::new();
        let mut i = 0u64;
        b.iter(|| {
            let id = format!("vm-{i}");
            i += 1;
            repository
                .register_vm(black_box(&id), Arc::new(Vm::new(id.as_str())))
                .unwrap();
        });
    });

    let (repository, _) = fleet(1_000);
    group.bench_function("vm_lookup", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let id = format!("vm-{}", rng.gen_range(0..1_000));
            black_box(repository.vm(&id).unwrap());
        });
    });

    group.bench_function("record_qos", |b| {
        let repository = Repository::new();
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let qos = QualityOfService::new(
                format!("svc-{}", rng.gen_range(0..10_000)),
                "latency",
                Direction::Minimize,
            );
            black_box(repository.record_qos_sample(Arc::new(qos)));
        });
    });

    group.bench_function("stage_and_commit", |b| {
        b.iter(|| {
            repository
                .stage_hardware_primitive_value("vm-42", "mem", black_box(&[2048.0]))
                .unwrap();
            black_box(repository.commit_staged());
        });
    });

    group.finish();
}

// ============ ENCODING BENCHMARKS ============

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1_000].iter() {
        let (repository, objectives) = fleet(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("build", size), size, |b, _| {
            b.iter(|| black_box(SolutionEncoding::build(&repository, &objectives).unwrap()));
        });

        let session = SolutionEncoding::build(&repository, &objectives).unwrap();
        let genome: Vec<f64> = (0..session.genome_len()).map(|i| i as f64).collect();

        group.bench_with_input(BenchmarkId::new("decode_all", size), size, |b, _| {
            b.iter(|| {
                for objective in session.objectives() {
                    black_box(session.decode(objective, black_box(&genome)).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("actuation_plan", size), size, |b, _| {
            b.iter(|| black_box(session.actuation_plan(black_box(&genome)).unwrap()));
        });
    }

    group.finish();
}

fn bench_primitive_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_order");

    group.bench_function("sort_1000", |b| {
        let mut rng = rand::thread_rng();
        let primitives: Vec<Arc<Primitive>> = (0..1_000)
            .map(|_| {
                Arc::new(Primitive::hardware(
                    format!("vm-{}", rng.gen_range(0..100)),
                    format!("p{}", rng.gen_range(0..10)),
                ))
            })
            .collect();
        b.iter(|| {
            let mut sorted = primitives.clone();
            sorted.sort();
            black_box(sorted);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_repository, bench_encoding, bench_primitive_order);
criterion_main!(benches);
