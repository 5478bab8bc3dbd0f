use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use pflotran_mesh::convert::{ConvertOptions, convert};
use pflotran_mesh::data::coordinates::Coordinates;
use pflotran_mesh::topology::cell_type::CellType;
use pflotran_mesh::topology::orientation::{ReorientOptions, reorient};
use pflotran_mesh::topology::point::PointId;

fn pid(raw: u64) -> PointId {
    PointId::new(raw).expect("nonzero PointId")
}

/// `n` scrambled unit-box hexahedra with random extents.
fn scrambled_hexes(n: usize, seed: u64) -> (Coordinates, Vec<Vec<PointId>>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut coords = Coordinates::new();
    let mut cells = Vec::with_capacity(n);
    for cell in 0..n {
        let scale = [
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        ];
        let base = cell as u64 * 8;
        for (k, corner) in [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
        .iter()
        .enumerate()
        {
            let xyz = [
                corner[0] * scale[0] + cell as f64 * 3.0,
                corner[1] * scale[1],
                corner[2] * scale[2],
            ];
            coords
                .try_insert(pid(base + k as u64 + 1), xyz)
                .expect("fresh vertex id");
        }
        let mut nodes: Vec<PointId> = (1..=8).map(|k| pid(base + k)).collect();
        nodes.shuffle(&mut rng);
        cells.push(nodes);
    }
    (coords, cells)
}

fn stacked_dump(layers: usize) -> String {
    let mut text = format!("{} {}\n", 4 * (layers + 1), layers);
    for z in 0..=layers {
        for (x, y) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
            text.push_str(&format!("{} {x} {y} {z}\n", 4 * z + text_index(x, y) + 1));
        }
    }
    for z in 0..layers {
        let lo = 4 * z;
        let hi = 4 * (z + 1);
        text.push_str(&format!(
            "{} 308 {} {} {} {} {} {} {} {}\n",
            z + 1,
            hi + 1,
            hi + 2,
            hi + 3,
            hi + 4,
            lo + 1,
            lo + 2,
            lo + 3,
            lo + 4
        ));
    }
    text
}

fn text_index(x: i32, y: i32) -> usize {
    match (x, y) {
        (0, 0) => 0,
        (1, 0) => 1,
        (1, 1) => 2,
        _ => 3,
    }
}

fn bench_reorient(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorient");
    let options = ReorientOptions::default();

    for &n in &[100usize, 1_000] {
        let (coords, cells) = scrambled_hexes(n, 0x5eed);
        group.bench_with_input(BenchmarkId::new("scrambled_hexahedra", n), &n, |b, _| {
            b.iter(|| {
                for nodes in &cells {
                    let out = reorient(CellType::Hexahedron, nodes, &coords, &options);
                    black_box(out.is_ok());
                }
            });
        });
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    for &layers in &[100usize, 1_000] {
        let dump = stacked_dump(layers);
        group.bench_with_input(BenchmarkId::new("hex_column", layers), &layers, |b, _| {
            b.iter(|| {
                let mut out = Vec::with_capacity(dump.len());
                let report = convert(dump.as_bytes(), &mut out, "column", &ConvertOptions::default())
                    .expect("convert");
                black_box((report, out));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reorient, bench_convert);
criterion_main!(benches);
