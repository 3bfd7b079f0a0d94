// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num::Complex;

use juliaset::{compute_grid_with_threads, parse_polynomial, power_map_grid, Region};

fn horner(c: &mut Criterion) {
    let (polynomial, _) = parse_polynomial("z^5 - 0.5iz^3 + (0.2-0.1i)z + 0.3").unwrap();
    let z = Complex::new(0.3, -0.4);
    c.bench_function("horner degree 5", |b| {
        b.iter(|| polynomial.eval(black_box(z)))
    });
}

fn grids(c: &mut Criterion) {
    let (polynomial, _) = parse_polynomial("z^2 + (-0.7+0.27015i)").unwrap();
    let region = Region::new(-1.5, 1.5, -1.5, 1.5);

    c.bench_function("parsed 200x200, 1 thread", |b| {
        b.iter(|| {
            compute_grid_with_threads(region, 200, 200, polynomial.evaluator(), 200, 2.0, 1)
                .unwrap()
        })
    });

    c.bench_function("parsed 200x200, all cores", |b| {
        b.iter(|| {
            compute_grid_with_threads(
                region,
                200,
                200,
                polynomial.evaluator(),
                200,
                2.0,
                num_cpus::get(),
            )
            .unwrap()
        })
    });

    c.bench_function("power map 200x200", |b| {
        b.iter(|| power_map_grid(200, 200, 2, Complex::new(-0.7, 0.27015), 200).unwrap())
    });
}

criterion_group!(benches, horner, grids);
criterion_main!(benches);
