use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use seqblas::{
    DenseVector, ElementalMatrix, ElementalVector, MatrixOps, SequentialBlas, SparseRowMatrix,
    SparseVector,
};

fn bench_sparse_insertion(c: &mut Criterion) {
    let n = 100_000;
    let mut rng = rand::thread_rng();
    let positions: Vec<usize> = (0..20_000).map(|_| rng.gen_range(0..n)).collect();

    c.bench_function("sparse vector random insertion (20k)", |ben| {
        ben.iter_batched(
            || SparseVector::new(n),
            |mut x| {
                for &i in &positions {
                    x.add(i, 1.0).unwrap();
                }
                black_box(x)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("sparse vector ordered insertion (20k)", |ben| {
        ben.iter_batched(
            || SparseVector::new(n),
            |mut x| {
                for i in 0..20_000 {
                    x.set(i * 5, 1.0).unwrap();
                }
                black_box(x)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_row_multiply_add(c: &mut Criterion) {
    let n = 10_000;
    // tridiagonal coefficient matrix
    let mut a = SparseRowMatrix::new(n, n, 3);
    for i in 0..n {
        if i > 0 {
            a.set(i, i - 1, -1.0).unwrap();
        }
        a.set(i, i, 2.0).unwrap();
        if i + 1 < n {
            a.set(i, i + 1, -1.0).unwrap();
        }
    }
    let x = DenseVector::from_vec((0..n).map(|i| (i as f64).sin()).collect());
    let y = DenseVector::from_vec((0..n).map(|i| (i as f64).cos()).collect());
    let mut z = DenseVector::zeros(n);
    let blas = SequentialBlas::new();

    c.bench_function("row-compressed multiply_add (n=10k)", |ben| {
        ben.iter(|| {
            blas.multiply_add(1.0, black_box(&a), black_box(&x), 0.5, black_box(&y), &mut z)
                .unwrap();
        })
    });

    c.bench_function("row-compressed transpose_multiply_add_in_place (n=10k)", |ben| {
        ben.iter(|| {
            blas.transpose_multiply_add_in_place(1.0, black_box(&a), black_box(&x), 0.5, &mut z)
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_sparse_insertion, bench_row_multiply_add);
criterion_main!(benches);
