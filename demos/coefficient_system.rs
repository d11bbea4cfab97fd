use seqblas::{
    DenseVector, ElementalMatrix, MatrixOps, Norm, SequentialBlas, SparseRowMatrix, SparseVector,
    VectorOps,
};

fn main() -> seqblas::Result<()> {
    let n = 8;
    let blas = SequentialBlas::new();

    // second-difference operator with Dirichlet rows at both ends
    let mut a = SparseRowMatrix::new(n, n, 3);
    for i in 0..n {
        if i > 0 {
            a.set(i, i - 1, -1.0)?;
        }
        a.set(i, i, 2.0)?;
        if i + 1 < n {
            a.set(i, i + 1, -1.0)?;
        }
    }
    a.zero_rows(&[0, n - 1], 1.0)?;
    let rows = a.compressed();
    println!("offsets = {:?}", rows.offsets);

    // right-hand side: unit load in the interior, fixed values at the ends
    let mut b = DenseVector::from_vec(vec![1.0; n]);
    b.as_mut_slice()[0] = 0.0;
    b.as_mut_slice()[n - 1] = 0.0;

    // Jacobi sweeps: x ← x + D⁻¹(b − A·x)
    let mut x = DenseVector::zeros(n);
    let mut r = DenseVector::zeros(n);
    for sweep in 0..200 {
        blas.multiply_add(-1.0, &a, &x, 1.0, &b, &mut r)?;
        let res = blas.norm(&r, Norm::Two)?;
        if res < 1e-10 {
            println!("converged after {sweep} sweeps");
            break;
        }
        for i in 0..n {
            let d = a.get(i, i)?;
            r.as_mut_slice()[i] /= d;
        }
        blas.add_in_place(1.0, &r, 1.0, &mut x)?;
    }
    println!("x = {:?}", x.as_slice());

    // the interior load as a sparse vector, and its share of the solution
    let load = SparseVector::from_dense(b.as_slice());
    println!("load . x = {}", blas.dot(&x, &load)?);
    println!("|A|_inf = {}", blas.matrix_norm(&a, Norm::Infinity)?);
    Ok(())
}
