mod test_signals;

use qdsp::config::Backend;
use qdsp::kernel::{GenericKernel, KernelDispatch, UnrolledKernel, VectorKernel};
use qdsp::sample::Sample;
use qdsp::simulation::{RandomSample, random_samples};

const MAX_LEN: usize = 64;

/// Shift used for products: Q15 for i16, Q31 for i32, ignored by floats.
fn shift_for<S: Sample>() -> u32 {
    S::WIDTH.saturating_sub(1)
}

fn check_elementwise<S: Sample + RandomSample + PartialEq>(seed: u64) {
    let shift = shift_for::<S>();
    for len in 0..=MAX_LEN {
        let a: Vec<S> = random_samples(len, seed + len as u64);
        let b: Vec<S> = random_samples(len, seed + 1000 + len as u64);
        let k: S = random_samples(1, seed + 2000 + len as u64)[0];

        let mut g = vec![S::ZERO; len];
        let mut u = vec![S::ZERO; len];

        GenericKernel.add(&mut g, &a, &b).unwrap();
        UnrolledKernel.add(&mut u, &a, &b).unwrap();
        assert_eq!(g, u, "add, len {}", len);

        GenericKernel.sub(&mut g, &a, &b).unwrap();
        UnrolledKernel.sub(&mut u, &a, &b).unwrap();
        assert_eq!(g, u, "sub, len {}", len);

        GenericKernel.negate(&mut g, &a).unwrap();
        UnrolledKernel.negate(&mut u, &a).unwrap();
        assert_eq!(g, u, "negate, len {}", len);

        GenericKernel.scale(&mut g, &a, k, shift).unwrap();
        UnrolledKernel.scale(&mut u, &a, k, shift).unwrap();
        assert_eq!(g, u, "scale, len {}", len);

        GenericKernel.dot_mul(&mut g, &a, &b, shift).unwrap();
        UnrolledKernel.dot_mul(&mut u, &a, &b, shift).unwrap();
        assert_eq!(g, u, "dot_mul, len {}", len);

        // mac accumulates into the previous dot_mul result
        GenericKernel.mac(&mut g, &a, &b, shift).unwrap();
        UnrolledKernel.mac(&mut u, &a, &b, shift).unwrap();
        assert_eq!(g, u, "mac, len {}", len);
    }
}

fn check_convolution<S: Sample + RandomSample + PartialEq>(seed: u64) {
    let shift = shift_for::<S>();
    for num_taps in 1..=13 {
        let taps: Vec<S> = random_samples(num_taps, seed + num_taps as u64);
        for len in 0..=MAX_LEN {
            let x: Vec<S> = random_samples(len, seed + 100 * num_taps as u64 + len as u64);
            let out_len = (len + 1).saturating_sub(num_taps);

            let mut g = vec![S::ZERO; out_len];
            let mut u = vec![S::ZERO; out_len];
            GenericKernel.convolve_partial(&mut g, &x, &taps, shift).unwrap();
            UnrolledKernel.convolve_partial(&mut u, &x, &taps, shift).unwrap();
            assert_eq!(g, u, "convolve_partial, {} taps, len {}", num_taps, len);

            // Each partial output equals the point form over its window
            for (n, &y) in u.iter().enumerate() {
                let window = &x[n..n + num_taps];
                assert_eq!(GenericKernel.convolve_point(window, &taps, shift).unwrap(), y);
                assert_eq!(UnrolledKernel.convolve_point(window, &taps, shift).unwrap(), y);
            }
        }
    }
}

#[test]
fn test_elementwise_conformance_i16() {
    check_elementwise::<i16>(1);
}

#[test]
fn test_elementwise_conformance_i32() {
    check_elementwise::<i32>(2);
}

#[test]
fn test_elementwise_conformance_f32() {
    check_elementwise::<f32>(3);
}

#[test]
fn test_elementwise_conformance_f64() {
    check_elementwise::<f64>(4);
}

#[test]
fn test_convolution_conformance_i16() {
    check_convolution::<i16>(10);
}

#[test]
fn test_convolution_conformance_i32() {
    check_convolution::<i32>(20);
}

#[test]
fn test_convolution_conformance_f32() {
    check_convolution::<f32>(30);
}

#[test]
fn test_convolution_conformance_f64() {
    check_convolution::<f64>(40);
}

#[test]
fn test_bulk_add_matches_naive_for_every_remainder() {
    let kernel = KernelDispatch::new(Backend::Unrolled);
    for len in 0..=MAX_LEN {
        let a: Vec<i32> = random_samples(len, 77 + len as u64);
        let b: Vec<i32> = random_samples(len, 177 + len as u64);
        let mut dst = vec![0i32; len];
        kernel.add(&mut dst, &a, &b).unwrap();
        for i in 0..len {
            assert_eq!(dst[i], a[i].wrapping_add(b[i]), "len {} index {}", len, i);
        }
    }
}

#[test]
fn test_double_negation_is_identity() {
    for backend in [Backend::Generic, Backend::Unrolled] {
        let kernel = KernelDispatch::new(backend);
        for len in 0..=MAX_LEN {
            let mut a: Vec<i16> = random_samples(len, 500 + len as u64);
            if len > 0 {
                a[len / 2] = i16::MIN;
            }
            let mut once = vec![0i16; len];
            let mut twice = vec![0i16; len];
            kernel.negate(&mut once, &a).unwrap();
            kernel.negate(&mut twice, &once).unwrap();
            assert_eq!(twice, a, "{} backend, len {}", backend, len);
            if len > 0 {
                // MIN has no positive counterpart and negates to itself
                assert_eq!(once[len / 2], i16::MIN);
            }
        }

        let a: Vec<f64> = random_samples(33, 9);
        let mut once = vec![0.0; 33];
        let mut twice = vec![0.0; 33];
        kernel.negate(&mut once, &a).unwrap();
        kernel.negate(&mut twice, &once).unwrap();
        assert_eq!(twice, a);
    }
}

#[test]
fn test_length_mismatch_is_rejected_by_both_backends() {
    for backend in [Backend::Generic, Backend::Unrolled] {
        let kernel = KernelDispatch::new(backend);
        let mut dst = [0i16; 4];
        assert!(kernel.add(&mut dst, &[1; 4], &[1; 5]).is_err());
        assert!(kernel.negate(&mut dst, &[1; 3]).is_err());
        let mut out = [0i16; 3];
        assert!(kernel.convolve_partial(&mut out, &[0; 8], &[1; 3], 15).is_err());
        assert!(kernel.convolve_partial(&mut out, &[0; 8], &[], 15).is_err());
        assert!(kernel.convolve_point(&[0; 4], &[1; 3], 15).is_err());
    }
}
