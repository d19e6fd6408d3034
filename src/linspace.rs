use num::{Float, NumCast};

/// Evenly spaced samples over `[min, max]`, like numpy.linspace
pub(crate) struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub(crate) fn new(min: F, max: F, n: usize) -> Self {
        let step = match (n > 1).then(|| <F as NumCast>::from(n - 1)).flatten() {
            Some(num_steps) => (max - min) / num_steps,
            None => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        // Calculate the value just like numpy.linspace does
        let i = <F as NumCast>::from(self.index)?;
        self.index += 1;

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let samples: Vec<f64> = Linspace::new(0., 1., 5).collect();

    assert_eq!(samples, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(2.0f32, 3., 1).collect::<Vec<_>>(), vec![2.]);
    assert_eq!(Linspace::new(2., 3., 0).count(), 0);
    assert_eq!(Linspace::new(0., 10., 11).len(), 11);
}
