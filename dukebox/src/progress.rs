//! Reporting how far a long running operation got.

/// Receives the progress of an operation that goes over classes one by one.
///
/// [`set_max`][ProgressListener::set_max] is called once with the number of classes, then
/// [`set`][ProgressListener::set] with the index of each class before it's processed.
pub trait ProgressListener {
	fn set_max(&mut self, max: usize);

	fn set(&mut self, current: usize);
}

/// Ignores all progress.
impl ProgressListener for () {
	fn set_max(&mut self, _max: usize) {}

	fn set(&mut self, _current: usize) {}
}

impl<P: ProgressListener + ?Sized> ProgressListener for &mut P {
	fn set_max(&mut self, max: usize) {
		(**self).set_max(max)
	}

	fn set(&mut self, current: usize) {
		(**self).set(current)
	}
}

/// Calls a closure with `(current, max)` each time progress is made.
pub struct FnProgress<F> {
	max: usize,
	f: F,
}

impl<F: FnMut(usize, usize)> FnProgress<F> {
	pub fn new(f: F) -> FnProgress<F> {
		FnProgress { max: 0, f }
	}
}

impl<F: FnMut(usize, usize)> ProgressListener for FnProgress<F> {
	fn set_max(&mut self, max: usize) {
		self.max = max;
	}

	fn set(&mut self, current: usize) {
		(self.f)(current, self.max)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::progress::{FnProgress, ProgressListener};

	#[test]
	fn closure_sees_max() {
		let mut seen = Vec::new();
		let mut progress = FnProgress::new(|current, max| seen.push((current, max)));
		progress.set_max(2);
		progress.set(0);
		progress.set(1);
		drop(progress);
		assert_eq!(seen, [(0, 2), (1, 2)]);
	}
}
