//! Native stack growth for the recursive parts of the pipeline.
//!
//! Parsing, resolving and evaluating all recurse once per level of nesting in the program,
//! so deep input can exhaust whatever stack the calling thread was given. Each recursive
//! entry point goes through [`ensure_sufficient_stack`], which moves onto a freshly allocated
//! segment when the current one is close to running out.

/// If less than this remains, the stack is grown before recursing further
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}


#[cfg(test)]
mod tests {
    use test_log::test;
    use super::*;

    #[test]
    fn deep_native_recursion_grows_the_stack() {
        fn depth(n: u64) -> u64 {
            ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
        }

        assert_eq!(depth(200_000), 200_000);
    }
}
