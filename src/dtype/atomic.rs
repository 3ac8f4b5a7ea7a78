//! Relaxed atomic cells for device and work-group memory

use super::Element;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering};

/// Visibility scope of an atomic operation.
///
/// Host atomics are always coherent across threads, so the scope does not
/// change the generated instruction here. It is carried so that launches can
/// report how much traffic reaches device memory versus work-group memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemoryScope {
    /// Visible to the work-items of one work-group (local memory)
    WorkGroup,
    /// Visible to every work-group of the launch (device global memory)
    Device,
}

/// Element types with a relaxed atomic cell representation.
///
/// All operations use `Ordering::Relaxed`: histogram accumulation is
/// commutative and results are only observed after the launch completes.
pub trait AtomicElement: Element {
    /// Atomic cell holding one value of `Self`
    type Atomic: Send + Sync + Debug;

    /// Create a cell holding `v`
    fn new_atomic(v: Self) -> Self::Atomic;

    /// Relaxed load
    fn atomic_load(cell: &Self::Atomic) -> Self;

    /// Relaxed store
    fn atomic_store(cell: &Self::Atomic, v: Self);

    /// Relaxed add, returning the previous value. Integers wrap on overflow.
    fn atomic_add(cell: &Self::Atomic, v: Self) -> Self;
}

macro_rules! impl_int_atomic {
    ($($t:ty => $atomic:ty),* $(,)?) => {
        $(
            impl AtomicElement for $t {
                type Atomic = $atomic;

                #[inline]
                fn new_atomic(v: Self) -> Self::Atomic {
                    <$atomic>::new(v)
                }

                #[inline]
                fn atomic_load(cell: &Self::Atomic) -> Self {
                    cell.load(Ordering::Relaxed)
                }

                #[inline]
                fn atomic_store(cell: &Self::Atomic, v: Self) {
                    cell.store(v, Ordering::Relaxed)
                }

                #[inline]
                fn atomic_add(cell: &Self::Atomic, v: Self) -> Self {
                    cell.fetch_add(v, Ordering::Relaxed)
                }
            }
        )*
    };
}

impl_int_atomic!(u32 => AtomicU32, u64 => AtomicU64, i32 => AtomicI32, i64 => AtomicI64);

// Floats have no native fetch_add; CAS over the bit pattern instead.
macro_rules! impl_float_atomic {
    ($($t:ty => $atomic:ty),* $(,)?) => {
        $(
            impl AtomicElement for $t {
                type Atomic = $atomic;

                #[inline]
                fn new_atomic(v: Self) -> Self::Atomic {
                    <$atomic>::new(v.to_bits())
                }

                #[inline]
                fn atomic_load(cell: &Self::Atomic) -> Self {
                    <$t>::from_bits(cell.load(Ordering::Relaxed))
                }

                #[inline]
                fn atomic_store(cell: &Self::Atomic, v: Self) {
                    cell.store(v.to_bits(), Ordering::Relaxed)
                }

                #[inline]
                fn atomic_add(cell: &Self::Atomic, v: Self) -> Self {
                    let mut current = cell.load(Ordering::Relaxed);
                    loop {
                        let new = (<$t>::from_bits(current) + v).to_bits();
                        match cell.compare_exchange_weak(
                            current,
                            new,
                            Ordering::Relaxed,
                            Ordering::Relaxed,
                        ) {
                            Ok(prev) => return <$t>::from_bits(prev),
                            Err(actual) => current = actual,
                        }
                    }
                }
            }
        )*
    };
}

impl_float_atomic!(f32 => AtomicU32, f64 => AtomicU64);
