//! Compile time export sets
//!
//! A [Manufactory](crate::Manufactory) is parameterized by a tuple of the types it exports.
//! [Exports] proves that a type is part of such a tuple and [Superset] proves that one tuple
//! contains all types of another. The index parameters are inferred by the compiler, callers
//! write `_` for them.
//!
//! ```compile_fail
//! # use std::{convert::Infallible, sync::Arc};
//! # use manufactory::{Component, Manufactory};
//! struct Logger;
//! struct Storage;
//!
//! let component = Component::accumulator("app")
//!     .add_instance(Logger)
//!     .add_instance(Storage)
//!     .build()
//!     .unwrap();
//! let manufactory = Manufactory::<(Logger,)>::create(&component).unwrap();
//!
//! // Storage is produced by the component, but not exported by this manufactory
//! let storage: Arc<Storage> = manufactory.get().unwrap();
//! ```

use std::marker::PhantomData;

use crate::types::{Injectable, TypeInfo};

/// A tuple of exported types
pub trait ExportSet: 'static {
    fn type_infos() -> Vec<TypeInfo>;
}

/// Position marker used to select a type from an export set
pub struct At<const INDEX: usize>(PhantomData<()>);

/// Implemented by every export set containing `T`
pub trait Exports<T, Index>: ExportSet {}

/// Implemented by every export set containing all types of `Subset`
pub trait Superset<Subset, Indices>: ExportSet {}

impl ExportSet for () {
    fn type_infos() -> Vec<TypeInfo> {
        Vec::new()
    }
}

impl<Set: ExportSet> Superset<(), ()> for Set {}

macro_rules! impl_export_set {
    (@each $all:tt $($T:ident @ $index:literal),+) => {
        $(impl_export_set!(@one $all $T @ $index);)+
    };
    (@one [$($All:ident),+] $T:ident @ $index:literal) => {
        impl<$($All: Injectable),+> Exports<$T, At<$index>> for ($($All,)+) {}
    };
    ($($T:ident @ $index:literal),+) => {
        impl<$($T: Injectable),+> ExportSet for ($($T,)+) {
            fn type_infos() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$T>()),+]
            }
        }

        impl_export_set!(@each [$($T),+] $($T @ $index),+);
    };
}

macro_rules! impl_superset {
    ($($S:ident / $I:ident),+) => {
        impl<Set, $($S: Injectable, $I),+> Superset<($($S,)+), ($($I,)+)> for Set
        where
            Set: ExportSet $(+ Exports<$S, $I>)+
        {
        }
    };
}

impl_export_set!(T0 @ 0);
impl_export_set!(T0 @ 0, T1 @ 1);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6, T7 @ 7);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6, T7 @ 7, T8 @ 8);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6, T7 @ 7, T8 @ 8, T9 @ 9);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6, T7 @ 7, T8 @ 8, T9 @ 9, T10 @ 10);
impl_export_set!(T0 @ 0, T1 @ 1, T2 @ 2, T3 @ 3, T4 @ 4, T5 @ 5, T6 @ 6, T7 @ 7, T8 @ 8, T9 @ 9, T10 @ 10, T11 @ 11);

impl_superset!(S0 / I0);
impl_superset!(S0 / I0, S1 / I1);
impl_superset!(S0 / I0, S1 / I1, S2 / I2);
impl_superset!(S0 / I0, S1 / I1, S2 / I2, S3 / I3);
impl_superset!(S0 / I0, S1 / I1, S2 / I2, S3 / I3, S4 / I4);
impl_superset!(S0 / I0, S1 / I1, S2 / I2, S3 / I3, S4 / I4, S5 / I5);
impl_superset!(S0 / I0, S1 / I1, S2 / I2, S3 / I3, S4 / I4, S5 / I5, S6 / I6);
impl_superset!(S0 / I0, S1 / I1, S2 / I2, S3 / I3, S4 / I4, S5 / I5, S6 / I6, S7 / I7);
