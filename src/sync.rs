// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Lock types used throughout the crate. These are the `parking_lot` implementations which do
//! not poison and whose condition variable works directly with the mutex guard.

pub type Mutex<T> = parking_lot::Mutex<T>;
pub type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
pub type RwLock<T> = parking_lot::RwLock<T>;
pub type Condvar = parking_lot::Condvar;
