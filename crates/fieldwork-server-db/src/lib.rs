// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database plumbing shared by the servicing server crates.

pub mod error;
pub mod pool;
pub mod schema;
pub mod testing;

pub use error::{DbError, Result};
pub use pool::create_pool;
pub use schema::ensure_schema;
