// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Service contract scheduling for the fieldwork server.
//!
//! [`ServicingService`] is the invocation surface: initial schedule generation
//! at contract creation, the read-only suggested-dates preview, and
//! regeneration from explicit dates. Storage sits behind
//! [`ServicingRepository`].
//!
//! Nothing here serializes concurrent regenerations of the same contract
//! unless a [`ContractLocks`] registry is attached to the service.

pub mod error;
pub mod locks;
pub mod repository;
pub mod service;
pub mod types;

pub use error::{ErrorKind, Result, ServicingServerError};
pub use locks::ContractLocks;
pub use repository::{ServicingRepository, SqliteServicingRepository};
pub use service::ServicingService;
pub use types::{JobSummary, RegenerateOutcome, RegenerateRequest};
