// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-contract mutual exclusion for schedule regeneration.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use fieldwork_servicing_core::ContractId;

/// Registry of one async mutex per contract.
///
/// Opt-in: a service without a registry lets concurrent regenerations of the
/// same contract interleave. Only serializes callers within this process.
#[derive(Clone, Default)]
pub struct ContractLocks {
	inner: Arc<Mutex<HashMap<ContractId, Arc<Mutex<()>>>>>,
}

impl ContractLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Wait for exclusive access to `contract_id`.
	pub async fn lock(&self, contract_id: ContractId) -> OwnedMutexGuard<()> {
		let mutex = {
			let mut map = self.inner.lock().await;
			// Drop entries nobody holds or waits on
			map.retain(|id, m| *id == contract_id || Arc::strong_count(m) > 1);
			Arc::clone(map.entry(contract_id).or_default())
		};
		mutex.lock_owned().await
	}

	/// Number of contracts currently tracked.
	pub async fn tracked(&self) -> usize {
		self.inner.lock().await.len()
	}
}
