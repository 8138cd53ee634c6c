// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information and version utilities.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"fieldwork-servicing {}\n\
		 Platform: {}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::ARCH,
		std::env::consts::OS,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_includes_package_version() {
		let info = format_version_info();
		assert!(info.contains(env!("CARGO_PKG_VERSION")));
		assert!(info.contains(std::env::consts::OS));
	}
}
