// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `logout` command.

use crate::error::BinResult;
use crate::shell::Shell;

/// Ends the current session.
pub fn logout(shell: &Shell) -> BinResult<()> {
    if shell.logout()? {
        println!("✓ Logged out");
    } else {
        println!("No active session");
    }
    Ok(())
}
