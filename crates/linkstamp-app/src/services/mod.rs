// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — filesystem concerns the shell needs around a session:
// where settings live and where exported documents are delivered.

pub mod config_store;
pub mod downloads;
