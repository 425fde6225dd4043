// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document fingerprints — SHA-256 digests used to identify source documents
// in log output without logging their contents or paths.

use sha2::{Digest, Sha256};

const SHORT_LEN: usize = 12;

/// Lowercase hex SHA-256 digest of a document's bytes.
pub fn hash_bytes(document: &[u8]) -> String {
    hex::encode(Sha256::digest(document))
}

/// Digest prefix short enough for a log line.
pub fn short_fingerprint(document: &[u8]) -> String {
    let mut digest = hash_bytes(document);
    digest.truncate(SHORT_LEN);
    digest
}
