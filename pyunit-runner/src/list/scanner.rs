// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cancel::CancellationToken;
use std::ops::ControlFlow;
use tracing::debug;

/// The line printed by the discovery script right before the first test identifier.
///
/// Anything printed before it (for example by test modules at import time) is ignored.
pub const SENTINEL_LINE: &str = "start";

/// Extracts candidate test identifiers from the output of the discovery script.
///
/// Lines up to and including the first line that is exactly [`SENTINEL_LINE`] are discarded.
/// Every later line is trimmed, and non-empty lines are returned in order. If the sentinel never
/// appears, no identifiers are returned.
///
/// Once `cancel` is observed, remaining lines are not inspected, but identifiers that were
/// already collected are returned.
pub fn scan_test_ids<'a>(output: &'a str, cancel: &CancellationToken) -> Vec<&'a str> {
    let mut scanner = OutputScanner::default();
    for line in output.lines() {
        if scanner.process_line(line, cancel).is_break() {
            break;
        }
    }

    debug!(
        "scanned discovery output: sentinel {}, {} candidate identifiers",
        if scanner.collecting { "found" } else { "not found" },
        scanner.test_ids.len(),
    );
    scanner.test_ids
}

#[derive(Debug, Default)]
struct OutputScanner<'a> {
    collecting: bool,
    test_ids: Vec<&'a str>,
}

impl<'a> OutputScanner<'a> {
    fn process_line(&mut self, line: &'a str, cancel: &CancellationToken) -> ControlFlow<()> {
        if !self.collecting {
            if line == SENTINEL_LINE {
                self.collecting = true;
            }
            return ControlFlow::Continue(());
        }

        if cancel.is_cancelled() {
            return ControlFlow::Break(());
        }

        let line = line.trim();
        if !line.is_empty() {
            self.test_ids.push(line);
        }
        ControlFlow::Continue(())
    }
}
