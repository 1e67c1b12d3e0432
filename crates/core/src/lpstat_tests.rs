// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_queue_name_strips_job_id() {
    let line = "Office_HP-17        alice        2048   Sat 30 Aug 2026";
    assert_eq!(job_queue_name(line), Some("Office_HP"));
}

#[test]
fn job_queue_name_keeps_dashes_inside_queue() {
    // Only the trailing `-<jobid>` is removed
    let line = "front-desk-canon-203  bob  1024";
    assert_eq!(job_queue_name(line), Some("front-desk-canon"));
}

#[test]
fn job_queue_name_rejects_blank_lines() {
    assert_eq!(job_queue_name(""), None);
    assert_eq!(job_queue_name("   "), None);
}

#[test]
fn printer_name_from_status_line() {
    let line = "printer Office_HP is idle.  enabled since Sat 30 Aug 2026";
    assert_eq!(printer_name(line), Some("Office_HP"));
}

#[test]
fn printer_name_ignores_non_status_lines() {
    assert_eq!(printer_name("system default destination: Office_HP"), None);
}
