#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use tempfile::TempDir;

pub const NODE_LOG: &str = "\
Connect to serial port /dev/ttyUSB0
2021-03-04 12:00:00,000 # Starting Contiki-NG-release/v4.6
2021-03-04 12:00:00,010 # [INFO: main      ] Node ID: 11222
2021-03-04 12:00:00,500 # [INFO: keystore  ] Successfully verified public key for 00124b0014d52bd6
2021-03-04 12:00:01,000 # [INFO: trust-comm] Updating Edge f4ce36b29cb59ade TM cr (type=2,good=1): EdgeResourceTM(epoch=3,bad=0) -> EdgeResourceTM(epoch=3,bad=0)
2021-03-04 12:00:01,250 # [INFO: A-envmon  ] Generated message (len=10)
2021-03-04 12:00:01,300 # [INFO: A-envmon  ] Message sent to coap://[fd00::1]:5683
2021-03-04 12:00:02,500 # [INFO: trust     ] Received trust info via POST from fd00::2 of length 40 (mid=7)
2021-03-04 12:00:02,600 # [INFO: trust     ] res_trust_post_handler: successfully queued trust to be verified from fd00::2 (mid=7)
2021-03-04 12:00:03,000 # [INFO: trust     ] trust_tx_continue: coap_send_request trust done
";

/// A send record with nothing pending, for exercising the correlation policy
pub const ORPHAN_SENT: &str =
    "2021-03-04 12:00:04,000 # [INFO: A-routing ] Message sent to coap://[fd00::1]:5683\n";

pub fn write_log(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("Failed to write log");
}

pub fn results_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(dir.path(), "wsn.wsn1.cr.pyterm.log", NODE_LOG);
    write_log(dir.path(), "edge.rpi1.cr.pyterm.log", NODE_LOG);
    dir
}

pub fn trustlog() -> Command {
    let mut cmd = cargo_bin_cmd!("trustlog");
    cmd.env_remove("RUST_LOG");
    cmd
}
