//! Pattern table: one anchored regex per recognized line shape.
//!
//! Every pattern is anchored at the start of the message only, so trailing
//! text added by newer firmware does not break matching.

use regex::Regex;
use std::sync::LazyLock;
use trustlog_types::KeystoreAdmissionOutcome;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

// --- trust-comm: trust model updates ---

/// "Updating Edge f4ce36b29cb59ade TM cr (type=2,good=1): EdgeResourceTM(epoch=3,bad=0) -> EdgeResourceTM(epoch=3,bad=0)"
/// Older firmware prints "blacklisted" instead of "bad".
pub static CHALLENGE_RESPONSE_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Updating Edge ([0-9A-Za-z]+) TM cr \(type=([0-9]+),good=([01])\): EdgeResourceTM\(epoch=([0-9]+),(?:blacklisted|bad)=([01])\) -> EdgeResourceTM\(epoch=([0-9]+),(?:blacklisted|bad)=([01])\)",
    )
});

/// "Updating Edge f4ce36b29cb59ade capability envmon TM throughput out (45 bytes/tick): N(mean=42.437496,var=425.286224,n=32) -> N(mean=43.242420,var=433.376831,n=33)"
pub static THROUGHPUT_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Updating Edge ([0-9A-Za-z]+) capability ([0-9A-Za-z_-]+) TM throughput ([A-Za-z]+) \(([0-9.]+) bytes/tick\): N\(mean=([0-9.-]+),var=([0-9.-]+),n=([0-9]+)\) -> N\(mean=([0-9.-]+),var=([0-9.-]+),n=([0-9]+)\)",
    )
});

/// "Updating Edge f4ce36b29cb59ade TM last ping: 272676 -> 275228"
pub static LAST_PING_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^Updating Edge ([0-9A-Za-z]+) TM last ping: ([0-9]+) -> ([0-9]+)")
});

/// "Updating Edge f4ce36b29cb59ade capability envmon TM task_submission (req=0, coap=69): Beta(alpha=7,beta=1) -> Beta(alpha=8,beta=1)"
pub static TASK_SUBMISSION_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Updating Edge ([0-9A-Za-z]+) capability ([0-9A-Za-z_-]+) TM task_submission \(req=(-?[0-9]+), coap=(-?[0-9]+)\): Beta\(alpha=([0-9]+),beta=([0-9]+)\) -> Beta\(alpha=([0-9]+),beta=([0-9]+)\)",
    )
});

/// "Updating Edge f4ce36b29cb59ade capability envmon TM task_result (result=0): Beta(alpha=7,beta=1) -> Beta(alpha=8,beta=1)"
pub static TASK_RESULT_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Updating Edge ([0-9A-Za-z]+) capability ([0-9A-Za-z_-]+) TM task_result \(result=(-?[0-9]+)\): Beta\(alpha=([0-9]+),beta=([0-9]+)\) -> Beta\(alpha=([0-9]+),beta=([0-9]+)\)",
    )
});

/// "Updating Edge f4ce36b29cb59ade capability envmon TM result_quality (good=1): Beta(alpha=7,beta=1) -> Beta(alpha=8,beta=1)"
pub static RESULT_QUALITY_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Updating Edge ([0-9A-Za-z]+) capability ([0-9A-Za-z_-]+) TM result_quality \(good=([01])\): Beta\(alpha=([0-9]+),beta=([0-9]+)\) -> Beta\(alpha=([0-9]+),beta=([0-9]+)\)",
    )
});

// --- applications: task lifecycle ---

/// "Generated message (len=64) for path from (51.28,-1.08) to (51.29,-1.07)"
pub static ROUTING_GENERATED: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Generated message \(len=([0-9]+)\) for path from \(([0-9.-]+),([0-9.-]+)\) to \(([0-9.-]+),([0-9.-]+)\)",
    )
});

/// "Generated message (len=10)"
pub static MONITORING_GENERATED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^Generated message \(len=([0-9]+)\)"));

/// "Message sent to coap://[fd00::1]:5683"
pub static TASK_SENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^Message sent to coap://\[([^\]]+)\](?::[0-9]+)?"));

// --- trust-band: banded trust sampling ---

/// "Trust value for edge f4ce36b29cb59ade and capability envmon=0.750000 at 3/10"
pub static BANDED_TRUST_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^Trust value for edge ([0-9A-Fa-f]+) and capability ([0-9A-Za-z_-]+)=([0-9.-]+) at ([0-9]+)/([0-9]+)",
    )
});

// --- trust: reputation dissemination ---

/// "Received trust info via POST from fd00::2 of length 40 (mid=7)"
pub static REPUTATION_RECEIVED: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^Received trust info via POST from (.+) of length [0-9]+ \(mid=([0-9]+)\)")
});

pub static REPUTATION_MISSING_KEY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^Missing public key, need to request it \(mid=([0-9]+)\)"));

pub static REPUTATION_OUT_OF_MEMORY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^res_trust_post_handler: out of memory \(mid=([0-9]+)\)"));

pub static REPUTATION_VERIFY_FAILED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^res_trust_post_handler: queue verify failed \(mid=([0-9]+)\)"));

pub static REPUTATION_QUEUED: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^res_trust_post_handler: successfully queued trust to be verified from (.+) \(mid=([0-9]+)\)",
    )
});

// --- keystore: certificate admission ---

/// Certificate admission shapes in evaluation order; the first match wins.
///
/// The verify lines accept both the corrected and the original firmware
/// spelling ("verified"/"verfied", "verify"/"verfiy").
pub static KEYSTORE_ADMISSION: LazyLock<Vec<(KeystoreAdmissionOutcome, Regex)>> =
    LazyLock::new(|| {
        vec![
            (
                KeystoreAdmissionOutcome::OutOfMemoryFirst,
                compile(r"^keystore_add: out of memory \(1st\) for ([0-9A-Fa-f]+)"),
            ),
            (
                KeystoreAdmissionOutcome::FailedToFreeSpace,
                compile(r"^Failed to free space for the certificate ([0-9A-Fa-f]+)"),
            ),
            (
                KeystoreAdmissionOutcome::OutOfMemorySecond,
                compile(r"^keystore_add: out of memory \(2nd\) for ([0-9A-Fa-f]+)"),
            ),
            (
                KeystoreAdmissionOutcome::EncodeFail,
                compile(r"^keystore_add: encode failed [0-9]+ > [0-9]+ for ([0-9A-Fa-f]+)"),
            ),
            (
                KeystoreAdmissionOutcome::EnqueueFail,
                compile(r"^keystore_add: enqueue failed for ([0-9A-Fa-f]+)"),
            ),
            (
                KeystoreAdmissionOutcome::VerifyFail,
                compile(
                    r"^Failed to ver(?:if|fi)y public key for ([0-9A-Fa-f]+) \(sig verification failed\)",
                ),
            ),
            (
                KeystoreAdmissionOutcome::Success,
                compile(r"^Succ?essfully veri?fied public key for ([0-9A-Fa-f]+)"),
            ),
        ]
    });

/// Evaluate an ordered shape table; returns the first entry that matches
/// together with its single identity capture.
pub fn first_match<'t, T: Copy>(table: &[(T, Regex)], text: &'t str) -> Option<(T, &'t str)> {
    table.iter().find_map(|(tag, regex)| {
        let caps = regex.captures(text)?;
        Some((*tag, caps.get(1)?.as_str()))
    })
}
