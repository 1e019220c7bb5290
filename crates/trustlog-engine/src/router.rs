//! Module router: a fixed, order-sensitive dispatch table.
//!
//! Routes are looked up by exact module name; within a route the rules are
//! evaluated top to bottom and the first matching predicate selects the
//! handler. Unknown modules and unmatched messages dispatch to nothing.

/// Message test of one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    StartsWith(&'static str),
    /// Starts with the prefix and contains the needle anywhere
    StartsWithContaining {
        prefix: &'static str,
        needle: &'static str,
    },
    Equals(&'static str),
    Any,
}

impl Predicate {
    pub fn matches(&self, message: &str) -> bool {
        match self {
            Predicate::StartsWith(prefix) => message.starts_with(prefix),
            Predicate::StartsWithContaining { prefix, needle } => {
                message.starts_with(prefix) && message.contains(needle)
            }
            Predicate::Equals(text) => message == *text,
            Predicate::Any => true,
        }
    }
}

/// Record handlers, one per recognized line family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    ChallengeResponseUpdate,
    ThroughputUpdate,
    LastPingUpdate,
    TaskSubmissionUpdate,
    TaskResultUpdate,
    ResultQualityUpdate,
    RoutingGenerated,
    MonitoringGenerated,
    TaskSent,
    BandedTrustValue,
    ReputationReceived,
    ReputationMissingKey,
    ReputationOutOfMemory,
    ReputationVerifyFailed,
    ReputationQueued,
    ReputationSend,
    KeystoreAdmission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    pub handler: Handler,
}

const fn rule(predicate: Predicate, handler: Handler) -> Rule {
    Rule { predicate, handler }
}

/// Session state switched on by the first record of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    BandedSampling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub module: &'static str,
    pub activates: Option<Activation>,
    pub rules: &'static [Rule],
}

const UPDATING_EDGE: &str = "Updating Edge";

const fn trust_model(needle: &'static str, handler: Handler) -> Rule {
    rule(
        Predicate::StartsWithContaining {
            prefix: UPDATING_EDGE,
            needle,
        },
        handler,
    )
}

pub static ROUTES: &[Route] = &[
    Route {
        module: "trust-comm",
        activates: None,
        rules: &[
            trust_model("TM cr", Handler::ChallengeResponseUpdate),
            trust_model("TM throughput", Handler::ThroughputUpdate),
            trust_model("TM last ping", Handler::LastPingUpdate),
            trust_model("TM task_submission", Handler::TaskSubmissionUpdate),
            trust_model("TM task_result", Handler::TaskResultUpdate),
            trust_model("TM result_quality", Handler::ResultQualityUpdate),
        ],
    },
    // Challenge-response application output carries nothing we aggregate
    Route {
        module: "A-cr",
        activates: None,
        rules: &[],
    },
    Route {
        module: "A-routing",
        activates: None,
        rules: &[
            rule(Predicate::StartsWith("Generated message"), Handler::RoutingGenerated),
            rule(Predicate::StartsWith("Message sent to"), Handler::TaskSent),
        ],
    },
    Route {
        module: "A-envmon",
        activates: None,
        rules: &[
            rule(Predicate::StartsWith("Generated message"), Handler::MonitoringGenerated),
            rule(Predicate::StartsWith("Message sent to"), Handler::TaskSent),
        ],
    },
    Route {
        module: "trust-band",
        activates: Some(Activation::BandedSampling),
        rules: &[rule(
            Predicate::StartsWith("Trust value for edge"),
            Handler::BandedTrustValue,
        )],
    },
    Route {
        module: "trust",
        activates: None,
        rules: &[
            rule(
                Predicate::StartsWith("Received trust info via POST from"),
                Handler::ReputationReceived,
            ),
            rule(
                Predicate::StartsWith("Missing public key, need to request it"),
                Handler::ReputationMissingKey,
            ),
            rule(
                Predicate::StartsWith("res_trust_post_handler: out of memory"),
                Handler::ReputationOutOfMemory,
            ),
            rule(
                Predicate::StartsWith("res_trust_post_handler: queue verify failed"),
                Handler::ReputationVerifyFailed,
            ),
            rule(
                Predicate::StartsWith(
                    "res_trust_post_handler: successfully queued trust to be verified from",
                ),
                Handler::ReputationQueued,
            ),
            rule(
                Predicate::Equals("Periodic broadcast of trust information disabled"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::Equals("Cannot allocate memory for periodic_action trust request"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::StartsWith("trust periodic_action: serialise_trust failed"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::StartsWith("trust periodic_action: Unable to sign message"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::StartsWith("trust_tx_continue: Sign of trust information failed"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::StartsWith("trust_tx_continue: coap_send_request trust failed"),
                Handler::ReputationSend,
            ),
            rule(
                Predicate::StartsWith("trust_tx_continue: coap_send_request trust done"),
                Handler::ReputationSend,
            ),
        ],
    },
    // Every keystore line is tried against the admission table
    Route {
        module: "keystore",
        activates: None,
        rules: &[rule(Predicate::Any, Handler::KeystoreAdmission)],
    },
];

/// Where one record goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub route: &'static Route,
    /// None when the module is known but no rule matches the message
    pub handler: Option<Handler>,
}

pub fn find_route(module: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.module == module)
}

/// Route a record; None for modules without a route
pub fn dispatch(module: &str, message: &str) -> Option<Dispatch> {
    let route = find_route(module)?;
    let handler = route
        .rules
        .iter()
        .find(|rule| rule.predicate.matches(message))
        .map(|rule| rule.handler);

    Some(Dispatch { route, handler })
}
