//! Delta reconciliation.
//!
//! Providers disagree on what a fragment means. Some send true deltas
//! (only the new text), some send cumulative snapshots (everything so far),
//! and retried transports can resend a payload verbatim. The reconciler
//! turns all of these into plain append-only deltas.
//!
//! Rules, applied per fragment in order:
//!
//! 1. A raw payload identical to the previous one is a retransmission and
//!    is discarded. The first payload of a call is never a duplicate.
//! 2. A fragment that starts with the accumulated text (and is at least as
//!    long) is a snapshot; only the suffix past the accumulated text is new.
//! 3. Anything else is an incremental delta, appended as-is.
//! 4. The previous raw payload is updated even when the delta is empty.

/// How a fragment was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Byte-identical to the previous raw payload
    Duplicate,
    /// Cumulative snapshot; `delta` is the part past the accumulated text
    Snapshot { delta: String },
    /// New text appended verbatim
    Incremental { delta: String },
}

impl Reconciliation {
    /// Consume, returning the text to append, if any.
    pub fn into_delta(self) -> Option<String> {
        match self {
            Reconciliation::Duplicate => None,
            Reconciliation::Snapshot { delta } | Reconciliation::Incremental { delta } => {
                Some(delta).filter(|d| !d.is_empty())
            }
        }
    }
}

/// Running state of one streaming call.
///
/// Owned by the stream for the duration of the call; a new call starts
/// from a fresh reconciler.
#[derive(Debug, Clone, Default)]
pub struct DeltaReconciler {
    /// All logical text attributed to the current turn
    accumulated: String,
    /// Previous raw payload; unset until the first fragment
    last_raw: Option<String>,
}

impl DeltaReconciler {
    /// Create a reconciler for a new call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `raw` repeats the previous raw payload exactly.
    pub fn is_duplicate(&self, raw: &str) -> bool {
        self.last_raw.as_deref() == Some(raw)
    }

    /// Reconcile a decoded fragment against the accumulated text.
    ///
    /// `raw` is the payload the fragment was decoded from.
    pub fn reconcile(&mut self, raw: &str, fragment: &str) -> Reconciliation {
        if self.is_duplicate(raw) {
            return Reconciliation::Duplicate;
        }

        let outcome = if fragment.len() >= self.accumulated.len()
            && fragment.starts_with(self.accumulated.as_str())
        {
            let delta = fragment[self.accumulated.len()..].to_string();
            self.accumulated.clear();
            self.accumulated.push_str(fragment);
            Reconciliation::Snapshot { delta }
        } else {
            self.accumulated.push_str(fragment);
            Reconciliation::Incremental {
                delta: fragment.to_string(),
            }
        };

        self.last_raw = Some(raw.to_string());
        outcome
    }

    /// Text accumulated so far.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// The previous raw payload, if any fragment has been seen.
    pub fn last_raw_payload(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }
}
