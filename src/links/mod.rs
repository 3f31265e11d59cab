//! Link classification and liveness probing
//!
//! This module turns the raw `href` values collected from a page into a
//! [`LinkTally`](crate::report::LinkTally):
//! - Resolving each href as an absolute URL (others are skipped)
//! - Classifying it internal/external against the page's host
//! - Probing it with a HEAD request, concurrently and with a bounded fan-out
//!
//! Individual unreachable links are data, not errors. Only a breakdown of
//! the probing machinery itself fails the count.

mod classify;
mod counter;
mod prober;

pub use classify::{classify_link, ClassifiedLink, LinkKind};
pub use counter::LinkCounter;
pub use prober::{HttpProber, LinkProber, ProbeStatus};
