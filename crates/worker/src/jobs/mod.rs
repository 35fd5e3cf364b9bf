//! Long-running job loops. Each runs until its `CancellationToken` fires and
//! awaits one run to completion before scheduling the next.

pub mod classification;
pub mod quota_reset;
