//! Merges detector recommendations into one label set.

use tracing::{debug, warn};

use crate::detectors::{DetectContext, Detector};
use crate::labels::{Detection, LabelSet};

/// Run every detector in order and collect the labels that should be present.
///
/// Absent and abstaining detectors contribute nothing. A failing detector is
/// logged and skipped for this cycle, so its key is missing from the result.
/// On duplicate keys the later detector wins.
pub async fn aggregate(detectors: &[Box<dyn Detector>], ctx: &DetectContext<'_>) -> LabelSet {
    let mut labels = LabelSet::new();

    for detector in detectors {
        match detector.detect(ctx).await {
            Ok(result) => {
                debug!(node = ctx.node_name, result = %result, "Detector finished");
                match result.detection {
                    Detection::Present(value) => {
                        labels.insert(result.key, value);
                    }
                    Detection::Absent | Detection::Abstain => {}
                }
            }
            Err(e) => {
                warn!(
                    node = ctx.node_name,
                    label = detector.key(),
                    error = %e,
                    "Detector failed, skipping it for this cycle"
                );
            }
        }
    }

    labels
}
