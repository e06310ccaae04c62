use crate::aggregate::AggregatedOutputSet;
use crate::error::NoRuleFired;

/// Centre of gravity of the sampled output set: `Σ x·μ(x) / Σ μ(x)`.
///
/// A set with zero total membership has no centroid.
pub fn centroid(set: &AggregatedOutputSet) -> Result<f64, NoRuleFired> {
    let (moment, area) = set
        .points()
        .fold((0.0, 0.0), |(m, a), (x, mu)| (m + x * mu, a + mu));
    if area <= 0.0 {
        return Err(NoRuleFired);
    }
    let domain = set.domain();
    Ok((moment / area).clamp(domain.min, domain.max))
}
