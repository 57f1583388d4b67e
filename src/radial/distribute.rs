use super::tree::ProcessForest;

/// Reorders siblings so heavy subtrees are spread around the circle instead
/// of bunching up in one angular region.
///
/// Heavy siblings (weight > 1) are split into low/mid/high bands, the bands
/// are round-robined high-low-mid, and the result is spaced out at a fixed
/// interval between the light siblings. The output is always a permutation
/// of `sibling_ids`.
pub fn distribute(sibling_ids: &[u32], forest: &ProcessForest) -> Vec<u32> {
    let mut sorted = sibling_ids.to_vec();
    // Stable, so equal weights keep their input order.
    sorted.sort_by(|a, b| forest.weight(*b).cmp(&forest.weight(*a)));

    let (heavy, light): (Vec<u32>, Vec<u32>) =
        sorted.into_iter().partition(|&pid| forest.weight(pid) > 1);

    if heavy.is_empty() {
        return light;
    }

    let (low_split, high_split) = split_points(&heavy, forest);

    let mut low = Vec::new();
    let mut mid = Vec::new();
    let mut high = Vec::new();
    for &pid in &heavy {
        let weight = forest.weight(pid);
        if weight <= low_split {
            low.push(pid);
        } else if weight >= high_split {
            high.push(pid);
        } else {
            mid.push(pid);
        }
    }

    let interleaved = interleave(&high, &low, &mid);
    merge_at_interval(interleaved, light)
}

/// Coarse lower/upper split weights over the heavy set. Not a statistical
/// quartile: indexes are `mid/2` and `ceil(mid + mid/2)` with `mid = n/2`.
fn split_points(heavy: &[u32], forest: &ProcessForest) -> (u32, u32) {
    let mut weights: Vec<u32> = heavy.iter().map(|&pid| forest.weight(pid)).collect();
    weights.sort_unstable();

    let last = weights.len() - 1;
    let mid = weights.len() / 2;
    let low_index = mid / 2;
    // Runs one past the end for two heavy siblings.
    let high_index = (mid + mid.div_ceil(2)).min(last);

    (weights[low_index], weights[high_index])
}

fn interleave(first: &[u32], second: &[u32], third: &[u32]) -> Vec<u32> {
    let longest = first.len().max(second.len()).max(third.len());
    let mut out = Vec::with_capacity(first.len() + second.len() + third.len());
    for i in 0..longest {
        for band in [first, second, third] {
            if let Some(&pid) = band.get(i) {
                out.push(pid);
            }
        }
    }
    out
}

fn merge_at_interval(heavy: Vec<u32>, light: Vec<u32>) -> Vec<u32> {
    let total = heavy.len() + light.len();
    let interval = total.div_ceil(heavy.len());

    let mut out = Vec::with_capacity(total);
    let mut heavy = heavy.into_iter();
    let mut light = light.into_iter();

    for i in 0..total {
        if i % interval == 0
            && let Some(pid) = heavy.next()
        {
            out.push(pid);
        } else if let Some(pid) = light.next() {
            out.push(pid);
        }
    }

    // The schedule can leave slots empty once light runs out early.
    out.extend(heavy);
    out.extend(light);
    out
}
