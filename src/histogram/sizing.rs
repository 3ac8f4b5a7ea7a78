//! Local histogram replica sizing

/// Upper bound on replicas regardless of work-group size
const MAX_LOCAL_COPIES: u32 = 16;

/// Work-items per replica the heuristic aims for
const ITEMS_PER_COPY: u32 = 16;

/// Number of local histogram replicas to allocate.
///
/// `loc_mem_items` is the local memory budget and `hist_items` the histogram
/// size, both in local accumulator elements. The result `c` always satisfies
/// `1 <= c`, `c * hist_items <= loc_mem_items` and `c <= local_size`.
///
/// Returns `None` when not even one replica fits, in which case the caller
/// must accumulate in global memory.
pub fn get_local_hist_copies_count(
    loc_mem_items: u32,
    local_size: u32,
    hist_items: u32,
) -> Option<u32> {
    if hist_items == 0 || local_size == 0 {
        return None;
    }
    let fit = loc_mem_items / hist_items;
    if fit == 0 {
        return None;
    }
    let preferred = local_size.div_ceil(ITEMS_PER_COPY).clamp(1, MAX_LOCAL_COPIES);
    Some(preferred.min(fit).min(local_size))
}
