//! Work-group execution for the CPU runtime
//!
//! Work-groups are independent, so they are spread over the rayon pool. Inside
//! a work-group the work-items are run one after another, region by region:
//! all of them finish a region before the next one starts, which is exactly
//! the guarantee a work-group barrier gives. Steps that share a region run
//! back to back for each work-item, so a kernel that forgets a barrier
//! misbehaves here the same way it would on a device.

use crate::runtime::local::LocalScope;
use crate::runtime::nd_range::GroupCounters;
use crate::runtime::{Kernel, LaunchReport, NdItem, NdRange};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Run every work-group of `nd_range` to completion.
pub(super) fn launch<S>(kernel: &Kernel<'_, S>, nd_range: NdRange) -> LaunchReport {
    let groups = nd_range.groups();

    #[cfg(feature = "rayon")]
    {
        (0..groups)
            .into_par_iter()
            .map(|group_id| run_group(kernel, nd_range, group_id))
            .reduce(LaunchReport::default, LaunchReport::merge)
    }

    #[cfg(not(feature = "rayon"))]
    {
        (0..groups)
            .map(|group_id| run_group(kernel, nd_range, group_id))
            .fold(LaunchReport::default(), LaunchReport::merge)
    }
}

fn run_group<S>(kernel: &Kernel<'_, S>, nd_range: NdRange, group_id: usize) -> LaunchReport {
    let local_range = nd_range.local();
    let counters = GroupCounters::default();

    // Local memory lives exactly as long as this frame.
    let mut scope = LocalScope::new(kernel.local_mem_bytes());
    let state = kernel.setup(&mut scope);

    for region in kernel.regions() {
        for local_id in 0..local_range {
            let item = NdItem::new(group_id, local_id, local_range, nd_range.groups(), &counters);
            for step in region {
                step(&item, &state);
            }
        }
    }
    drop(state);

    log::trace!(
        "kernel '{}' group {} done: {} device atomics, {} local atomics",
        kernel.name(),
        group_id,
        counters.device_atomics(),
        counters.local_atomics()
    );

    LaunchReport {
        groups: 1,
        work_items: local_range,
        barriers_per_group: kernel.barrier_count(),
        device_atomics: counters.device_atomics(),
        local_atomics: counters.local_atomics(),
    }
}
