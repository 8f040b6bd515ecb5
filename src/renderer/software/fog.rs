//! Distance-keyed fog.
//!
//! One curve serves the whole pipeline: zero until the start distance,
//! linear up to the maximum opacity at the end distance, flat beyond.
//! Floor/ceiling rows key it by screen-space distance from the horizon,
//! sprites by their camera-space depth.

use crate::renderer::RenderOpts;

/// Fog opacity for a point at `dist` grid units.
#[inline]
pub fn fog_alpha(dist: f32, opts: &RenderOpts) -> f32 {
    if dist <= opts.fog_start {
        return 0.0;
    }
    let t = ((dist - opts.fog_start) / (opts.fog_end - opts.fog_start)).min(1.0);
    t * opts.fog_max_alpha
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
