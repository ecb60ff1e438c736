//! Assembly of a small spine model.

use anyhow::Result;
use hm_core::{ModelId, Vec3};
use hm_model::{Marker, ModelTree};

use crate::elements::{Cable, Rod};

/// Build `segments` vertebrae, each a composite holding two rods and a
/// cable, all under one `spine` root.  A marker sits at each end of the spine.
pub fn build_spine(tree: &mut ModelTree, segments: usize) -> Result<ModelId> {
    let root = tree.insert_composite("spine".parse()?);

    for i in 0..segments {
        let x = i as f64 * 0.3;
        let segment = tree.insert_composite(format!("segment s{i}").parse()?);

        let rod_a = tree.insert_tagged(
            Rod::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x, 0.2, 0.1), 0.2),
            "rod A".parse()?,
        );
        let rod_b = tree.insert_tagged(
            Rod::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x, 0.2, -0.1), 0.2),
            "rod B".parse()?,
        );
        let cable = tree.insert_tagged(Cable::new(0.3, 0.1, 0.5), "cable".parse()?);

        tree.add_child(segment, rod_a)?;
        tree.add_child(segment, rod_b)?;
        tree.add_child(segment, cable)?;
        tree.add_child(root, segment)?;
    }

    let red = Vec3::new(1.0, 0.0, 0.0);
    let tip = segments.saturating_sub(1) as f64 * 0.3;
    tree.add_marker(root, Marker::new(Vec3::ZERO, red, 0).with_tags("head".parse()?))?;
    tree.add_marker(root, Marker::new(Vec3::new(tip, 0.0, 0.0), red, 1).with_tags("tail".parse()?))?;

    Ok(root)
}
