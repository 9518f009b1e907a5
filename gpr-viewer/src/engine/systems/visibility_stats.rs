use bevy::prelude::*;
use constants::render_settings::STATS_NOTIFICATION_INTERVAL;

use crate::engine::assets::point_cloud_data::PointCloudData;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::loading::dataset_loader::DatasetLoader;
use crate::rpc::web_rpc::WebRpcInterface;

/// Points passing the current filter and clip planes.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityStats {
    pub visible: usize,
    pub total: usize,
}

/// Count points the shader would draw, using the same tests on the CPU.
pub fn count_visible(data: &PointCloudData, state: &ViewerState) -> VisibilityStats {
    VisibilityStats {
        visible: data
            .points()
            .filter(|(position, colour)| state.point_visible(*position, *colour))
            .count(),
        total: data.len(),
    }
}

/// Recount after filter changes, at most once per notification interval.
pub fn visibility_stats_system(
    viewer_state: Res<ViewerState>,
    loader: Res<DatasetLoader>,
    clouds: Res<Assets<PointCloudData>>,
    mut stats: ResMut<VisibilityStats>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut dirty: Local<bool>,
    mut last_count_time: Local<f32>,
    time: Res<Time>,
) {
    if viewer_state.is_changed() || loader.is_changed() {
        *dirty = true;
    }

    let now = time.elapsed_secs();
    if !*dirty || now - *last_count_time < STATS_NOTIFICATION_INTERVAL {
        return;
    }

    let Some(data) = loader.active().and_then(|handle| clouds.get(handle)) else {
        stats.set_if_neq(VisibilityStats::default());
        return;
    };

    let counted = count_visible(data, &viewer_state);
    *dirty = false;
    *last_count_time = now;

    if stats.set_if_neq(counted) {
        rpc_interface.send_notification(
            "visible_points",
            serde_json::json!({
                "visible": counted.visible,
                "total": counted.total,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filtering::clip_planes::ClipAxis;
    use crate::engine::filtering::intensity::IntensityScheme;

    #[test]
    fn counts_follow_filter_and_planes() {
        let data = PointCloudData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
            colours: vec![[0.1, 0.0, 0.0], [0.5, 0.0, 0.0], [0.9, 0.0, 0.0]],
        };
        let mut state = ViewerState::default();
        state.reset_for_dataset("ramp", data.bounds().unwrap(), IntensityScheme::Direct);

        assert_eq!(
            count_visible(&data, &state),
            VisibilityStats {
                visible: 3,
                total: 3
            }
        );

        state.set_intensity_range(0.4, 1.0).unwrap();
        assert_eq!(count_visible(&data, &state).visible, 2);

        state.set_clip_offset(ClipAxis::X, 1.5);
        assert_eq!(count_visible(&data, &state).visible, 1);
    }
}
