/// Critically damped spring toward `target`, the same curve as Unity's
/// `Mathf.SmoothDamp`. `velocity` carries over between calls.
///
/// `smooth_time` is roughly the time to reach the target, in seconds.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;

    let mut output = target + (change + temp) * exp;

    // Never overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// Index of the screen-sized "level" `target` falls in.
///
/// The half-level bias follows the sign of the raw target, so levels are not
/// symmetric around zero when `level_offset` is set.
pub fn level_index(target: f32, camera_size: f32, percent: f32, level_offset: f32) -> i32 {
    let span = camera_size * percent;
    if span <= 0.0 {
        return 0;
    }

    let mut level = (target - level_offset) / span;
    if target < 0.0 {
        level -= 0.5;
    } else {
        level += 0.5;
    }
    level.trunc() as i32
}

/// Camera position that frames the level `target` is in
pub fn level_destination(target: f32, camera_size: f32, percent: f32, level_offset: f32) -> f32 {
    let level = level_index(target, camera_size, percent, level_offset) as f32;
    level * camera_size * percent + level_offset
}
