/// Colour of a point drawn at pixel `(x, y)` at `time` seconds.
///
/// Channels drift slowly over time and across the canvas; each stays in `[0, 1]`.
pub fn glow_color(time: f32, x: f32, y: f32) -> [f32; 3] {
    let r = 0.6 + 0.4 * (time * 1.7 + x * 0.02).sin();
    let g = 0.6 + 0.4 * (time * 1.3 + y * 0.02 + 1.7).sin();
    let b = 0.7 + 0.3 * (time * 1.1 + 3.1).sin();
    [r, g, b]
}

/// CSS `rgba(...)` string for a unit-range colour.
pub fn rgba(color: [f32; 3], alpha: f32) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgba({}, {}, {}, {:.2})", r, g, b, alpha.clamp(0.0, 1.0))
}

/// Maps a clip-space point back to canvas pixels (Y down).
pub fn clip_to_canvas(clip: [f32; 2], width: f64, height: f64) -> (f64, f64) {
    let [x, y] = clip;
    (
        (x as f64 + 1.0) * 0.5 * width,
        (1.0 - y as f64) * 0.5 * height,
    )
}
