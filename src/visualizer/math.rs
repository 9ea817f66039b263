//! Small numeric helpers shared by the effects.

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly resample `data` to exactly `n` points.
///
/// Endpoints are preserved for `n >= 2`; an empty input yields zeros.
pub fn resample(data: &[f32], n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if data.is_empty() {
        return vec![0.0; n];
    }
    if data.len() == n {
        return data.to_vec();
    }
    if n == 1 {
        return vec![data[0]];
    }

    let last = data.len() - 1;
    (0..n)
        .map(|i| {
            // Exact integer numerator keeps the final position exactly on `last`.
            let pos = (i * last) as f32 / (n - 1) as f32;
            let idx = pos as usize;
            if idx >= last {
                data[last]
            } else {
                lerp(data[idx], data[idx + 1], pos - idx as f32)
            }
        })
        .collect()
}

/// One pass of the 3-tap box blur `0.5·self + 0.25·(left + right)`, in place.
///
/// Endpoints are left as they are.
pub fn box_blur_in_place(data: &mut [f32]) {
    for i in 1..data.len().saturating_sub(1) {
        data[i] = data[i] * 0.5 + (data[i - 1] + data[i + 1]) * 0.25;
    }
}
