//! Input pacing that mimics a human operator.

use crate::error::{BrowserError, Result};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Keystroke delay range in milliseconds.
const KEYSTROKE_DELAY_MS: (u64, u64) = (60, 180);
/// Probability of a longer pause after a keystroke.
const HESITATION_CHANCE: f64 = 0.04;
/// Length of that pause.
const HESITATION: Duration = Duration::from_millis(400);
/// Curve resolution for mouse movement.
const GLIDE_STEPS: u32 = 15;
/// Delay range between curve points in milliseconds.
const GLIDE_STEP_DELAY_MS: (u64, u64) = (10, 20);
/// Spread of the random control point around the path midpoint.
const CONTROL_JITTER: f64 = 50.0;

/// Click an element and type into it one character at a time with
/// uneven keystroke pacing.
pub async fn type_like_human(element: &Element, text: &str) -> Result<()> {
    element
        .click()
        .await
        .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

    for c in text.chars() {
        element
            .type_str(c.to_string())
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let delay = rand::thread_rng().gen_range(KEYSTROKE_DELAY_MS.0..=KEYSTROKE_DELAY_MS.1);
        sleep(Duration::from_millis(delay)).await;

        let hesitate = rand::thread_rng().gen_bool(HESITATION_CHANCE);
        if hesitate {
            sleep(HESITATION).await;
        }
    }
    Ok(())
}

/// Move the cursor from `from` to `to` along a quadratic Bezier curve
/// with a randomly displaced control point.
pub async fn glide_mouse(page: &Page, from: (f64, f64), to: (f64, f64)) -> Result<()> {
    let control = {
        let mut rng = rand::thread_rng();
        (
            (from.0 + to.0) / 2.0 + rng.gen_range(-CONTROL_JITTER..=CONTROL_JITTER),
            (from.1 + to.1) / 2.0 + rng.gen_range(-CONTROL_JITTER..=CONTROL_JITTER),
        )
    };

    for step in 0..=GLIDE_STEPS {
        let t = f64::from(step) / f64::from(GLIDE_STEPS);
        let (x, y) = bezier_point(t, from, control, to);

        let event = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        page.execute(event)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let delay = rand::thread_rng().gen_range(GLIDE_STEP_DELAY_MS.0..=GLIDE_STEP_DELAY_MS.1);
        sleep(Duration::from_millis(delay)).await;
    }
    Ok(())
}

/// Quadratic Bezier interpolation between `from` and `to` through `control`.
fn bezier_point(t: f64, from: (f64, f64), control: (f64, f64), to: (f64, f64)) -> (f64, f64) {
    let inv = 1.0 - t;
    (
        inv * inv * from.0 + 2.0 * inv * t * control.0 + t * t * to.0,
        inv * inv * from.1 + 2.0 * inv * t * control.1 + t * t * to.1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints() {
        let from = (100.0, 100.0);
        let control = (300.0, 50.0);
        let to = (500.0, 400.0);

        assert_eq!(bezier_point(0.0, from, control, to), from);
        assert_eq!(bezier_point(1.0, from, control, to), to);
    }

    #[test]
    fn test_bezier_straight_line_midpoint() {
        let from = (0.0, 0.0);
        let to = (100.0, 200.0);
        let control = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);

        let (x, y) = bezier_point(0.5, from, control, to);
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bezier_stays_in_hull() {
        let from: (f64, f64) = (100.0, 100.0);
        let control: (f64, f64) = (250.0, 30.0);
        let to: (f64, f64) = (400.0, 300.0);

        let min_x = from.0.min(control.0).min(to.0);
        let max_x = from.0.max(control.0).max(to.0);
        let min_y = from.1.min(control.1).min(to.1);
        let max_y = from.1.max(control.1).max(to.1);

        for step in 0..=GLIDE_STEPS {
            let t = f64::from(step) / f64::from(GLIDE_STEPS);
            let (x, y) = bezier_point(t, from, control, to);
            assert!(x >= min_x && x <= max_x);
            assert!(y >= min_y && y <= max_y);
        }
    }

    #[test]
    fn test_pacing_constants() {
        assert!(KEYSTROKE_DELAY_MS.0 < KEYSTROKE_DELAY_MS.1);
        assert!(GLIDE_STEP_DELAY_MS.0 < GLIDE_STEP_DELAY_MS.1);
        assert!(HESITATION_CHANCE > 0.0 && HESITATION_CHANCE < 1.0);
        assert!(GLIDE_STEPS > 0);
    }
}
