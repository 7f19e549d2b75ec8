use anyhow::{Context, Result};
use std::time::Duration;
use zoom_config::ZoomConfig;
use zoom_transition::{Clock, DurationOverride, StyledElement, SystemClock, Zoom, ZoomProps};

/// Frame interval used to sample the scale while a transition runs.
const FRAME_MS: f64 = 16.0;

/// Scripted intent changes as (time in ms, target visibility). The toggle at
/// 100ms reverses the first enter half way through.
const SCRIPT: &[(f64, bool)] = &[(0.0, true), (100.0, false), (400.0, true), (1200.0, false)];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,zoom_transition=debug".into()),
        )
        .init();

    let config = ZoomConfig::load();
    tracing::info!(
        enter = ?config.zoom.enter,
        exit = ?config.zoom.exit,
        easing = config.default_easing_css(),
        "loaded zoom configuration"
    );

    let timeout = match std::env::args().nth(1) {
        Some(ms) => {
            let ms: f64 = ms.parse().with_context(|| format!("invalid timeout `{ms}`"))?;
            DurationOverride::uniform(ms)?
        }
        None => DurationOverride::Theme,
    };

    let clock = SystemClock::new();
    let element = StyledElement::new("dialog").with_size(320.0, 240.0);
    let props = ZoomProps::new(false)
        .timeout(timeout)
        .on_entered(|el: &StyledElement| tracing::info!(id = el.id(), "shown"))
        .on_exited(|el: &StyledElement| tracing::info!(id = el.id(), "hidden"));
    let mut zoom = Zoom::mount_with(element, props, clock, &config);

    let timings = zoom.timings();
    tracing::info!(
        enter_ms = timings.enter.duration_ms,
        exit_ms = timings.exit.duration_ms,
        "resolved timings"
    );

    let mut script = SCRIPT.iter().peekable();
    loop {
        let now = clock.now_ms();
        while let Some(&&(at, target)) = script.peek() {
            if at > now {
                break;
            }
            tracing::info!(at_ms = now.round(), target, "set intent");
            zoom.set_in(target);
            script.next();
        }

        zoom.poll();
        for recorded in zoom.drain_events() {
            tracing::info!(event = %recorded.event, at_ms = recorded.at_ms.round(), "lifecycle");
        }

        if zoom.phase().is_transient() {
            tracing::debug!(scale = zoom.current_scale(), style = %zoom.style(), "frame");
        }

        let next_toggle = script.peek().map(|&&(at, _)| at);
        if next_toggle.is_none() && !zoom.phase().is_transient() {
            break;
        }

        // Wake for the next frame, deadline or scripted toggle, whichever is first
        let mut wake = now + FRAME_MS;
        if let Some(deadline) = zoom.next_deadline() {
            wake = wake.min(deadline);
        }
        if let Some(at) = next_toggle {
            wake = wake.min(at);
        }
        let sleep_ms = (wake - clock.now_ms()).max(0.0);
        std::thread::sleep(Duration::from_secs_f64(sleep_ms / 1000.0));
    }

    let element = zoom.unmount();
    tracing::info!(id = element.id(), style = %element.style(), "final inline style");
    Ok(())
}
