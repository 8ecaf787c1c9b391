use std::time::{Duration, Instant};
use tree_core::{
    split_override, DetectionLoop, FrameDriver, InitError, SimulatedHand, TreeConfig,
};
use tree_render::GpuState;
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

mod input;

// Simulated camera frame rate; slower than the display on purpose.
const DETECTION_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Settings come as `key=value` arguments, e.g. `gain=3 bias=0.18`
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = TreeConfig::default().with_overrides(args.iter().filter_map(|a| split_override(a)))?;

    let slot = FrameDriver::initial_slot(&config);
    let mut driver = FrameDriver::new(&config, slot.clone()).map_err(InitError::from)?;
    let mut detection =
        DetectionLoop::new(SimulatedHand::default(), FrameDriver::extractor(&config), slot);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Gesture Tree (native)")
        .build(&event_loop)?;

    let size = window.inner_size();
    let mut gpu = match pollster::block_on(GpuState::new(&window, size.width, size.height)) {
        Ok(g) => g,
        Err(e) => {
            let msg = driver.report_init_failure(InitError::Renderer(e.to_string()));
            anyhow::bail!(msg);
        }
    };
    let window = &window;
    // The simulated hand needs no model download
    driver.mark_detector_ready();
    log::info!("move the pointer to steer, hold the left button for a fist, scroll to open/close, `h` hides the hand");

    let start = Instant::now();
    let mut last_frame = start;
    let mut last_detection = start;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => gpu.resize_if_needed(size.width, size.height),
            WindowEvent::CloseRequested => elwt.exit(),
            other => {
                if input::apply_window_event(detection.detector_mut(), &other, window.inner_size())
                    == input::InputAction::Exit
                {
                    elwt.exit();
                }
            }
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if now - last_detection >= DETECTION_INTERVAL {
                last_detection = now;
                detection.detector_mut().frame_ready();
                detection.poll((now - start).as_secs_f64() * 1000.0);
            }

            let dt = now - last_frame;
            last_frame = now;
            match driver.render_to(dt, &mut gpu) {
                Some(Ok(())) | None => window.request_redraw(),
                Some(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    let size = window.inner_size();
                    gpu.resize_if_needed(size.width, size.height);
                    gpu.reconfigure();
                }
                Some(Err(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit();
                }
                Some(Err(e)) => log::warn!("[gpu] frame skipped: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
