#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::{DetectionLoop, FrameDriver, InitError, TreeConfig, OVERRIDE_KEYS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod constants;
mod detector;
mod dom;
mod frame;
mod overlay;

use constants::{CANVAS_ID, DETECTION_INTERVAL_MS, VIDEO_ID};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gesture-tree-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
            if let Some(document) = dom::window_document() {
                overlay::show_error(&document, &e.to_string());
            }
        }
    });
    Ok(())
}

/// Read `?key=value` overrides from the page URL, e.g. `?gain=3&stale_after=off`.
fn load_config(window: &web::Window) -> anyhow::Result<TreeConfig> {
    let search = window.location().search().map_err(dom::js_err)?;
    let params = web::UrlSearchParams::new_with_str(&search).map_err(dom::js_err)?;
    let pairs: Vec<(&str, String)> = OVERRIDE_KEYS
        .iter()
        .filter_map(|key| params.get(key).map(|value| (*key, value)))
        .collect();
    let config = TreeConfig::default()
        .with_overrides(pairs.iter().map(|(k, v)| (*k, v.as_str())))?;
    Ok(config)
}

/// Record a start-up failure on the driver and surface it in the overlay.
fn fail(driver: &Rc<RefCell<FrameDriver>>, document: &web::Document, err: InitError) {
    let msg = driver.borrow_mut().report_init_failure(err);
    overlay::show_error(document, &msg);
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    overlay::show_loading(&document);

    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;
    let video: web::HtmlVideoElement = dom::element_by_id(&document, VIDEO_ID)?;
    dom::wire_canvas_resize(&canvas);

    let config = load_config(&window)?;
    let slot = FrameDriver::initial_slot(&config);
    let driver = FrameDriver::new(&config, slot.clone()).map_err(InitError::from)?;
    let driver = Rc::new(RefCell::new(driver));

    // Renderer first so the scene is ready the moment tracking starts
    let gpu = match frame::init_gpu(&canvas).await {
        Ok(g) => g,
        Err(e) => {
            fail(&driver, &document, InitError::Renderer(e.to_string()));
            return Ok(());
        }
    };
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        driver: driver.clone(),
        gpu,
        canvas: canvas.clone(),
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);

    if let Err(e) = camera::start_webcam(&video).await {
        fail(&driver, &document, InitError::Camera(e.to_string()));
        return Ok(());
    }

    let detector = match detector::MediaPipeDetector::load(video).await {
        Ok(d) => d,
        Err(e) => {
            fail(&driver, &document, InitError::Detector(e.to_string()));
            return Ok(());
        }
    };
    let detection = DetectionLoop::new(detector, FrameDriver::extractor(&config), slot);
    start_detection_timer(&window, detection)?;

    driver.borrow_mut().mark_detector_ready();
    overlay::hide(&document);
    Ok(())
}

// Detection is paced by its own interval so slow inference never stalls rendering
fn start_detection_timer(
    window: &web::Window,
    mut detection: DetectionLoop<detector::MediaPipeDetector>,
) -> anyhow::Result<()> {
    let performance = window.performance();
    let closure = Closure::wrap(Box::new(move || {
        let ts = performance.as_ref().map(|p| p.now()).unwrap_or_default();
        detection.poll(ts);
    }) as Box<dyn FnMut()>);
    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            DETECTION_INTERVAL_MS,
        )
        .map_err(dom::js_err)?;
    closure.forget();
    Ok(())
}
