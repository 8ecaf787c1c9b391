use crate::constants::MAX_FRAME_DT_SEC;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tree_core::FrameDriver;
use tree_render::GpuState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub driver: Rc<RefCell<FrameDriver>>,
    pub gpu: GpuState<'a>,
    pub canvas: web::HtmlCanvasElement,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).min(Duration::from_secs_f32(MAX_FRAME_DT_SEC));
        self.last_instant = now;

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        match self.driver.borrow_mut().render_to(dt, &mut self.gpu) {
            None | Some(Ok(())) => {}
            Some(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.gpu.reconfigure();
            }
            Some(Err(e)) => log::error!("[gpu] render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> anyhow::Result<GpuState<'static>> {
    // The canvas target is owned by the surface, so no leak is needed for 'static
    GpuState::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        canvas.width(),
        canvas.height(),
    )
    .await
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
