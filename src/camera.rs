use crate::dom::js_err;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Ask for the webcam and start playing it into `video`.
///
/// Permission denial and missing devices both surface here, which is the
/// only place the host can tell "no camera" apart from "no hand".
pub async fn start_webcam(video: &web::HtmlVideoElement) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!("media devices unavailable: {:?}", e))?;

    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_err)?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    video.set_src_object(Some(&stream));
    let playing = video.play().map_err(js_err)?;
    JsFuture::from(playing).await.map_err(js_err)?;
    log::info!(
        "[camera] webcam streaming {}x{}",
        video.video_width(),
        video.video_height()
    );
    Ok(())
}
