use crate::constants::{HAND_MODEL_URL, LANDMARK_STRIDE, MEDIAPIPE_WASM_ROOT};
use crate::dom::js_err;
use tree_core::{DetectorPoll, HandDetector, HandPose};
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(module = "/web/hand_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = createHandLandmarker)]
    async fn create_hand_landmarker(wasm_root: &str, model_url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = detectHand)]
    fn detect_hand(
        landmarker: &JsValue,
        video: &web::HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<Option<js_sys::Float32Array>, JsValue>;
}

/// Hand detector backed by the browser's MediaPipe hand landmarker.
pub struct MediaPipeDetector {
    landmarker: JsValue,
    video: web::HtmlVideoElement,
    last_video_time: f64,
    warned: bool,
}

impl MediaPipeDetector {
    /// Download the model and build a single-hand, video-mode landmarker.
    /// There is no timeout: a slow download keeps the page loading.
    pub async fn load(video: web::HtmlVideoElement) -> anyhow::Result<Self> {
        let landmarker = create_hand_landmarker(MEDIAPIPE_WASM_ROOT, HAND_MODEL_URL)
            .await
            .map_err(js_err)?;
        log::info!("[detect] hand landmarker ready");
        Ok(Self {
            landmarker,
            video,
            last_video_time: -1.0,
            warned: false,
        })
    }
}

impl HandDetector for MediaPipeDetector {
    fn detect(&mut self, timestamp_ms: f64) -> DetectorPoll {
        // Only process each camera frame once
        let video_time = self.video.current_time();
        if video_time == self.last_video_time {
            return DetectorPoll::Pending;
        }
        self.last_video_time = video_time;

        match detect_hand(&self.landmarker, &self.video, timestamp_ms) {
            Ok(None) => DetectorPoll::NoHand,
            Ok(Some(flat)) => match HandPose::from_flat(&flat.to_vec(), LANDMARK_STRIDE) {
                Ok(pose) => DetectorPoll::Hand(pose),
                Err(e) => {
                    log::debug!("[detect] dropped malformed result: {e}");
                    DetectorPoll::Pending
                }
            },
            Err(e) => {
                // Signals stop updating; the driver's staleness policy takes over
                if !self.warned {
                    log::warn!("[detect] detection failed: {:?}", e);
                    self.warned = true;
                }
                DetectorPoll::Pending
            }
        }
    }
}
