// Web host constants: DOM ids, detection cadence, and tracker assets.
// Kept free of crate imports so host-side tests can `include!` this file.

// Element ids expected in index.html
pub const CANVAS_ID: &str = "app-canvas";
pub const VIDEO_ID: &str = "webcam";
pub const LOADING_ID: &str = "loading";

// Detection runs on its own timer, decoupled from requestAnimationFrame
pub const DETECTION_INTERVAL_MS: i32 = 33;

// Tracker assets (hand landmarker, float16 model)
pub const MEDIAPIPE_WASM_ROOT: &str =
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.8/wasm";
pub const HAND_MODEL_URL: &str = "https://storage.googleapis.com/mediapipe-models/hand_landmarker/hand_landmarker/float16/1/hand_landmarker.task";

// The bridge returns x, y, z per landmark
pub const LANDMARK_STRIDE: usize = 3;

// Longest frame step handed to the driver; background tabs stall RAF
pub const MAX_FRAME_DT_SEC: f32 = 0.25;

pub const LOADING_TEXT: &str = "Loading hand tracker and 3D scene…";
