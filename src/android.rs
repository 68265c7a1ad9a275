//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::{jfloat, jstring};
use jni::JNIEnv;

use crate::{config_from_json, render_bytes_to_svg, RenderOptions, ViewSize};

/// Render MIDI bytes to SVG.
///
/// Called from Kotlin as:
///   external fun renderBytes(data: ByteArray, configJson: String?, width: Float, height: Float, pixelRatio: Float): String?
#[no_mangle]
pub extern "system" fn Java_com_noteflake_app_NoteFlake_renderBytes(
    mut env: JNIEnv,
    _class: JClass,
    data: JByteArray,
    config_json: JString,
    width: jfloat,
    height: jfloat,
    pixel_ratio: jfloat,
) -> jstring {
    let bytes = match env.convert_byte_array(&data) {
        Ok(b) => b,
        Err(_) => return std::ptr::null_mut(),
    };

    let json: Option<String> = if config_json.is_null() {
        None
    } else {
        env.get_string(&config_json).ok().map(|s| s.into())
    };

    let config = match config_from_json(json.as_deref()) {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };

    let view = ViewSize::from_window(width as f64, height as f64);
    let options = RenderOptions {
        pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio as f64 } else { 1.0 },
        ..RenderOptions::default()
    };

    match render_bytes_to_svg(&bytes, view, &config, &options) {
        Ok(svg) => match env.new_string(&svg) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}
