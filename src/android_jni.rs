//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.

use jni::JNIEnv;
use jni::objects::{JClass, JString};
use jni::sys::{jint, jstring};

/// Returns the library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnbyturn_app_RustBridge_version(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    let version = crate::VERSION;
    env.new_string(version)
        .expect("failed to create Java string")
        .into_raw()
}

/// Routes `log` records to logcat. Safe to call more than once.
/// Maps to: RustBridge.initLogging(level: Int)
///
/// Levels: 0 = error, 1 = warn, 2 = info (default), 3 = debug, 4 = trace.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnbyturn_app_RustBridge_initLogging(
    _env: JNIEnv,
    _class: JClass,
    level: jint,
) {
    let filter = level_filter(level);

    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(filter)
            .with_tag("TurnByTurn"),
    );

    log::set_max_level(filter);
    log::info!("Logging initialised at {filter}");
}

/// Instruction texts for a route given as JSON.
/// Maps to: RustBridge.instructions(routeJson: String) -> String
///
/// Returns a JSON array of strings, or `{"error": "..."}` on failure.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_turnbyturn_app_RustBridge_instructions(
    mut env: JNIEnv,
    _class: JClass,
    route_json: JString,
) -> jstring {
    let input: String = match env.get_string(&route_json) {
        Ok(s) => s.into(),
        Err(e) => {
            log::warn!("instructions: cannot read argument: {e}");
            return std::ptr::null_mut();
        }
    };

    let output = crate::route::instructions_json(&input)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string());

    env.new_string(output)
        .expect("failed to create Java string")
        .into_raw()
}

fn level_filter(level: jint) -> log::LevelFilter {
    match level {
        i32::MIN..=0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
