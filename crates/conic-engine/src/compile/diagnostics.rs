//! Shader compilation diagnostics.
//!
//! Each compiled shader module spawns a one-shot task that waits for the
//! backend's compilation info, logs every message and hands the batch to the
//! registered sink. Delivery has no ordering relative to painted frames: a
//! report may arrive several frames after its object was first drawn.

use std::sync::{Arc, RwLock};

/// Message severity reported by the shader compiler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One compiler message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line and column, when the backend reports a location.
    pub location: Option<(u32, u32)>,
}

/// Receives `(diagnostics, shader_source)` once per compiled module.
pub type DiagnosticSink = Arc<dyn Fn(&[Diagnostic], &str) + Send + Sync>;

static SINK: RwLock<Option<DiagnosticSink>> = RwLock::new(None);

/// Registers the process-wide diagnostic sink, replacing any previous one.
pub fn set_diagnostic_sink(sink: impl Fn(&[Diagnostic], &str) + Send + Sync + 'static) {
    match SINK.write() {
        Ok(mut slot) => *slot = Some(Arc::new(sink)),
        Err(_) => log::error!("diagnostic sink lock poisoned; sink not replaced"),
    }
}

/// Removes the registered sink. Diagnostics are still logged.
pub fn clear_diagnostic_sink() {
    if let Ok(mut slot) = SINK.write() {
        *slot = None;
    }
}

fn current_sink() -> Option<DiagnosticSink> {
    SINK.read().ok().and_then(|slot| slot.clone())
}

fn convert(info: wgpu::CompilationInfo) -> Vec<Diagnostic> {
    info.messages
        .into_iter()
        .map(|m| Diagnostic {
            severity: match m.message_type {
                wgpu::CompilationMessageType::Error => Severity::Error,
                wgpu::CompilationMessageType::Warning => Severity::Warning,
                wgpu::CompilationMessageType::Info => Severity::Info,
            },
            message: m.message,
            location: m.location.map(|l| (l.line_number, l.line_position)),
        })
        .collect()
}

pub(crate) fn deliver(label: &str, diagnostics: &[Diagnostic], source: &str) {
    for d in diagnostics {
        let at = d
            .location
            .map(|(line, col)| format!(" at {line}:{col}"))
            .unwrap_or_default();
        match d.severity {
            Severity::Error => log::error!("shader `{label}`{at}: {}", d.message),
            Severity::Warning => log::warn!("shader `{label}`{at}: {}", d.message),
            Severity::Info => log::info!("shader `{label}`{at}: {}", d.message),
        }
    }

    if let Some(sink) = current_sink() {
        sink(diagnostics, source);
    }
}

/// Fire-and-forget request for `module`'s compilation info.
pub(crate) fn request(module: &wgpu::ShaderModule, label: &str, source: &str) {
    let module = module.clone();
    let label = label.to_string();
    let source = source.to_string();

    let spawned = std::thread::Builder::new()
        .name("conic-shader-diagnostics".to_string())
        .spawn(move || {
            let info = pollster::block_on(module.get_compilation_info());
            deliver(&label, &convert(info), &source);
        });

    if let Err(e) = spawned {
        log::warn!("could not spawn diagnostics task: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn sink_receives_diagnostics_and_source() {
        let seen: Arc<Mutex<Vec<(usize, String)>>> = Arc::default();
        let seen2 = Arc::clone(&seen);
        set_diagnostic_sink(move |diags, src| {
            if let Ok(mut v) = seen2.lock() {
                v.push((diags.len(), src.to_string()));
            }
        });

        let diags = [Diagnostic {
            severity: Severity::Warning,
            message: "unused variable".into(),
            location: Some((3, 7)),
        }];
        deliver("test", &diags, "fn main() {}");
        clear_diagnostic_sink();
        deliver("test", &diags, "ignored");

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&(1, "fn main() {}".to_string())));
        assert!(!seen.iter().any(|(_, s)| s == "ignored"));
    }
}
