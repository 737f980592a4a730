use std::{cell::RefCell, rc::Rc};

#[cfg(feature = "integration-tests")]
use learn_ngin::{DemoConfig, Engine};

/// Shared record of drop order.
#[derive(Clone, Default)]
pub(crate) struct DropLog(Rc<RefCell<Vec<String>>>);

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, name: &str) -> Tracked {
        Tracked {
            name: name.to_string(),
            log: self.clone(),
        }
    }

    pub fn dropped(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Records its name in the [`DropLog`] when dropped.
pub(crate) struct Tracked {
    pub name: String,
    log: DropLog,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.0.borrow_mut().push(self.name.clone());
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub(crate) fn assert_close_slice(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, *e);
    }
}

#[cfg(feature = "integration-tests")]
pub(crate) fn rgba8(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

/// Engine without a window, for rendering into headless swap chains.
#[cfg(feature = "integration-tests")]
pub(crate) fn headless_engine(runtime: &tokio::runtime::Runtime) -> anyhow::Result<Engine> {
    let config = DemoConfig::new("integration test");
    Ok(runtime.block_on(Engine::new(&config, None))?)
}
