use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use shatter_core::{
    DisplayList, FragmentId, LayerInfo, Outputs, Point, Rgba, ShatterConfig, ShatterScheduler,
    Viewport,
};

/// Browser-facing shatter effect: owns the scheduler and an in-memory stage
/// whose layers the host mirrors into DOM canvases.
#[wasm_bindgen]
pub struct ShatterEffect {
    core: ShatterScheduler,
    stage: DisplayList,
    rng: StdRng,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_config(config: JsValue) -> Result<ShatterConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        Ok(ShatterConfig::default())
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

fn parse_color(color: Option<String>, rng: &mut StdRng) -> Result<Rgba, JsError> {
    match color {
        Some(hex) => hex
            .parse()
            .map_err(|e| JsError::new(&format!("color error: {e}"))),
        None => Ok(Rgba::random(rng)),
    }
}

fn to_js(out: &Outputs) -> Result<JsValue, JsError> {
    swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
}

#[wasm_bindgen]
impl ShatterEffect {
    /// Create an effect for a `width` x `height` viewport. Pass a JSON config
    /// object or undefined/null for defaults.
    /// Example:
    ///   new ShatterEffect({ motion: { repeat_delay: 1 } }, innerWidth, innerHeight)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, width: f32, height: f32) -> Result<ShatterEffect, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let viewport =
            Viewport::new(width, height).map_err(|e| JsError::new(&format!("viewport error: {e}")))?;
        let core = ShatterScheduler::new(cfg, viewport)
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(ShatterEffect {
            core,
            stage: DisplayList::new(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Deterministic variant for replays and tests.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(
        config: JsValue,
        width: f32,
        height: f32,
        seed: u32,
    ) -> Result<ShatterEffect, JsError> {
        console_error_panic_hook::set_once();
        let cfg = parse_config(config)?;
        let viewport =
            Viewport::new(width, height).map_err(|e| JsError::new(&format!("viewport error: {e}")))?;
        let core = ShatterScheduler::with_seed(cfg, viewport, u64::from(seed))
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;
        Ok(ShatterEffect {
            core,
            stage: DisplayList::new(),
            rng: StdRng::seed_from_u64(u64::from(seed).wrapping_add(1)),
        })
    }

    /// Initial shatter at the viewport centre. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn start(&mut self, color: Option<String>) -> Result<JsValue, JsError> {
        let color = parse_color(color, &mut self.rng)?;
        let out = self.core.trigger_centered(color, &mut self.stage);
        to_js(out)
    }

    /// Shatter at a pointer position; a random color is picked when `color` is omitted.
    #[wasm_bindgen]
    pub fn trigger(&mut self, x: f32, y: f32, color: Option<String>) -> Result<JsValue, JsError> {
        let color = parse_color(color, &mut self.rng)?;
        let out = self.core.trigger(Point::new(x, y), color, &mut self.stage);
        to_js(out)
    }

    /// Step the running cycle by dt (seconds). Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let out = self.core.update(dt, &mut self.stage);
        to_js(out)
    }

    /// Tear the running cycle down without starting another.
    #[wasm_bindgen]
    pub fn cancel(&mut self) -> Result<JsValue, JsError> {
        let out = self.core.cancel(&mut self.stage);
        to_js(out)
    }

    /// New viewport size; applies from the next trigger.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsError> {
        self.core
            .set_viewport(width, height)
            .map_err(|e| JsError::new(&format!("viewport error: {e}")))
    }

    /// Attached layers back to front, without pixel data.
    #[wasm_bindgen]
    pub fn layers(&self) -> Result<JsValue, JsError> {
        let infos: Vec<LayerInfo> = self
            .stage
            .layers_by_depth()
            .into_iter()
            .map(|l| l.info())
            .collect();
        swb::to_value(&infos).map_err(|e| JsError::new(&format!("layers error: {e}")))
    }

    /// RGBA bytes of one layer's surface, ready for `ImageData`.
    #[wasm_bindgen(js_name = layer_pixels)]
    pub fn layer_pixels(&self, id: u32) -> Option<Vec<u8>> {
        self.stage
            .get(FragmentId(id))
            .map(|l| l.surface.as_raw().to_vec())
    }

    #[wasm_bindgen(js_name = random_color)]
    pub fn random_color(&mut self) -> String {
        Rgba::random(&mut self.rng).to_hex()
    }

    #[wasm_bindgen(js_name = is_animating)]
    pub fn is_animating(&self) -> bool {
        self.core.is_animating()
    }

    /// Perspective distance the host should set on the container.
    #[wasm_bindgen]
    pub fn perspective(&self) -> f32 {
        self.core.config().stage.perspective
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
