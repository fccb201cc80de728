//! Canvas 2D renderer
//!
//! Pure function of simulation state: nothing here mutates the world. Each
//! entity draws either its sprite image or, when the image is missing or not
//! yet loaded, a deterministic procedural vector shape.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::GROUND_HEIGHT;
use crate::sim::{Adversary, Background, Field, Player, Projectile, WorldState};

/// Optional sprite images. Left without a `src` the fallback shapes are used;
/// pointing them at real assets swaps the art in without code changes.
pub struct SpriteAssets {
    pub player: Option<HtmlImageElement>,
    pub enemy: Option<HtmlImageElement>,
}

impl SpriteAssets {
    pub fn new() -> Self {
        Self {
            player: HtmlImageElement::new().ok(),
            enemy: HtmlImageElement::new().ok(),
        }
    }
}

impl Default for SpriteAssets {
    fn default() -> Self {
        Self::new()
    }
}

/// An image is usable once it finished loading with actual pixel data
fn ready_image(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref().filter(|i| i.complete() && i.natural_height() != 0)
}

/// Per-entity drawing, the render half of the entity contract
pub trait Draw {
    fn draw(&self, ctx: &CanvasRenderingContext2d, field: &Field, assets: &SpriteAssets);
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    assets: SpriteAssets,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            assets: SpriteAssets::new(),
        })
    }

    /// Draw one frame of the current world state
    pub fn render(&self, world: &WorldState) {
        let field = &world.field;
        self.ctx
            .clear_rect(0.0, 0.0, field.width as f64, field.height as f64);

        world.background.draw(&self.ctx, field, &self.assets);
        world.player.draw(&self.ctx, field, &self.assets);
        for projectile in &world.projectiles {
            projectile.draw(&self.ctx, field, &self.assets);
        }
        for adversary in &world.adversaries {
            adversary.draw(&self.ctx, field, &self.assets);
        }
    }
}

impl Draw for Background {
    fn draw(&self, ctx: &CanvasRenderingContext2d, field: &Field, _assets: &SpriteAssets) {
        let w = field.width as f64;
        let h = field.height as f64;

        // Ground band
        ctx.set_fill_style_str("#654321");
        ctx.fill_rect(0.0, h - GROUND_HEIGHT as f64, w, GROUND_HEIGHT as f64);

        // Grass lip
        ctx.set_fill_style_str("#228B22");
        ctx.fill_rect(0.0, h - GROUND_HEIGHT as f64 - 10.0, w, 10.0);

        // Drifting darker patches sell the scroll; two copies wrap seamlessly
        ctx.set_fill_style_str("#543a1b");
        for base in [self.offset as f64, self.offset as f64 + w] {
            ctx.fill_rect(base + w * 0.2, h - 60.0, 80.0, 12.0);
            ctx.fill_rect(base + w * 0.7, h - 35.0, 120.0, 10.0);
        }
    }
}

impl Draw for Player {
    fn draw(&self, ctx: &CanvasRenderingContext2d, _field: &Field, assets: &SpriteAssets) {
        let x = self.pos.x as f64;
        // Jump arc lifts the sprite without moving the collision box
        let y = (self.pos.y - self.arc_offset()) as f64;
        let w = self.size.x as f64;
        let h = self.size.y as f64;

        if let Some(img) = ready_image(&assets.player) {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
        } else {
            // Ninja: black body, red headband
            ctx.set_fill_style_str("#333");
            ctx.fill_rect(x, y, w, h);
            ctx.set_fill_style_str("red");
            ctx.fill_rect(x, y + 10.0, w, 10.0);
        }
    }
}

impl Draw for Adversary {
    fn draw(&self, ctx: &CanvasRenderingContext2d, _field: &Field, assets: &SpriteAssets) {
        let x = self.pos.x as f64;
        let y = self.pos.y as f64;
        let w = self.size.x as f64;
        let h = self.size.y as f64;

        if let Some(img) = ready_image(&assets.enemy) {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
        } else {
            ctx.set_fill_style_str("#8B0000");
            ctx.fill_rect(x, y, w, h);
            // Eyes
            ctx.set_fill_style_str("white");
            ctx.fill_rect(x + 10.0, y + 10.0, 10.0, 10.0);
            ctx.fill_rect(x + 30.0, y + 10.0, 10.0, 10.0);
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, ctx: &CanvasRenderingContext2d, _field: &Field, _assets: &SpriteAssets) {
        ctx.begin_path();
        let _ = ctx.arc(
            self.pos.x as f64,
            self.pos.y as f64,
            self.radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str("#FFD700");
        ctx.fill();
        ctx.close_path();
    }
}
