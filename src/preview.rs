// src/preview.rs
//! Отладочное превью мира в PNG
//!
//! Клетки раскрашиваются по классу воды, поверх рисуются дорога, переходы и дома.
//! Одна клетка сетки занимает `scale × scale` пикселей; ось X картинки — столбцы, ось Y — строки.

use crate::city::PlacementEvent;
use crate::grid::GridPos;
use crate::world::{WaterClass, World};
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

impl WaterClass {
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            WaterClass::Sea => [0, 64, 128],
            WaterClass::River => [70, 140, 220],
            WaterClass::Dry => [150, 200, 100],
            WaterClass::Paved => [110, 110, 110],
            WaterClass::Ambiguous => [200, 180, 120],
        }
    }
}

const ROAD_COLOR: Rgba<u8> = Rgba([60, 60, 60, 255]);
const CROSSWALK_COLOR: Rgba<u8> = Rgba([240, 240, 240, 255]);
const BUILDING_COLOR: Rgba<u8> = Rgba([158, 15, 52, 255]);

/// Рисует мир и события размещения
pub fn render_preview(world: &World, events: &[PlacementEvent], scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let side = world.size() as u32;
    let mut img: RgbaImage = ImageBuffer::new(side * scale, side * scale);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let pos = GridPos::new((y / scale) as i32, (x / scale) as i32);
        let rgb = world
            .classify(pos)
            .unwrap_or(WaterClass::Ambiguous)
            .to_rgb();
        *pixel = Rgba([rgb[0], rgb[1], rgb[2], 255]);
    }

    let cell_origin = |pos: GridPos| (pos.col * scale as i32, pos.row * scale as i32);

    for event in events {
        match event {
            PlacementEvent::RoadSegment { center, .. } => {
                let (x, y) = cell_origin(*center);
                draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(scale, scale), ROAD_COLOR);
            }
            PlacementEvent::Crosswalk { center, .. } => {
                let (x, y) = cell_origin(*center);
                draw_filled_rect_mut(
                    &mut img,
                    Rect::at(x, y).of_size(scale, scale),
                    CROSSWALK_COLOR,
                );
            }
            PlacementEvent::Building(building) => {
                let (x, y) = cell_origin(building.cell);
                let half = scale as i32 / 2;
                // Радиус растёт с этажностью, но не вылезает за клетку дома и соседей
                let radius = (half * building.floors as i32 / 2).clamp(1, scale as i32);
                draw_filled_circle_mut(&mut img, (x + half, y + half), radius, BUILDING_COLOR);
            }
        }
    }

    img
}

pub fn save_preview(
    world: &World,
    events: &[PlacementEvent],
    scale: u32,
    path: &str,
) -> crate::Result<()> {
    render_preview(world, events, scale).save(path)?;
    Ok(())
}
