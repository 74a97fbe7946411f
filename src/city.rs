// src/city.rs
//! Рост города от точки закладки
//!
//! Курсор идёт от точки закладки вдоль оси ориентации, по клетке за шаг. На каждом шаге:
//! 1. Полоса ±2 поперёк в текущем и следующем ряду выравнивается по высоте осевой клетки
//!    своего ряда и замащивается.
//! 2. На чётных шагах по обе стороны дороги (±2 поперёк) ставятся дома, если под ними есть
//!    сухой блок 3×3. Этажность зависит от номера шага и стороны.
//! 3. Выдаётся сегмент дороги, каждый восьмой шаг — пешеходный переход.
//!
//! Рост прекращается, как только впереди нет сухой земли или полоса выходит за сетку.
//!
//! Город каждый тик перестраивается с нуля. Дома проверяются и ставятся уже по выровненной
//! полосе, поэтому повторный проход видит ту же сетку, ничего не меняет и выдаёт ту же
//! последовательность событий.

use crate::grid::GridPos;
use crate::site::{CitySite, Orientation};
use crate::water::WaterLevel;
use crate::world::World;
use serde::{Deserialize, Serialize};

/// Поворот домов вокруг вертикали, градусы
pub const BUILDING_YAW_DEGREES: f64 = 45.0;
/// Насколько фундамент дома поднят над рельефом
pub const BUILDING_LIFT: f64 = 0.15;
/// Насколько полотно дороги поднято над осевой клеткой
pub const ROAD_LIFT: f64 = 0.1;
/// Дома ставятся через шаг
const BUILDING_PERIOD: usize = 2;
/// Каждый восьмой сегмент — переход
const CROSSWALK_PERIOD: usize = 8;
/// Полуширина замощённой полосы
const ROAD_HALF_WIDTH: i32 = 2;

/// Дом на краю дороги
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    pub cell: GridPos,
    /// Высота основания (рельеф клетки после выравнивания полосы плюс подъём)
    pub elevation: f64,
    pub floors: u32,
    pub windows: u32,
    pub rotation_degrees: f64,
    /// Вертикальный масштаб модели: `floors / 2 + 1`
    pub vertical_scale: u32,
}

impl BuildingPlacement {
    fn new(cell: GridPos, terrain_height: f64, floors: u32) -> Self {
        Self {
            cell,
            elevation: terrain_height + BUILDING_LIFT,
            floors,
            windows: floors,
            rotation_degrees: BUILDING_YAW_DEGREES,
            vertical_scale: floors / 2 + 1,
        }
    }

    /// Позиция в пространстве сцены: `(col − N/2, elevation, row − N/2)`
    #[must_use]
    pub fn world_position(&self, grid_size: usize) -> [f64; 3] {
        let half = (grid_size / 2) as f64;
        [
            f64::from(self.cell.col) - half,
            self.elevation,
            f64::from(self.cell.row) - half,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlacementEvent {
    Building(BuildingPlacement),
    RoadSegment {
        orientation: Orientation,
        center: GridPos,
        /// Высота осевой клетки плюс подъём полотна
        elevation: f64,
    },
    Crosswalk {
        orientation: Orientation,
        center: GridPos,
        elevation: f64,
    },
}

impl PlacementEvent {
    /// Клетка, к которой привязано событие
    #[must_use]
    pub fn cell(&self) -> GridPos {
        match self {
            PlacementEvent::Building(building) => building.cell,
            PlacementEvent::RoadSegment { center, .. } | PlacementEvent::Crosswalk { center, .. } => {
                *center
            }
        }
    }

    /// Позиция в пространстве сцены: `(col − N/2, elevation, row − N/2)`
    #[must_use]
    pub fn world_position(&self, grid_size: usize) -> [f64; 3] {
        let elevation = match self {
            PlacementEvent::Building(building) => building.elevation,
            PlacementEvent::RoadSegment { elevation, .. }
            | PlacementEvent::Crosswalk { elevation, .. } => *elevation,
        };
        let cell = self.cell();
        let half = (grid_size / 2) as f64;
        [
            f64::from(cell.col) - half,
            elevation,
            f64::from(cell.row) - half,
        ]
    }
}

/// Есть ли место под дом: блок 3×3 вокруг клетки целиком внутри сетки и сухой
pub fn check_building_space(world: &World, center: GridPos) -> bool {
    let n = world.size() as i32;
    let inside = center.row - 1 >= 0
        && center.row + 1 < n
        && center.col - 1 >= 0
        && center.col + 1 < n;
    inside
        && (-1..=1).all(|d_row| (-1..=1).all(|d_col| world.is_dry(center.offset(d_row, d_col))))
}

/// Можно ли продолжать дорогу с курсора
fn can_extend(world: &World, orientation: Orientation, cursor: GridPos) -> bool {
    let size = world.size();
    let at = |along: i32, across: i32| orientation.locate(cursor, along, across);

    let strip_inside = orientation.locate(cursor, 1, 0).in_bounds(size)
        && at(0, -ROAD_HALF_WIDTH).in_bounds(size)
        && at(0, ROAD_HALF_WIDTH).in_bounds(size);

    strip_inside
        && [0, 1]
            .iter()
            .all(|&along| (-1..=1).all(|across| world.is_dry(at(along, across))))
}

/// Выравнивает и замащивает полосу в ряду `along` относительно курсора.
/// Возвращает высоту осевой клетки ряда.
fn pave_row(
    world: &mut World,
    orientation: Orientation,
    cursor: GridPos,
    along: i32,
) -> Option<f64> {
    let center = orientation.locate(cursor, along, 0);
    let height = world.terrain.get(center)?;
    for across in -ROAD_HALF_WIDTH..=ROAD_HALF_WIDTH {
        let cell = orientation.locate(cursor, along, across);
        if across != 0 {
            world.terrain.set(cell, height);
        }
        world.water.set(cell, WaterLevel::Paved);
    }
    Some(height)
}

/// Строит город от точки закладки и возвращает события размещения по порядку
pub fn expand_city(world: &mut World, site: CitySite) -> Vec<PlacementEvent> {
    let orientation = site.orientation;
    let mut events = Vec::new();
    let mut cursor = site.pos;
    let mut counter = 0usize;

    while can_extend(world, orientation, cursor) {
        // Курсор внутри сетки: его проверила can_extend
        let road_height = pave_row(world, orientation, cursor, 0).unwrap_or_default();
        pave_row(world, orientation, cursor, 1);

        if counter % BUILDING_PERIOD == 0 {
            let base_floors = (counter % 4) as u32;
            for (across, extra_floors) in [(-ROAD_HALF_WIDTH, 1), (ROAD_HALF_WIDTH, 2)] {
                let cell = orientation.locate(cursor, 0, across);
                if !check_building_space(world, cell) {
                    continue;
                }
                if let Some(height) = world.terrain.get(cell) {
                    events.push(PlacementEvent::Building(BuildingPlacement::new(
                        cell,
                        height,
                        base_floors + extra_floors,
                    )));
                }
            }
        }

        let elevation = road_height + ROAD_LIFT;
        events.push(if counter % CROSSWALK_PERIOD == 0 {
            PlacementEvent::Crosswalk {
                orientation,
                center: cursor,
                elevation,
            }
        } else {
            PlacementEvent::RoadSegment {
                orientation,
                center: cursor,
                elevation,
            }
        });

        cursor = orientation.locate(cursor, 1, 0);
        counter += 1;
    }

    log::debug!(
        "City {:?} at {:?}: {counter} road steps, {} events",
        orientation,
        site.pos,
        events.len()
    );
    events
}
