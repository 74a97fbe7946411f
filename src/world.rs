// src/world.rs
//! Состояние мира: рельеф, вода и (возможно) место для города
//!
//! Классификация клетки по воде выводится из сравнения высоты рельефа с уровнем воды и с нулём:
//! - **Море**: рельеф ниже нуля и уровень воды ниже нуля
//! - **Река**: уровень воды выше нуля и рельеф под водой
//! - **Суша**: рельеф выше нуля и выше уровня воды
//!
//! Три предиката независимы и не покрывают всех случаев: клетка может не попасть ни в один.
//! Клетки за пределами сетки не относятся ни к одному классу. Замощённые клетки никогда не
//! считаются морем или рекой.

use crate::grid::GridPos;
use crate::heightmap::Heightmap;
use crate::site::CitySite;
use crate::water::{WaterLevel, WaterMap, initialize_water};
use serde::{Deserialize, Serialize};

/// Класс клетки для отображения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterClass {
    Sea,
    River,
    Dry,
    Paved,
    /// Ни один предикат не выполнен
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub terrain: Heightmap,
    pub water: WaterMap,
    pub site: Option<CitySite>,
}

impl World {
    /// Мир с водой на `water_offset` ниже рельефа и без города
    pub fn new(terrain: Heightmap, water_offset: f64) -> Self {
        let water = initialize_water(&terrain, water_offset);
        Self {
            terrain,
            water,
            site: None,
        }
    }

    pub fn size(&self) -> usize {
        self.terrain.size
    }

    fn cell(&self, pos: GridPos) -> Option<(f64, WaterLevel)> {
        let idx = pos.index(self.terrain.size)?;
        Some((self.terrain.data[idx], self.water.data[idx]))
    }

    pub fn is_sea(&self, pos: GridPos) -> bool {
        matches!(
            self.cell(pos),
            Some((h, WaterLevel::Surface(w))) if h < 0.0 && w < 0.0
        )
    }

    pub fn is_river(&self, pos: GridPos) -> bool {
        matches!(
            self.cell(pos),
            Some((h, WaterLevel::Surface(w))) if w > 0.0 && h < w
        )
    }

    pub fn is_dry(&self, pos: GridPos) -> bool {
        match self.cell(pos) {
            Some((h, WaterLevel::Surface(w))) => h > 0.0 && h > w,
            Some((h, WaterLevel::Paved)) => h > 0.0,
            None => false,
        }
    }

    /// Класс клетки для экспорта; `None` за пределами сетки
    pub fn classify(&self, pos: GridPos) -> Option<WaterClass> {
        let (_, level) = self.cell(pos)?;
        let class = if level == WaterLevel::Paved {
            WaterClass::Paved
        } else if self.is_sea(pos) {
            WaterClass::Sea
        } else if self.is_river(pos) {
            WaterClass::River
        } else if self.is_dry(pos) {
            WaterClass::Dry
        } else {
            WaterClass::Ambiguous
        };
        Some(class)
    }
}
