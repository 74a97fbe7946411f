use crate::grid::GridPos;
use crate::heightmap::Heightmap;
use serde::{Deserialize, Serialize};

/// Состояние воды в клетке
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WaterLevel {
    /// Отметка водной поверхности
    Surface(f64),
    /// Клетка замощена: воды нет и не будет, в классификацию воды не входит
    Paved,
}

impl WaterLevel {
    #[must_use]
    pub fn surface(self) -> Option<f64> {
        match self {
            WaterLevel::Surface(level) => Some(level),
            WaterLevel::Paved => None,
        }
    }
}

/// Карта уровней воды той же формы, что и карта высот
#[derive(Debug, Clone, PartialEq)]
pub struct WaterMap {
    pub size: usize,
    pub data: Vec<WaterLevel>,
}

impl WaterMap {
    pub fn get(&self, pos: GridPos) -> Option<WaterLevel> {
        pos.index(self.size).map(|idx| self.data[idx])
    }

    pub fn set(&mut self, pos: GridPos, level: WaterLevel) {
        if let Some(idx) = pos.index(self.size) {
            self.data[idx] = level;
        }
    }

    /// Количество замощённых клеток
    pub fn paved_count(&self) -> usize {
        self.data
            .iter()
            .filter(|&&level| level == WaterLevel::Paved)
            .count()
    }
}

/// Начальная вода: на `offset` ниже рельефа в каждой клетке, то есть рек пока нет
#[must_use]
pub fn initialize_water(heightmap: &Heightmap, offset: f64) -> WaterMap {
    WaterMap {
        size: heightmap.size,
        data: heightmap
            .data
            .iter()
            .map(|&h| WaterLevel::Surface(h - offset))
            .collect(),
    }
}
