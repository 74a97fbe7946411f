// src/config.rs
//! Конфигурация симуляции
//!
//! Этот модуль определяет все параметры, управляющие симуляцией:
//! - Размер сетки и сид генератора случайных чисел
//! - Рецепт генерации рельефа (разломы, случайные блуждания, сглаживание)
//! - Интенсивность эрозии за один тик
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.
//! Значения по умолчанию совпадают с эталонной конфигурацией (сетка 100×100, 4000 разломов, 500 + 15 блужданий).

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};

/// Минимальный размер сетки: меньше не помещается ни один шаблон места для города
pub const MIN_GRID_SIZE: usize = 8;

/// Рецепт начальной генерации рельефа
///
/// Порядок фиксирован: `fault_passes` разломов, `walk_passes` блужданий,
/// одно сглаживание и ещё `rewalk_passes` блужданий для лёгкой шероховатости.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSettings {
    /// Количество смещений по случайным разломам
    #[serde(default = "default_fault_passes")]
    pub fault_passes: usize,

    /// Величина смещения одной полуплоскости за разлом
    #[serde(default = "default_fault_delta")]
    pub fault_delta: f64,

    /// Количество случайных блужданий до сглаживания
    #[serde(default = "default_walk_passes")]
    pub walk_passes: usize,

    /// Величина отложения за шаг блуждания
    #[serde(default = "default_walk_delta")]
    pub walk_delta: f64,

    /// Длина одного блуждания в шагах
    #[serde(default = "default_walk_steps")]
    pub walk_steps: usize,

    /// Количество блужданий после сглаживания
    #[serde(default = "default_rewalk_passes")]
    pub rewalk_passes: usize,

    /// На сколько уровень воды изначально ниже рельефа
    #[serde(default = "default_water_offset")]
    pub water_offset: f64,
}

fn default_fault_passes() -> usize {
    4000
}
fn default_fault_delta() -> f64 {
    0.05
}
fn default_walk_passes() -> usize {
    500
}
fn default_walk_delta() -> f64 {
    0.02
}
fn default_walk_steps() -> usize {
    800
}
fn default_rewalk_passes() -> usize {
    15
}
fn default_water_offset() -> f64 {
    0.001
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            fault_passes: 4000,
            fault_delta: 0.05,
            walk_passes: 500,
            walk_delta: 0.02,
            walk_steps: 800,
            rewalk_passes: 15,
            water_offset: 0.001,
        }
    }
}

/// Настройки эрозии
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErosionSettings {
    /// Сколько спусков выполняется за один тик
    #[serde(default = "default_walks_per_tick")]
    pub walks_per_tick: usize,

    /// На сколько понижается клетка, которую покидает спуск
    #[serde(default = "default_erosion_amount")]
    pub amount: f64,
}

fn default_walks_per_tick() -> usize {
    2
}
fn default_erosion_amount() -> f64 {
    0.0001
}

impl Default for ErosionSettings {
    fn default() -> Self {
        Self {
            walks_per_tick: 2,
            amount: 0.0001,
        }
    }
}

/// Основные параметры симуляции
///
/// Полная конфигурация одного запуска. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationParams {
    /// Сид генератора случайных чисел (детерминированная симуляция)
    #[serde(default)]
    pub seed: u64,

    /// Сторона квадратной сетки в клетках (по умолчанию 100)
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,

    /// Рецепт генерации рельефа
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Настройки эрозии
    #[serde(default)]
    pub erosion: ErosionSettings,
}

impl SimulationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # city.toml
    /// seed = 42
    /// grid_size = 100
    ///
    /// [generation]
    /// fault_passes = 2000
    ///
    /// [erosion]
    /// walks_per_tick = 4
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        params.validate()?;
        Ok(params)
    }

    /// Проверяет, что параметры допустимы для симуляции
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(Error::InvalidParams(format!(
                "grid_size must be at least {MIN_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        let deltas = [
            ("fault_delta", self.generation.fault_delta),
            ("walk_delta", self.generation.walk_delta),
            ("water_offset", self.generation.water_offset),
            ("erosion.amount", self.erosion.amount),
        ];
        for (name, value) in deltas {
            if !value.is_finite() {
                return Err(Error::InvalidParams(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

fn default_grid_size() -> usize {
    100
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            grid_size: 100,
            generation: GenerationSettings::default(),
            erosion: ErosionSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let params: SimulationParams = toml::from_str(
            r"
            seed = 7
            [erosion]
            walks_per_tick = 5
            ",
        )
        .unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.grid_size, 100);
        assert_eq!(params.erosion.walks_per_tick, 5);
        assert_eq!(params.erosion.amount, 0.0001);
        assert_eq!(params.generation, GenerationSettings::default());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 42\ngrid_size = 32").unwrap();
        let params = SimulationParams::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.grid_size, 32);
    }

    #[test]
    fn rejects_tiny_grid() {
        let params = SimulationParams {
            grid_size: 4,
            ..SimulationParams::default()
        };
        assert!(matches!(params.validate(), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn rejects_non_finite_delta() {
        let mut params = SimulationParams::default();
        params.generation.fault_delta = f64::NAN;
        assert!(params.validate().is_err());
    }
}
