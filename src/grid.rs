//! Координаты квадратной сетки
//!
//! Все операции над сеткой, кроме случайного блуждания при генерации, работают
//! в ограниченном прямоугольнике `[0, N) × [0, N)`. Координаты знаковые, чтобы
//! смещения вида `x - 3` можно было вычислить до проверки границ.

use serde::{Deserialize, Serialize};

/// Ось сетки: строки (`row`, в исходных картах — `x`) или столбцы (`col`, `z`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Col,
}

impl Axis {
    /// Перпендикулярная ось
    #[must_use]
    pub fn cross(self) -> Axis {
        match self {
            Axis::Row => Axis::Col,
            Axis::Col => Axis::Row,
        }
    }
}

/// Клетка сетки `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Сдвиг на `delta` клеток вдоль оси
    #[must_use]
    pub fn along(self, axis: Axis, delta: i32) -> Self {
        match axis {
            Axis::Row => self.offset(delta, 0),
            Axis::Col => self.offset(0, delta),
        }
    }

    #[must_use]
    pub fn in_bounds(self, size: usize) -> bool {
        let n = size as i32;
        self.row >= 0 && self.row < n && self.col >= 0 && self.col < n
    }

    /// Линейный индекс `row * size + col`, если клетка внутри сетки
    #[must_use]
    pub fn index(self, size: usize) -> Option<usize> {
        self.in_bounds(size)
            .then(|| self.row as usize * size + self.col as usize)
    }
}

/// Четыре соседа по осям в фиксированном порядке: +row, +col, −row, −col
pub const AXIS_NEIGHBORS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
