// src/site.rs
//! Поиск места для города
//!
//! Город закладывается на сухой площадке у устья реки. Площадка — блок 2×3 сухих клеток,
//! за ним (против направления роста города) река шириной в две клетки, которая в пределах
//! четырёх клеток в одну из сторон выходит в открытое море.
//!
//! ## Ориентации
//!
//! Все четыре шаблона получаются друг из друга заменой осей и знака. Ориентация описывается
//! осью роста города и направлением шага вдоль неё:
//!
//! | Ориентация | Ось роста | Шаг |
//! |------------|-----------|-----|
//! | `Right`    | строки    | −1  |
//! | `Left`     | строки    | +1  |
//! | `Up`       | столбцы   | −1  |
//! | `Down`     | столбцы   | +1  |
//!
//! Шаблоны проверяются именно в этом порядке, первый подходящий побеждает.
//!
//! ## Поиск
//!
//! Обход в глубину с явным стеком из случайной клетки. Множество посещённых клеток своё для
//! каждого вызова: неудачный поиск просто возвращает `None`, следующий тик начнёт заново.
//! Каждая клетка проверяется не больше одного раза, поэтому поиск всегда завершается.

use crate::grid::{Axis, GridPos};
use crate::world::World;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Направление, в котором растёт город от точки закладки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Right,
    Left,
    Up,
    Down,
}

impl Orientation {
    /// Порядок приоритета при поиске
    pub const ALL: [Orientation; 4] = [
        Orientation::Right,
        Orientation::Left,
        Orientation::Up,
        Orientation::Down,
    ];

    /// Ось, вдоль которой растёт город
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Orientation::Right | Orientation::Left => Axis::Row,
            Orientation::Up | Orientation::Down => Axis::Col,
        }
    }

    /// Шаг курсора вдоль оси роста
    #[must_use]
    pub fn step(self) -> i32 {
        match self {
            Orientation::Right | Orientation::Up => -1,
            Orientation::Left | Orientation::Down => 1,
        }
    }

    /// Поперечная ось (на ней стоят дома)
    #[must_use]
    pub fn cross_axis(self) -> Axis {
        self.axis().cross()
    }

    /// Клетка в системе координат ориентации: `along` шагов роста и `across` поперёк
    #[must_use]
    pub fn locate(self, origin: GridPos, along: i32, across: i32) -> GridPos {
        origin
            .along(self.axis(), along * self.step())
            .along(self.cross_axis(), across)
    }
}

/// Точка закладки города
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySite {
    pub pos: GridPos,
    pub orientation: Orientation,
}

/// Подходит ли клетка под шаблон устья для данной ориентации
pub fn pattern_matches(world: &World, pos: GridPos, orientation: Orientation) -> bool {
    let at = |along: i32, across: i32| orientation.locate(pos, along, across);

    // Сухая площадка: текущий и следующий по ходу ряд, по клетке в обе стороны
    let platform_dry = [0, 1]
        .iter()
        .all(|&along| (-1..=1).all(|across| world.is_dry(at(along, across))));
    if !platform_dry {
        return false;
    }

    // Река позади площадки
    if !(world.is_river(at(-2, 0)) && world.is_river(at(-3, 0))) {
        return false;
    }

    // Вдоль реки три клетки воды и море в одну из сторон
    [1, -1].iter().any(|&side| {
        (1..=3).all(|k| world.is_river(at(-2, side * k))) && world.is_sea(at(-2, side * 4))
    })
}

/// Первая подходящая ориентация в порядке приоритета
pub fn match_orientation(world: &World, pos: GridPos) -> Option<Orientation> {
    Orientation::ALL
        .into_iter()
        .find(|&orientation| pattern_matches(world, pos, orientation))
}

/// Поиск места в глубину из заданной клетки
pub fn find_site_from(world: &World, start: GridPos) -> Option<CitySite> {
    search_from(world, start).0
}

/// Поиск в глубину; вместе с результатом возвращает, сколько клеток было проверено
pub(crate) fn search_from(world: &World, start: GridPos) -> (Option<CitySite>, usize) {
    let size = world.size();
    let mut visited = vec![false; size * size];
    let mut stack = vec![start];
    let mut checked = 0usize;

    while let Some(pos) = stack.pop() {
        let Some(idx) = pos.index(size) else {
            continue;
        };
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        checked += 1;

        if let Some(orientation) = match_orientation(world, pos) {
            log::debug!("Site search from {start:?}: match after {checked} cells");
            return (Some(CitySite { pos, orientation }), checked);
        }

        for (d_row, d_col) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = pos.offset(d_row, d_col);
            if next.index(size).is_some_and(|n| !visited[n]) {
                stack.push(next);
            }
        }
    }

    log::debug!("Site search from {start:?}: no match in {checked} cells");
    (None, checked)
}

/// Одна попытка поиска из случайной клетки
pub fn find_site<R: Rng + ?Sized>(world: &World, rng: &mut R) -> Option<CitySite> {
    let start = world.terrain.random_cell(rng);
    find_site_from(world, start)
}
