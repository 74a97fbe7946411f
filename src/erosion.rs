use crate::grid::{AXIS_NEIGHBORS, GridPos};
use crate::heightmap::Heightmap;
use rand::Rng;

/// Итог одного спуска
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErosionWalk {
    pub start: GridPos,
    pub end: GridPos,
    /// Сколько клеток было понижено (каждая итерация понижает одну клетку)
    pub steps: usize,
}

/// Один спуск из случайной клетки
pub fn erode_one_walk<R: Rng + ?Sized>(
    terrain: &mut Heightmap,
    amount: f64,
    rng: &mut R,
) -> ErosionWalk {
    let start = terrain.random_cell(rng);
    erode_walk_from(terrain, start, amount)
}

/// Спуск по самому низкому соседу из заданной клетки
///
/// Каждая итерация понижает клетку, которую спуск покидает, на `amount`, и переходит к самому
/// низкому из текущей клетки и её соседей (+row, +col, −row, −col). Спуск заканчивается в
/// локальном минимуме, который тоже понижается. Две почти равные клетки могут перебрасывать
/// спуск друг другу бесконечно, поэтому число итераций ограничено числом клеток сетки.
pub fn erode_walk_from(terrain: &mut Heightmap, start: GridPos, amount: f64) -> ErosionWalk {
    let size = terrain.size;
    let max_steps = size * size;
    let mut pos = start;
    let mut steps = 0;

    while let Some(idx) = pos.index(size) {
        let mut best = pos;
        let mut best_height = terrain.data[idx];

        for &(d_row, d_col) in &AXIS_NEIGHBORS {
            let next = pos.offset(d_row, d_col);
            if let Some(h) = terrain.get(next) {
                if h < best_height {
                    best = next;
                    best_height = h;
                }
            }
        }

        // Потеря остаётся в покидаемой клетке
        terrain.data[idx] -= amount;
        steps += 1;

        if best == pos || steps >= max_steps {
            break;
        }
        pos = best;
    }

    log::trace!("Erosion walk {start:?} -> {pos:?} in {steps} steps");
    ErosionWalk {
        start,
        end: pos,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn walks_downhill_and_lowers_each_left_cell() {
        // Ровный склон вдоль строки 0: 4, 3, 2, 1, 0
        let mut hm = Heightmap::new(5);
        for row in 0..5 {
            for col in 0..5 {
                hm.set(GridPos::new(row, col), f64::from(4 - col + row));
            }
        }
        let before = hm.clone();
        let walk = erode_walk_from(&mut hm, GridPos::new(0, 0), 0.0001);

        assert_eq!(walk.end, GridPos::new(0, 4));
        assert_eq!(walk.steps, 5);
        for col in 0..5 {
            let p = GridPos::new(0, col);
            assert_eq!(hm.get(p), Some(before.get(p).unwrap() - 0.0001));
        }
        assert_eq!(hm.get(GridPos::new(1, 0)), before.get(GridPos::new(1, 0)));
    }

    #[test]
    fn local_minimum_is_lowered_once() {
        let mut hm = Heightmap::new(3);
        hm.data = vec![1.0; 9];
        hm.set(GridPos::new(1, 1), 0.0);
        let walk = erode_walk_from(&mut hm, GridPos::new(1, 1), 0.5);
        assert_eq!(walk.steps, 1);
        assert_eq!(walk.end, GridPos::new(1, 1));
        assert_eq!(hm.get(GridPos::new(1, 1)), Some(-0.5));
    }

    #[test]
    fn ping_pong_between_close_cells_is_bounded() {
        let mut hm = Heightmap::new(3);
        hm.data = vec![1.0; 9];
        hm.set(GridPos::new(1, 1), 0.50005);
        hm.set(GridPos::new(1, 2), 0.5);
        let before = hm.clone();

        let walk = erode_walk_from(&mut hm, GridPos::new(1, 1), 0.0001);
        assert_eq!(walk.steps, 9);
        for (a, b) in before.data.iter().zip(&hm.data) {
            assert!(b <= a);
        }
    }

    #[test]
    fn random_walks_only_lower_terrain() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut hm = Heightmap::new(16);
        for _ in 0..200 {
            hm.fault_displace(0.05, &mut rng);
        }
        let before = hm.clone();
        for _ in 0..50 {
            let walk = erode_one_walk(&mut hm, 0.0001, &mut rng);
            assert!(walk.steps >= 1 && walk.steps <= 16 * 16);
        }
        for (a, b) in before.data.iter().zip(&hm.data) {
            assert!(b <= a);
        }
    }
}
