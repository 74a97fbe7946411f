use crate::config::GenerationSettings;
use crate::grid::GridPos;
use image::{ImageBuffer, Luma};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Двумерная карта высот `N × N`
///
/// Значения относительные: ниже нуля — дно моря, выше — суша. Ограничений сверху и снизу нет.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub size: usize,
    pub data: Vec<f64>,
}

/// Шаги случайного блуждания: вправо, вверх, вниз, влево
const WALK_MOVES: [(i32, i32); 4] = [(0, 1), (1, 0), (-1, 0), (0, -1)];

impl Heightmap {
    /// Пустая карта `size × size`
    ///
    /// # Panics
    /// Если `size == 0`: в пустой сетке нельзя выбрать случайную клетку.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "heightmap size must be at least 1");
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Высота клетки; `None` за пределами сетки
    pub fn get(&self, pos: GridPos) -> Option<f64> {
        pos.index(self.size).map(|idx| self.data[idx])
    }

    /// Записывает высоту; запись за пределами сетки игнорируется
    pub fn set(&mut self, pos: GridPos, value: f64) {
        if let Some(idx) = pos.index(self.size) {
            self.data[idx] = value;
        }
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> GridPos {
        GridPos::new(
            rng.gen_range(0..self.size) as i32,
            rng.gen_range(0..self.size) as i32,
        )
    }

    /// Минимальная и максимальная высота
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Смещение по случайному разлому
    ///
    /// Прямая проводится через две случайные клетки; клетки, у которых номер строки меньше
    /// значения прямой в их столбце, поднимаются на `delta`, остальные опускаются
    /// (знак выбирается случайно). Если обе клетки в одной строке, смещение пропускается.
    ///
    /// Возвращает `true`, если смещение было применено.
    pub fn fault_displace<R: Rng + ?Sized>(&mut self, delta: f64, rng: &mut R) -> bool {
        let delta = if rng.gen_bool(0.5) { -delta } else { delta };

        let a = self.random_cell(rng);
        let b = self.random_cell(rng);
        if a.row == b.row {
            return false;
        }

        // Прямая через две точки в координатах (row, col)
        let slope = f64::from(b.col - a.col) / f64::from(b.row - a.row);
        let intercept = f64::from(a.col) - slope * f64::from(a.row);

        let n = self.size;
        for (idx, h) in self.data.iter_mut().enumerate() {
            let (row, col) = ((idx / n) as f64, (idx % n) as f64);
            if row < slope * col + intercept {
                *h += delta;
            } else {
                *h -= delta;
            }
        }
        true
    }

    /// Случайное блуждание с отложением
    ///
    /// На каждом шаге текущая клетка меняется на `±delta` (знак общий для всего блуждания),
    /// затем блуждание сдвигается в случайном направлении. Координаты зацикливаются:
    /// только здесь сетка ведёт себя как тор.
    pub fn random_walk_deposit<R: Rng + ?Sized>(&mut self, delta: f64, steps: usize, rng: &mut R) {
        let n = self.size as i32;
        let mut pos = self.random_cell(rng);
        let delta = if rng.gen_bool(0.5) { -delta } else { delta };

        for _ in 0..steps {
            let idx = pos.row as usize * self.size + pos.col as usize;
            self.data[idx] += delta;

            let (d_row, d_col) = WALK_MOVES[rng.gen_range(0..WALK_MOVES.len())];
            pos = GridPos::new(
                (pos.row + d_row).rem_euclid(n),
                (pos.col + d_col).rem_euclid(n),
            );
        }
    }

    /// Сглаживание ядром 3×3 `{1,2,1 / 2,4,2 / 1,2,1} / 16`
    ///
    /// Результат считается в отдельный буфер, поэтому соседи берутся из исходных значений.
    /// Граничное кольцо клеток не меняется.
    pub fn smooth(&mut self) {
        let n = self.size;
        if n < 3 {
            return;
        }

        let src = &self.data;
        let mut out = src.clone();

        let smooth_row = |row: usize, out_row: &mut [f64]| {
            if row == 0 || row == n - 1 {
                return;
            }
            let above = &src[(row - 1) * n..row * n];
            let here = &src[row * n..(row + 1) * n];
            let below = &src[(row + 1) * n..(row + 2) * n];
            for col in 1..n - 1 {
                out_row[col] = (below[col - 1]
                    + 2.0 * below[col]
                    + below[col + 1]
                    + 2.0 * here[col - 1]
                    + 4.0 * here[col]
                    + 2.0 * here[col + 1]
                    + above[col - 1]
                    + 2.0 * above[col]
                    + above[col + 1])
                    / 16.0;
            }
        };

        #[cfg(feature = "parallel")]
        out.par_chunks_mut(n)
            .enumerate()
            .for_each(|(row, out_row)| smooth_row(row, out_row));
        #[cfg(not(feature = "parallel"))]
        out.chunks_mut(n)
            .enumerate()
            .for_each(|(row, out_row)| smooth_row(row, out_row));

        self.data = out;
    }

    /// Нормализованная градация серого (минимум → 0, максимум → 255)
    pub fn to_grayscale_image(&self) -> Vec<u8> {
        let (lo, hi) = self.min_max();
        let range = if hi > lo { hi - lo } else { 1.0 };
        let to_byte = |v: f64| (((v - lo) / range).clamp(0.0, 1.0) * 255.0) as u8;

        #[cfg(feature = "parallel")]
        let pixels = self.data.par_iter().map(|&v| to_byte(v)).collect();
        #[cfg(not(feature = "parallel"))]
        let pixels = self.data.iter().map(|&v| to_byte(v)).collect();
        pixels
    }

    pub fn save_as_png(&self, path: &str) -> crate::Result<()> {
        let side = self.size as u32;
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(side, side, self.to_grayscale_image()).ok_or_else(|| {
                crate::Error::InvalidParams("heightmap buffer does not match its size".into())
            })?;
        img.save(path)?;
        Ok(())
    }
}

/// Генерирует начальный рельеф по рецепту: разломы, блуждания, сглаживание, ещё немного блужданий
pub fn generate_heightmap<R: Rng + ?Sized>(
    size: usize,
    settings: &GenerationSettings,
    rng: &mut R,
) -> Heightmap {
    let mut heightmap = Heightmap::new(size);

    // === 1. Крупные формы: разломы ===
    let mut applied = 0usize;
    for _ in 0..settings.fault_passes {
        if heightmap.fault_displace(settings.fault_delta, rng) {
            applied += 1;
        }
    }
    log::debug!(
        "Fault displacement: {applied}/{} passes applied",
        settings.fault_passes
    );

    // === 2. Хребты и долины: блуждания ===
    for _ in 0..settings.walk_passes {
        heightmap.random_walk_deposit(settings.walk_delta, settings.walk_steps, rng);
    }

    // === 3. Сглаживание ===
    heightmap.smooth();

    // === 4. Немного шероховатости поверх сглаживания ===
    for _ in 0..settings.rewalk_passes {
        heightmap.random_walk_deposit(settings.walk_delta, settings.walk_steps, rng);
    }

    let (lo, hi) = heightmap.min_max();
    log::info!("Heightmap {size}×{size} generated, heights in [{lo:.3}, {hi:.3}]");
    heightmap
}
