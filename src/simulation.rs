// src/simulation.rs
//! Пошаговая симуляция
//!
//! Внешний цикл (окно, рендер) вызывает [`Simulation::step`] раз в кадр. За один тик:
//! - пока города нет и эрозия не на паузе — несколько спусков эрозии;
//! - пока города нет и эрозия на паузе — одна попытка найти место из случайной клетки;
//! - как только место найдено — город перестраивается от точки закладки.
//!
//! Эрозия и поиск взаимоисключающие: после закладки города эрозия больше не запускается.
//! Попыток поиска может быть сколько угодно; ограничивать их должен вызывающий код.

use crate::city::{PlacementEvent, expand_city};
use crate::config::SimulationParams;
use crate::erosion::erode_one_walk;
use crate::heightmap::generate_heightmap;
use crate::site::{CitySite, find_site};
use crate::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Фаза симуляции
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Eroding,
    Searching,
    Building,
}

pub struct Simulation {
    pub params: SimulationParams,
    world: World,
    rng: ChaCha8Rng,
    erosion_paused: bool,
    events: Vec<PlacementEvent>,
    ticks: u64,
}

impl Simulation {
    /// Генерирует рельеф и воду по параметрам
    pub fn new(params: SimulationParams) -> crate::Result<Self> {
        params.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let terrain = generate_heightmap(params.grid_size, &params.generation, &mut rng);
        let world = World::new(terrain, params.generation.water_offset);
        Ok(Self::from_world(params, world, rng))
    }

    /// Симуляция поверх готового мира
    pub fn from_world(params: SimulationParams, world: World, rng: ChaCha8Rng) -> Self {
        Self {
            params,
            world,
            rng,
            erosion_paused: false,
            events: Vec::new(),
            ticks: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn site(&self) -> Option<CitySite> {
        self.world.site
    }

    /// События последней перестройки города (пусто, пока города нет)
    pub fn events(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn erosion_paused(&self) -> bool {
        self.erosion_paused
    }

    /// Переключает паузу эрозии; на паузе вместо эрозии идёт поиск места
    pub fn toggle_erosion(&mut self) {
        self.erosion_paused = !self.erosion_paused;
        log::info!(
            "Erosion {}",
            if self.erosion_paused { "paused" } else { "resumed" }
        );
    }

    pub fn phase(&self) -> Phase {
        match (self.world.site, self.erosion_paused) {
            (Some(_), _) => Phase::Building,
            (None, false) => Phase::Eroding,
            (None, true) => Phase::Searching,
        }
    }

    /// Один тик
    pub fn step(&mut self) -> Phase {
        self.ticks += 1;

        match self.phase() {
            Phase::Eroding => {
                for _ in 0..self.params.erosion.walks_per_tick {
                    erode_one_walk(
                        &mut self.world.terrain,
                        self.params.erosion.amount,
                        &mut self.rng,
                    );
                }
            }
            Phase::Searching => {
                if let Some(site) = find_site(&self.world, &mut self.rng) {
                    log::info!(
                        "City site found at {:?} facing {:?} on tick {}",
                        site.pos,
                        site.orientation,
                        self.ticks
                    );
                    self.world.site = Some(site);
                }
            }
            Phase::Building => {}
        }

        if let Some(site) = self.world.site {
            self.events = expand_city(&mut self.world, site);
        }
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationSettings;
    use crate::heightmap::Heightmap;

    fn small_params() -> SimulationParams {
        SimulationParams {
            seed: 21,
            grid_size: 24,
            generation: GenerationSettings {
                fault_passes: 300,
                walk_passes: 20,
                walk_steps: 100,
                rewalk_passes: 2,
                ..GenerationSettings::default()
            },
            ..SimulationParams::default()
        }
    }

    #[test]
    fn starts_eroding_and_pause_switches_to_search() {
        let mut sim = Simulation::new(small_params()).unwrap();
        assert_eq!(sim.phase(), Phase::Eroding);
        let before = sim.world().terrain.clone();
        sim.step();
        assert_ne!(sim.world().terrain, before);
        assert!(sim.events().is_empty());

        sim.toggle_erosion();
        assert!(sim.erosion_paused());
        let phase = sim.step();
        assert!(matches!(phase, Phase::Searching | Phase::Building));
        assert_eq!(sim.ticks(), 2);
    }

    #[test]
    fn search_never_erodes() {
        let mut hm = Heightmap::new(12);
        hm.data = vec![1.0; 144];
        let world = World::new(hm, 0.001);
        let mut sim =
            Simulation::from_world(small_params(), world.clone(), ChaCha8Rng::seed_from_u64(1));
        sim.toggle_erosion();
        for _ in 0..5 {
            assert_eq!(sim.step(), Phase::Searching);
        }
        assert_eq!(sim.world(), &world);
        assert_eq!(sim.site(), None);
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SimulationParams {
            grid_size: 2,
            ..SimulationParams::default()
        };
        assert!(Simulation::new(params).is_err());
    }
}
