//! Map session: the current seed, tunables and generated map
//!
//! A session starts uninitialized and becomes ready after its first
//! successful generation. Every parameter change regenerates the heightfield
//! and tile grid from scratch. A failed regeneration leaves the previous
//! parameters and map untouched.
//!
//! Slider updates can also be queued with a timestamp. They are held for the
//! configured settle window and then applied as one batch, so a burst of
//! slider movement costs a single regeneration.

use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::config::MapConfig;
use crate::debounce::ParameterBatcher;
use crate::error::Result;
use crate::gradient_noise::GradientNoise;
use crate::heightmap::{generate_heightfield_with, Heightfield};
use crate::params::{NoiseParams, ParamKind, ParameterUpdate};
use crate::render::{tile_fill_commands, FillRect};
use crate::resources::{place_resources, ResourceSite};
use crate::sampler::BestCandidateSampler;
use crate::snapshot::MapSnapshot;
use crate::terrain::{classify_heightfield, ThresholdTable, TileGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
}

/// One complete generation result
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap {
    pub seed: u32,
    pub params: NoiseParams,
    pub heightfield: Heightfield,
    pub tiles: TileGrid,
    /// 1 for the first successful generation, +1 for each one after
    pub generation: u64,
}

pub struct MapSession {
    config: MapConfig,
    seed: u32,
    params: NoiseParams,
    noise: GradientNoise,
    current: Option<GeneratedMap>,
    generations: u64,
    sampler: BestCandidateSampler,
    queued: ParameterBatcher,
}

impl MapSession {
    /// Create an uninitialized session. Nothing is generated yet.
    pub fn new(config: MapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            queued: ParameterBatcher::new(config.debounce()),
            seed: config.seed,
            params: config.noise,
            noise: GradientNoise::new(config.seed),
            config,
            current: None,
            generations: 0,
            sampler: BestCandidateSampler::default(),
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.config.thresholds
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    /// The current map, if one has been generated.
    pub fn current(&self) -> Option<&GeneratedMap> {
        self.current.as_ref()
    }

    /// Number of successful generations so far.
    pub fn generation(&self) -> u64 {
        self.generations
    }

    /// Generate the map for the current seed and parameters.
    pub fn regenerate(&mut self) -> Result<&GeneratedMap> {
        let map = self.build(&self.noise, &self.params, &self.config.thresholds)?;
        Ok(self.commit(map))
    }

    /// Switch seed and regenerate.
    pub fn set_seed(&mut self, seed: u32) -> Result<&GeneratedMap> {
        let noise = if seed == self.seed {
            self.noise.clone()
        } else {
            GradientNoise::new(seed)
        };
        let map = self.build(&noise, &self.params, &self.config.thresholds)?;
        self.seed = seed;
        self.noise = noise;
        Ok(self.commit(map))
    }

    /// Replace all tunables and regenerate.
    pub fn set_params(&mut self, params: NoiseParams) -> Result<&GeneratedMap> {
        let map = self.build(&self.noise, &params, &self.config.thresholds)?;
        self.params = params;
        Ok(self.commit(map))
    }

    /// Apply one slider value and regenerate.
    pub fn set_parameter(&mut self, kind: ParamKind, progress: f64) -> Result<&GeneratedMap> {
        self.apply_updates(&[ParameterUpdate::new(kind, progress)])
    }

    /// Apply a batch of slider values and regenerate once.
    ///
    /// All-or-nothing: if any update or the regeneration fails, neither the
    /// parameters nor the map change.
    pub fn apply_updates(&mut self, updates: &[ParameterUpdate]) -> Result<&GeneratedMap> {
        let mut params = self.params;
        for update in updates {
            update.kind.apply(&mut params, update.progress)?;
            debug!("{} <- {:.3}", update.kind, update.progress);
        }
        self.set_params(params)
    }

    /// Queue a slider value; it replaces any earlier queued value for the
    /// same parameter and restarts the settle window.
    pub fn queue_update(&mut self, update: ParameterUpdate, now: Instant) {
        self.queued.submit(update, now);
    }

    /// Apply the queued batch once it has settled.
    ///
    /// Returns `Ok(None)` while nothing is queued or the window is still
    /// open. A failing batch is dropped and leaves the session unchanged.
    pub fn poll_updates(&mut self, now: Instant) -> Result<Option<&GeneratedMap>> {
        let Some(updates) = self.queued.poll(now) else {
            return Ok(None);
        };
        self.apply_updates(&updates).map(Some)
    }

    pub fn has_queued_updates(&self) -> bool {
        self.queued.is_pending()
    }

    /// Replace the threshold table and regenerate.
    pub fn set_thresholds(&mut self, table: ThresholdTable) -> Result<&GeneratedMap> {
        let map = self.build(&self.noise, &self.params, &table)?;
        self.config.thresholds = table;
        Ok(self.commit(map))
    }

    /// Flat snapshot of the current map.
    pub fn snapshot(&self) -> Option<MapSnapshot> {
        self.current
            .as_ref()
            .map(|map| MapSnapshot::capture(map.seed, &map.params, &map.heightfield))
    }

    /// Draw commands for the current tile grid (empty before the first generation).
    pub fn render_commands(&self) -> Vec<FillRect> {
        self.current
            .as_ref()
            .map(|map| tile_fill_commands(&map.tiles, &self.config.layout))
            .unwrap_or_default()
    }

    /// Place resource sites, tagged with terrain when a map exists.
    pub fn place_resources<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<ResourceSite>> {
        place_resources(
            &self.config.layout,
            self.current.as_ref().map(|map| &map.tiles),
            &self.config.resources,
            &self.sampler,
            rng,
        )
    }

    fn build(
        &self,
        noise: &GradientNoise,
        params: &NoiseParams,
        thresholds: &ThresholdTable,
    ) -> Result<GeneratedMap> {
        let layout = &self.config.layout;
        let heightfield = generate_heightfield_with(noise, layout.columns(), layout.rows(), params)?;
        let tiles = classify_heightfield(&heightfield, thresholds)?;
        Ok(GeneratedMap {
            seed: noise.seed(),
            params: *params,
            heightfield,
            tiles,
            generation: self.generations + 1,
        })
    }

    fn commit(&mut self, map: GeneratedMap) -> &GeneratedMap {
        self.generations = map.generation;
        info!(
            "Generated map #{} ({}x{}, seed {})",
            map.generation,
            map.tiles.width,
            map.tiles.height,
            map.seed
        );
        self.current.insert(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapLayout;
    use crate::error::MapError;
    use crate::heightmap::generate_heightfield;
    use crate::resources::ResourceConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> MapConfig {
        MapConfig {
            layout: MapLayout { map_width: 96, map_height: 64, tile_width: 4, tile_height: 4 },
            resources: ResourceConfig { count: 12, ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_uninitialized() {
        let session = MapSession::new(small_config()).unwrap();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.current().is_none());
        assert!(session.snapshot().is_none());
        assert!(session.render_commands().is_empty());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_first_generation_makes_ready() {
        let mut session = MapSession::new(small_config()).unwrap();
        let map = session.regenerate().unwrap();
        assert_eq!(map.tiles.width, 24);
        assert_eq!(map.tiles.height, 16);
        assert_eq!(map.generation, 1);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.render_commands().len(), 24 * 16);
    }

    #[test]
    fn test_matches_direct_generation() {
        let config = small_config();
        let mut session = MapSession::new(config.clone()).unwrap();
        let map = session.regenerate().unwrap();
        let direct = generate_heightfield(24, 16, config.seed, &config.noise).unwrap();
        assert_eq!(map.heightfield, direct);
    }

    #[test]
    fn test_parameter_change_regenerates() {
        let mut session = MapSession::new(small_config()).unwrap();
        let before = session.regenerate().unwrap().clone();
        let after = session.set_parameter(ParamKind::OffsetX, 0.5).unwrap();
        assert_eq!(after.generation, 2);
        assert_eq!(after.params.offset.x, 0.5);
        assert_ne!(after.heightfield, before.heightfield);
    }

    #[test]
    fn test_failed_update_keeps_previous_state() {
        let mut session = MapSession::new(small_config()).unwrap();
        let before = session.regenerate().unwrap().clone();

        // Second update is out of range, so the first must not stick either
        let result = session.apply_updates(&[
            ParameterUpdate::new(ParamKind::Octaves, 1.0),
            ParameterUpdate::new(ParamKind::Scale, 2.0),
        ]);
        assert!(matches!(result, Err(MapError::InvalidArgument(_))));
        assert_eq!(session.params(), &before.params);
        assert_eq!(session.current(), Some(&before));
        assert_eq!(session.generation(), 1);

        let bad = NoiseParams { scale: 0.0, ..Default::default() };
        assert!(session.set_params(bad).is_err());
        assert_eq!(session.current(), Some(&before));
    }

    #[test]
    fn test_failure_before_first_generation_stays_uninitialized() {
        let mut session = MapSession::new(small_config()).unwrap();
        let bad = NoiseParams { octaves: 0, ..Default::default() };
        assert!(session.set_params(bad).is_err());
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn test_set_seed() {
        let mut session = MapSession::new(small_config()).unwrap();
        let first = session.regenerate().unwrap().heightfield.clone();
        let reseeded = session.set_seed(2).unwrap();
        assert_eq!(reseeded.seed, 2);
        assert_ne!(reseeded.heightfield, first);
        assert_eq!(session.seed(), 2);

        let back = session.set_seed(1).unwrap();
        assert_eq!(back.heightfield, first);
    }

    #[test]
    fn test_batch_regenerates_once() {
        let mut session = MapSession::new(small_config()).unwrap();
        session.regenerate().unwrap();
        let map = session
            .apply_updates(&[
                ParameterUpdate::new(ParamKind::Persistence, 0.5),
                ParameterUpdate::new(ParamKind::Lacunarity, 0.5),
            ])
            .unwrap();
        assert_eq!(map.generation, 2);
        assert_eq!(map.params.lacunarity, 4.0);
    }

    #[test]
    fn test_queued_burst_regenerates_once() {
        let config = MapConfig { debounce_ms: 16, ..small_config() };
        let mut session = MapSession::new(config).unwrap();
        session.regenerate().unwrap();

        let start = Instant::now();
        let ms = std::time::Duration::from_millis;
        session.queue_update(ParameterUpdate::new(ParamKind::Octaves, 0.0), start);
        session.queue_update(ParameterUpdate::new(ParamKind::OffsetX, 0.2), start + ms(5));
        session.queue_update(ParameterUpdate::new(ParamKind::Octaves, 1.0), start + ms(10));

        // Window restarts with every submission
        assert!(session.poll_updates(start + ms(20)).unwrap().is_none());
        assert!(session.has_queued_updates());
        assert_eq!(session.generation(), 1);

        let map = session.poll_updates(start + ms(26)).unwrap().unwrap();
        assert_eq!(map.generation, 2);
        assert_eq!(map.params.octaves, 7);
        assert_eq!(map.params.offset.x, 0.2);

        assert!(!session.has_queued_updates());
        assert!(session.poll_updates(start + ms(100)).unwrap().is_none());
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_failed_queued_batch_is_dropped() {
        let mut session = MapSession::new(small_config()).unwrap();
        let before = session.regenerate().unwrap().clone();

        let start = Instant::now();
        session.queue_update(ParameterUpdate::new(ParamKind::Scale, 3.0), start);
        let settled = start + session.config().debounce();
        assert!(session.poll_updates(settled).is_err());
        assert!(!session.has_queued_updates());
        assert_eq!(session.current(), Some(&before));
    }

    #[test]
    fn test_set_thresholds_reclassifies() {
        use crate::terrain::{TerrainCategory, Threshold};

        let mut session = MapSession::new(small_config()).unwrap();
        session.regenerate().unwrap();
        let table = ThresholdTable::new(vec![Threshold::new(0.0, TerrainCategory::Sand)]).unwrap();
        let map = session.set_thresholds(table).unwrap();
        assert!(map.tiles.values().all(|&c| c == TerrainCategory::Sand));
    }

    #[test]
    fn test_snapshot_reflects_current_map() {
        let mut session = MapSession::new(small_config()).unwrap();
        session.set_parameter(ParamKind::Octaves, 0.0).unwrap();
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.octaves, 3);
        assert_eq!(snapshot.width, 24);
        assert_eq!(snapshot.height, 16);
        assert_eq!(snapshot.seed, 1);
    }

    #[test]
    fn test_place_resources_tags_terrain() {
        let mut session = MapSession::new(small_config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let untagged = session.place_resources(&mut rng).unwrap();
        assert_eq!(untagged.len(), 12);
        assert!(untagged.iter().all(|s| s.terrain.is_none()));

        session.regenerate().unwrap();
        let tagged = session.place_resources(&mut rng).unwrap();
        assert!(tagged.iter().all(|s| s.terrain.is_some()));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MapConfig {
            layout: MapLayout { tile_width: 0, ..Default::default() },
            ..Default::default()
        };
        assert!(MapSession::new(config).is_err());
    }
}
