use thiserror::Error;

/// Frame rate the loop assumes until told otherwise.
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Playfield and timing parameters. All of them are compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Playfield width in pixels
    pub width: i32,
    /// Playfield height in pixels
    pub height: i32,
    /// Side of one grid cell in pixels
    pub cell_size: i32,
    /// Simulation ticks per second
    pub tick_rate: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width, height and cell size must be positive (got {width}x{height}, cell {cell_size})")]
    NonPositive { width: i32, height: i32, cell_size: i32 },

    #[error("cell size {cell_size} does not evenly divide a {width}x{height} field")]
    UnevenGrid { width: i32, height: i32, cell_size: i32 },

    #[error("tick rate must be at least 1")]
    ZeroTickRate,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { width: 960, height: 960, cell_size: 32, tick_rate: 8 }
    }
}

impl GameConfig {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Self {
        GameConfig { width, height, cell_size, ..Default::default() }
    }

    pub fn grid_width(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn grid_height(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GameConfig { width, height, cell_size, tick_rate } = *self;

        if width <= 0 || height <= 0 || cell_size <= 0 {
            return Err(ConfigError::NonPositive { width, height, cell_size });
        }

        // Food spawning picks whole cells, so the field must be a whole number of them
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(ConfigError::UnevenGrid { width, height, cell_size });
        }

        if tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_by_thirty_cells() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width(), 30);
        assert_eq!(config.grid_height(), 30);
        assert_eq!(config.tick_rate, 8);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_uneven_grid() {
        let config = GameConfig::new(100, 96, 32);
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnevenGrid { width: 100, height: 96, cell_size: 32 })
        );
    }

    #[test]
    fn rejects_zero_cell() {
        assert!(matches!(GameConfig::new(96, 96, 0).validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let config = GameConfig { tick_rate: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));
    }
}
